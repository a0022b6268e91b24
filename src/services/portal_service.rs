// src/services/portal_service.rs

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FavoriteRepository, PropertyRepository},
    models::{
        portal::{FavoriteInsert, FavoriteToggleResult},
        property::{Paginated, PortalProperty, Property, PropertyFilters},
    },
};

#[derive(Clone)]
pub struct PortalService {
    property_repo: PropertyRepository,
    favorite_repo: FavoriteRepository,
    page_size: i64,
}

impl PortalService {
    pub fn new(property_repo: PropertyRepository, favorite_repo: FavoriteRepository, page_size: i64) -> Self {
        Self {
            property_repo,
            favorite_repo,
            page_size,
        }
    }

    /// Listagem pública. Se houver comprador logado, marca os favoritos.
    pub async fn list_published(
        &self,
        filters: &PropertyFilters,
        buyer_id: Option<Uuid>,
    ) -> Result<Paginated<PortalProperty>, AppError> {
        let page = self.property_repo.get_published_properties(filters, self.page_size).await?;

        let favorites = match buyer_id {
            Some(buyer_id) => self.favorite_ids_or_empty(buyer_id).await,
            None => HashSet::new(),
        };

        let data = page
            .data
            .into_iter()
            .map(|property| PortalProperty {
                is_favorite: favorites.contains(&property.id),
                property,
            })
            .collect();

        Ok(Paginated {
            data,
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        })
    }

    pub async fn get_published(&self, id: Uuid) -> Result<Property, AppError> {
        self.property_repo
            .find_published(id)
            .await?
            .ok_or(AppError::NotFound("Property"))
    }

    pub async fn list_favorites(&self, buyer_id: Uuid) -> Result<Vec<Property>, AppError> {
        self.favorite_repo.list_properties(buyer_id).await
    }

    /// Alterna o favorito. Repetir a inserção não é erro.
    pub async fn toggle_favorite(&self, buyer_id: Uuid, property_id: Uuid) -> Result<FavoriteToggleResult, AppError> {
        if self.favorite_repo.remove(buyer_id, property_id).await? {
            return Ok(FavoriteToggleResult {
                property_id,
                is_favorite: false,
            });
        }

        // Só imóveis publicados podem ser favoritados
        self.get_published(property_id).await?;

        match self.favorite_repo.insert(buyer_id, property_id).await? {
            FavoriteInsert::Created => tracing::debug!(%buyer_id, %property_id, "Favorite added"),
            FavoriteInsert::AlreadyExists => tracing::debug!(%buyer_id, %property_id, "Favorite already exists"),
        }

        Ok(FavoriteToggleResult {
            property_id,
            is_favorite: true,
        })
    }

    // Leitura não crítica: falha vira lista vazia
    async fn favorite_ids_or_empty(&self, buyer_id: Uuid) -> HashSet<Uuid> {
        match self.favorite_repo.list_property_ids(buyer_id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!(%buyer_id, "Favorites unavailable, continuing without them: {}", e);
                HashSet::new()
            }
        }
    }
}
