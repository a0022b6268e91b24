// src/db/favorite_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::query_failed, error::AppError},
    models::{portal::FavoriteInsert, property::Property},
};

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// IDs favoritados pelo comprador (para marcar a listagem)
    pub async fn list_property_ids(&self, buyer_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        sqlx::query_scalar::<_, Uuid>("SELECT property_id FROM favorites WHERE buyer_id = $1")
            .bind(buyer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("fetch favorites"))
    }

    /// Imóveis favoritados ainda publicados
    pub async fn list_properties(&self, buyer_id: Uuid) -> Result<Vec<Property>, AppError> {
        sqlx::query_as::<_, Property>(
            r#"
            SELECT p.id, p.tenant_id, p.title, p.price, p.location, p.bedrooms, p.bathrooms,
                   p.area, p.property_type, p.status, p.images, p.amenities, p.is_published,
                   p.description, p.handover_date, p.payment_plan, p.rera_id, p.roi_estimate,
                   p.created_at, p.updated_at
            FROM favorites f
            INNER JOIN properties p ON p.id = f.property_id
            WHERE f.buyer_id = $1 AND p.is_published = TRUE
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed("fetch favorite properties"))
    }

    /// Inserção idempotente: duplicata vira `AlreadyExists`
    pub async fn insert(&self, buyer_id: Uuid, property_id: Uuid) -> Result<FavoriteInsert, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (buyer_id, property_id)
            VALUES ($1, $2)
            ON CONFLICT (buyer_id, property_id) DO NOTHING
            "#,
        )
        .bind(buyer_id)
        .bind(property_id)
        .execute(&self.pool)
        .await
        .map_err(query_failed("add favorite"))?;

        Ok(if result.rows_affected() == 0 {
            FavoriteInsert::AlreadyExists
        } else {
            FavoriteInsert::Created
        })
    }

    pub async fn remove(&self, buyer_id: Uuid, property_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM favorites WHERE buyer_id = $1 AND property_id = $2")
            .bind(buyer_id)
            .bind(property_id)
            .execute(&self.pool)
            .await
            .map_err(query_failed("remove favorite"))?;

        Ok(result.rows_affected() > 0)
    }
}
