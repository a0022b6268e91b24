// src/services/property_service.rs

use std::sync::Arc;

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PropertyRepository,
    models::property::{Property, PropertyInput},
    services::notifier::{spawn_property_deleted, Notifier},
};

#[derive(Clone)]
pub struct PropertyService {
    repo: PropertyRepository,
    notifier: Arc<dyn Notifier>,
}

impl PropertyService {
    pub fn new(repo: PropertyRepository, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    pub async fn list<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_for_tenant(executor, tenant_id).await
    }

    pub async fn get<'e, E>(&self, executor: E, tenant_id: Uuid, id: Uuid) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, tenant_id, id)
            .await?
            .ok_or(AppError::NotFound("Property"))
    }

    pub async fn create<'e, E>(&self, executor: E, tenant_id: Uuid, input: &PropertyInput) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let property = self.repo.create(executor, tenant_id, &normalize(input)).await?;
        tracing::info!(property_id = %property.id, tenant_id = %tenant_id, "Property created");
        Ok(property)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        input: &PropertyInput,
    ) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update(executor, tenant_id, id, &normalize(input))
            .await?
            .ok_or(AppError::NotFound("Property"))
    }

    /// Remove o imóvel. A notificação sai só depois do commit, via `notify_deleted`.
    pub async fn delete<'e, E>(&self, executor: E, tenant_id: Uuid, id: Uuid) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self
            .repo
            .delete(executor, tenant_id, id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;

        tracing::info!(property_id = %id, tenant_id = %tenant_id, "Property deleted");
        Ok(deleted)
    }

    /// Dispara a notificação em segundo plano (não bloqueia a resposta).
    pub fn notify_deleted(&self, property: Property) -> tokio::task::JoinHandle<()> {
        spawn_property_deleted(self.notifier.clone(), property)
    }
}

// Remove entradas vazias de imagens/amenidades vindas do formulário
fn normalize(input: &PropertyInput) -> PropertyInput {
    let clean = |items: &[String]| -> Vec<String> {
        items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    PropertyInput {
        title: input.title.trim().to_string(),
        images: clean(&input.images),
        amenities: clean(&input.amenities),
        ..input.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::property::{PropertyStatus, PropertyType};
    use rust_decimal::Decimal;

    #[test]
    fn normalize_drops_blank_entries_and_keeps_order() {
        let input = PropertyInput {
            title: "  Palm Villa ".into(),
            price: Decimal::from(5_000_000),
            location: "Palm Jumeirah".into(),
            bedrooms: 5,
            bathrooms: 6,
            area: Decimal::from(7000),
            property_type: PropertyType::Villa,
            status: PropertyStatus::Ready,
            images: vec!["b.jpg".into(), " ".into(), "a.jpg".into()],
            amenities: vec!["Pool".into(), "".into()],
            is_published: true,
            description: None,
            handover_date: None,
            payment_plan: None,
            rera_id: None,
            roi_estimate: None,
        };

        let out = normalize(&input);
        assert_eq!(out.title, "Palm Villa");
        assert_eq!(out.images, vec!["b.jpg".to_string(), "a.jpg".to_string()]);
        assert_eq!(out.amenities, vec!["Pool".to_string()]);
    }
}
