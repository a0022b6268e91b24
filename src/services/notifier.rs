// src/services/notifier.rs

use std::sync::Arc;

use async_trait::async_trait;

use crate::{common::error::AppError, models::property::Property};

/// Canal de notificação por e-mail. O envio real é de um provedor externo.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn property_deleted(&self, property: &Property) -> Result<(), AppError>;
}

/// Implementação padrão: apenas registra no log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn property_deleted(&self, property: &Property) -> Result<(), AppError> {
        tracing::info!(
            property_id = %property.id,
            tenant_id = %property.tenant_id,
            title = %property.title,
            "📧 Property deleted notification queued"
        );
        Ok(())
    }
}

/// Dispara a notificação sem bloquear a resposta. Falha só vira log.
pub fn spawn_property_deleted(notifier: Arc<dyn Notifier>, property: Property) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = notifier.property_deleted(&property).await {
            tracing::warn!(property_id = %property.id, "Property deletion notification failed: {}", e);
        }
    })
}
