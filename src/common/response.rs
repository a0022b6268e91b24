use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope de sucesso das mutações: `{ "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Corpo das ações em massa: `{ ids, data? }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkRequest<T> {
    pub ids: Vec<uuid::Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

// Quantas linhas a ação em massa afetou
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct BulkResult {
    pub affected: u64,
}
