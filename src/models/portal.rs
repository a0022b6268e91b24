// src/models/portal.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub buyer_id: Uuid,
    pub property_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Resultado de uma inserção de favorito.
/// Duplicata não é erro: vira `AlreadyExists`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteInsert {
    Created,
    AlreadyExists,
}

// Resposta do toggle: estado final do favorito
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggleResult {
    pub property_id: Uuid,
    pub is_favorite: bool,
}
