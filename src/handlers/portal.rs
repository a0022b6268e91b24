// src/handlers/portal.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::Envelope},
    config::AppState,
    middleware::auth::{AuthenticatedUser, MaybeUser},
    models::{
        portal::FavoriteToggleResult,
        property::{Paginated, PortalProperty, Property, PropertyFilters},
    },
    services::lead_service::Inquiry,
};

// --- PAYLOADS ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoritePayload {
    pub property_id: Uuid,
}

// Formulário "tenho interesse" da página do imóvel
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPayload {
    pub property_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Sara Ahmed")]
    pub name: String,

    #[validate(length(min = 6, max = 20, message = "invalid_phone"))]
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[validate(length(max = 2000, message = "too_long"))]
    pub message: Option<String>,
}

/// Resposta pública da consulta: só o id, nada do funil interno do lead
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryReceived {
    pub id: Uuid,
}

// =============================================================================
//  LISTAGEM PÚBLICA
// =============================================================================

// GET /api/portal/properties?priceMin=&propertyTypes=Villa&propertyTypes=Apartment&page=2
#[utoipa::path(
    get,
    path = "/api/portal/properties",
    tag = "Portal",
    params(PropertyFilters),
    responses(
        (status = 200, description = "Published listings, filtered and paginated", body = Paginated<PortalProperty>)
    )
)]
pub async fn list_published_properties(
    State(app_state): State<AppState>,
    MaybeUser(buyer): MaybeUser,
    Query(filters): Query<PropertyFilters>,
) -> Result<impl IntoResponse, AppError> {
    let buyer_id = buyer.map(|p| p.id);
    let page = app_state.portal_service.list_published(&filters, buyer_id).await?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/portal/properties/{id}
#[utoipa::path(
    get,
    path = "/api/portal/properties/{id}",
    tag = "Portal",
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Published listing", body = Property),
        (status = 404, description = "Not found or not published")
    )
)]
pub async fn get_published_property(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let property = app_state.portal_service.get_published(id).await?;
    Ok((StatusCode::OK, Json(property)))
}

// =============================================================================
//  FAVORITOS (comprador logado)
// =============================================================================

// GET /api/portal/favorites
#[utoipa::path(
    get,
    path = "/api/portal/favorites",
    tag = "Portal",
    responses(
        (status = 200, description = "Favorite listings of the buyer", body = Vec<Property>),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_favorites(
    State(app_state): State<AppState>,
    AuthenticatedUser(buyer): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let favorites = app_state.portal_service.list_favorites(buyer.id).await?;
    Ok((StatusCode::OK, Json(favorites)))
}

// POST /api/portal/favorites
#[utoipa::path(
    post,
    path = "/api/portal/favorites",
    tag = "Portal",
    request_body = ToggleFavoritePayload,
    responses(
        (status = 200, description = "Final favorite state", body = Envelope<FavoriteToggleResult>),
        (status = 404, description = "Listing not found or not published")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_favorite(
    State(app_state): State<AppState>,
    AuthenticatedUser(buyer): AuthenticatedUser,
    Json(payload): Json<ToggleFavoritePayload>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state
        .portal_service
        .toggle_favorite(buyer.id, payload.property_id)
        .await?;

    Ok((StatusCode::OK, Json(Envelope::new(result))))
}

// =============================================================================
//  CONSULTA (vira lead)
// =============================================================================

// POST /api/portal/inquire
#[utoipa::path(
    post,
    path = "/api/portal/inquire",
    tag = "Portal",
    request_body = InquiryPayload,
    responses(
        (status = 201, description = "Inquiry received", body = Envelope<InquiryReceived>),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Listing not found or not published")
    )
)]
pub async fn inquire(
    State(app_state): State<AppState>,
    Json(mut payload): Json<InquiryPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Nome só com espaços conta como vazio
    payload.name = payload.name.trim().to_string();
    payload.validate()?;

    let lead = app_state
        .lead_service
        .create_from_inquiry(Inquiry {
            property_id: payload.property_id,
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            message: payload.message,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(InquiryReceived { id: lead.id }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_response_exposes_only_the_id() {
        let id = Uuid::new_v4();
        let body = serde_json::to_value(Envelope::new(InquiryReceived { id })).unwrap();

        assert_eq!(body, serde_json::json!({ "data": { "id": id } }));
    }
}
