// src/handlers/properties.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_rls_transaction, error::AppError, response::Envelope},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{
            PermPropertiesCreate, PermPropertiesDelete, PermPropertiesEdit, PermPropertiesView, RequirePermission,
        },
        tenancy::TenantContext,
    },
    models::property::{Property, PropertyInput},
};

// GET /api/properties
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    responses(
        (status = 200, description = "Company inventory, newest first", body = Vec<Property>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_properties(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermPropertiesView>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let properties = app_state.property_service.list(&mut *tx, tenant.0).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(properties)))
}

// GET /api/properties/{id}
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property", body = Property),
        (status = 404, description = "Property not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_property(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermPropertiesView>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let property = app_state.property_service.get(&mut *tx, tenant.0, id).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(property)))
}

// POST /api/properties
#[utoipa::path(
    post,
    path = "/api/properties",
    tag = "Properties",
    request_body = PropertyInput,
    responses(
        (status = 201, description = "Property created", body = Envelope<Property>),
        (status = 400, description = "Invalid data")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_property(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermPropertiesCreate>,
    Json(payload): Json<PropertyInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let property = app_state.property_service.create(&mut *tx, tenant.0, &payload).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(property))))
}

// PUT /api/properties/{id}
#[utoipa::path(
    put,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body = PropertyInput,
    responses(
        (status = 200, description = "Property updated", body = Envelope<Property>),
        (status = 404, description = "Property not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_property(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermPropertiesEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PropertyInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let property = app_state
        .property_service
        .update(&mut *tx, tenant.0, id, &payload)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(Envelope::new(property))))
}

// DELETE /api/properties/{id}
#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property removed", body = Envelope<Property>),
        (status = 404, description = "Property not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_property(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermPropertiesDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let property = app_state.property_service.delete(&mut *tx, tenant.0, id).await?;
    tx.commit().await?;

    app_state.property_service.notify_deleted(property.clone());

    Ok((StatusCode::OK, Json(Envelope::new(property))))
}
