// src/handlers/users.rs

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
    middleware::{auth::AuthenticatedUser, rbac::RequireAdmin, tenancy::TenantContext},
    models::{
        auth::Profile,
        user::{CreateUserPayload, UpdateUserPayload},
    },
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Team members of the company", body = Vec<Profile>),
        (status = 403, description = "Not an administrator")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let team = app_state.user_service.list_team(&mut *tx, tenant.0).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(team)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Team user created", body = Envelope<Profile>),
        (status = 409, description = "Email already registered")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _admin: RequireAdmin,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let created = app_state
        .user_service
        .create_team_user(&mut *tx, &user.0, payload)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(created))))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Team user updated", body = Envelope<Profile>),
        (status = 404, description = "User not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let updated = app_state
        .user_service
        .update_team_user(&mut *tx, &user.0, id, payload)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(Envelope::new(updated))))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Team user removed"),
        (status = 404, description = "User not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    app_state.user_service.delete_team_user(&mut *tx, &user.0, id).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
