// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginPayload, Profile, RegisterBuyerPayload},
};

// Cadastro público do portal (sempre comprador)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterBuyerPayload,
    responses(
        (status = 201, description = "Buyer registered", body = AuthResponse),
        (status = 400, description = "Invalid data"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterBuyerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .register_buyer(&payload.email, &payload.password, payload.full_name)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// Login de qualquer perfil (equipe ou comprador)
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled or expired")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state.auth_service.login(&payload.email, &payload.password).await?;

    Ok(Json(AuthResponse { token }))
}

// Perfil do usuário logado
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current profile", body = Profile),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<Profile> {
    Json(user)
}
