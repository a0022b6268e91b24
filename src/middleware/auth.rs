// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Profile};

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Profile);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
}

/// Equivalente ao `getUser()`: Bearer token → perfil ativo.
pub(crate) async fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser, AppError> {
    let token = bearer_token(headers).ok_or(AppError::InvalidToken)?;

    let profile = app_state.auth_service.validate_token(&token).await?;
    tracing::debug!(user_id = %profile.id, "Request authenticated");

    Ok(AuthenticatedUser(profile))
}

/// Exige um token válido e injeta o `AuthenticatedUser` nos extensions.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&app_state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

/// Usuário opcional para rotas públicas do portal.
/// Token ausente ou inválido vira visitante anônimo.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Profile>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(MaybeUser(None));
        };

        match state.auth_service.validate_token(&token).await {
            Ok(profile) => Ok(MaybeUser(Some(profile))),
            Err(e) => {
                tracing::debug!("Ignoring invalid portal token: {}", e);
                Ok(MaybeUser(None))
            }
        }
    }
}
