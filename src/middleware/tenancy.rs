// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{authenticate, AuthenticatedUser},
    models::auth::UserRole,
};

// O tenant (imobiliária) do usuário logado.
// Vem do perfil, nunca de um header controlado pelo cliente.
#[derive(Debug, Clone)]
pub struct TenantContext(pub Uuid);

impl TenantContext {
    /// Compradores do portal não têm acesso ao dashboard.
    pub fn for_user(user: &AuthenticatedUser) -> Result<Self, AppError> {
        if user.0.role == UserRole::Buyer {
            return Err(AppError::Forbidden("Portal accounts cannot access the dashboard.".into()));
        }
        user.0.company_id.map(TenantContext).ok_or(AppError::MissingTenant)
    }
}

/// Auth + tenant: autentica e depois resolve a empresa do usuário.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&app_state, request.headers()).await?;
    let tenant = TenantContext::for_user(&user)?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(tenant);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<TenantContext>() {
            return Ok(ctx.clone());
        }
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        let ctx = TenantContext::for_user(user)?;
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
