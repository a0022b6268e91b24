// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::PermissionAction,
};

/// 1. O Trait que define o que é uma Permissão (módulo + ação da matriz)
pub trait PermissionDef: Send + Sync + 'static {
    fn module() -> &'static str;
    fn action() -> PermissionAction;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts.
// A matriz já veio com o perfil, então não há ida ao banco aqui.
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        if !user.0.can(T::module(), T::action()) {
            return Err(AppError::Forbidden(format!(
                "You need the '{}:{:?}' permission for this action.",
                T::module(),
                T::action()
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

/// Somente admin / company_owner (gestão da equipe)
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        if !user.0.role.is_admin() {
            return Err(AppError::Forbidden("Only administrators can manage users.".into()));
        }
        Ok(RequireAdmin)
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident, $module:literal, $action:ident) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn module() -> &'static str {
                $module
            }
            fn action() -> PermissionAction {
                PermissionAction::$action
            }
        }
    };
}

permission!(PermLeadsView, "leads", View);
permission!(PermLeadsCreate, "leads", Create);
permission!(PermLeadsEdit, "leads", Edit);
permission!(PermLeadsDelete, "leads", Delete);

permission!(PermPropertiesView, "properties", View);
permission!(PermPropertiesCreate, "properties", Create);
permission!(PermPropertiesEdit, "properties", Edit);
permission!(PermPropertiesDelete, "properties", Delete);
