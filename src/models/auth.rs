// src/models/auth.rs

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Agent,
    Buyer,
    CompanyOwner,
}

impl UserRole {
    /// Papéis que administram a equipe e ignoram a matriz de permissões.
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::CompanyOwner)
    }
}

// --- MATRIZ DE PERMISSÕES ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(default)]
pub struct ModulePermissions {
    pub view: bool,
    pub edit: bool,
    pub create: bool,
    pub delete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAction {
    View,
    Edit,
    Create,
    Delete,
}

/// { "leads": { "view": true, ... }, "properties": { ... } }
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(transparent)]
pub struct PermissionMatrix(pub HashMap<String, ModulePermissions>);

impl PermissionMatrix {
    pub fn allows(&self, module: &str, action: PermissionAction) -> bool {
        let Some(perms) = self.0.get(module) else {
            return false;
        };
        match action {
            PermissionAction::View => perms.view,
            PermissionAction::Edit => perms.edit,
            PermissionAction::Create => perms.create,
            PermissionAction::Delete => perms.delete,
        }
    }
}

// Representa um perfil vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub full_name: Option<String>,

    // Escopo do tenant (a imobiliária)
    pub company_id: Option<Uuid>,
    pub company_name: Option<String>,

    pub role: UserRole,

    #[schema(value_type = Object)]
    pub permissions: Json<PermissionMatrix>,
    #[schema(value_type = Object)]
    pub notification_preferences: Json<serde_json::Value>,

    pub is_disabled: bool,
    pub expiry_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Conta desativada ou vencida não pode autenticar.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        if self.is_disabled {
            return false;
        }
        match self.expiry_date {
            Some(expiry) => today <= expiry,
            None => true,
        }
    }

    pub fn can(&self, module: &str, action: PermissionAction) -> bool {
        self.role.is_admin() || self.permissions.0.allows(module, action)
    }
}

// Dados para cadastro de comprador no portal
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBuyerPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "buyer@email.com")]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
    pub full_name: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do perfil)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: UserRole, permissions: PermissionMatrix) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "agent@realty.ae".into(),
            password_hash: String::new(),
            full_name: None,
            company_id: Some(Uuid::new_v4()),
            company_name: Some("Acme Realty".into()),
            role,
            permissions: Json(permissions),
            notification_preferences: Json(serde_json::json!({})),
            is_disabled: false,
            expiry_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn matrix_parses_partial_modules() {
        let matrix: PermissionMatrix =
            serde_json::from_value(serde_json::json!({ "leads": { "view": true, "edit": true } })).unwrap();

        assert!(matrix.allows("leads", PermissionAction::View));
        assert!(matrix.allows("leads", PermissionAction::Edit));
        assert!(!matrix.allows("leads", PermissionAction::Delete));
        assert!(!matrix.allows("properties", PermissionAction::View));
    }

    #[test]
    fn admins_bypass_the_matrix() {
        let owner = profile(UserRole::CompanyOwner, PermissionMatrix::default());
        assert!(owner.can("users", PermissionAction::Delete));

        let agent = profile(UserRole::Agent, PermissionMatrix::default());
        assert!(!agent.can("users", PermissionAction::View));
    }

    #[test]
    fn disabled_or_expired_profiles_are_inactive() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let mut p = profile(UserRole::Agent, PermissionMatrix::default());
        assert!(p.is_active_on(today));

        p.expiry_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        assert!(p.is_active_on(today));

        p.expiry_date = NaiveDate::from_ymd_opt(2025, 5, 31);
        assert!(!p.is_active_on(today));

        p.expiry_date = None;
        p.is_disabled = true;
        assert!(!p.is_active_on(today));
    }
}
