// src/models/user.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::auth::{PermissionMatrix, UserRole};

// Compradores se cadastram pelo portal, não pela equipe
fn validate_team_role(role: &UserRole) -> Result<(), ValidationError> {
    if *role == UserRole::Buyer {
        let mut err = ValidationError::new("role");
        err.message = Some("buyer_not_allowed".into());
        return Err(err);
    }
    Ok(())
}

// Criação de usuário da equipe (somente admin)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "agent@acme-realty.ae")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    pub full_name: Option<String>,

    #[validate(custom(function = "validate_team_role"))]
    pub role: UserRole,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub permissions: PermissionMatrix,

    pub expiry_date: Option<NaiveDate>,
}

// Atualização parcial: só o que vier preenchido muda
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub full_name: Option<String>,

    #[validate(custom(function = "validate_team_role"))]
    pub role: Option<UserRole>,

    #[schema(value_type = Option<Object>)]
    pub permissions: Option<PermissionMatrix>,

    #[schema(value_type = Option<Object>)]
    pub notification_preferences: Option<serde_json::Value>,

    pub is_disabled: Option<bool>,
    pub expiry_date: Option<NaiveDate>,
}

// Dados já prontos para o INSERT (senha com hash)
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub company_id: Option<uuid::Uuid>,
    pub company_name: Option<String>,
    pub role: UserRole,
    pub permissions: PermissionMatrix,
    pub expiry_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_users_cannot_be_buyers() {
        let payload = CreateUserPayload {
            email: "someone@acme.ae".into(),
            password: "secret123".into(),
            full_name: None,
            role: UserRole::Buyer,
            permissions: PermissionMatrix::default(),
            expiry_date: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));

        let agent = CreateUserPayload {
            role: UserRole::Agent,
            ..payload
        };
        assert!(agent.validate().is_ok());
    }
}
