use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Account disabled or expired")]
    AccountDisabled,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("User has no company")]
    MissingTenant,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    // Falha de consulta com contexto ("Failed to fetch leads: ...")
    #[error("Failed to {context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    // Variante para erros de banco sem contexto
    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Corpo de erro padrão da API: `{ "error": "...", "details": {...} }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            // Retorna todos os detalhes da validação, campo a campo
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let msg = e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string());
                            Value::String(msg)
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: "One or more fields are invalid.".into(),
                    details: Some(Value::Object(details)),
                }
            }
            AppError::EmailAlreadyExists => ApiError::new(StatusCode::CONFLICT, "This email is already in use."),
            AppError::InvalidCredentials => ApiError::new(StatusCode::UNAUTHORIZED, "Invalid email or password."),
            AppError::InvalidToken => ApiError::new(StatusCode::UNAUTHORIZED, "Missing or invalid authentication token."),
            AppError::AccountDisabled => ApiError::new(StatusCode::FORBIDDEN, "This account is disabled or expired."),
            AppError::Forbidden(msg) => ApiError::new(StatusCode::FORBIDDEN, msg),
            AppError::MissingTenant => ApiError::new(StatusCode::FORBIDDEN, "This account is not linked to a company."),
            AppError::NotFound(what) => ApiError::new(StatusCode::NOT_FOUND, format!("{} not found.", what)),
            AppError::BadRequest(msg) => ApiError::new(StatusCode::BAD_REQUEST, msg),

            // Todos os outros erros viram 500. O detalhe fica só no log.
            e => {
                tracing::error!("Internal server error: {}", e);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn query_error_message_is_prefixed() {
        let err = AppError::Query {
            context: "fetch leads",
            source: sqlx::Error::RowNotFound,
        };
        assert!(err.to_string().starts_with("Failed to fetch leads: "));
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = ValidationErrors::new();
        let mut e = ValidationError::new("email");
        e.message = Some("invalid_email".into());
        errors.add("email", e);

        let api: ApiError = AppError::ValidationError(errors).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.unwrap()["email"][0], "invalid_email");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api: ApiError = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "An unexpected error occurred.");
    }
}
