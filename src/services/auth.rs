// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{Claims, PermissionMatrix, Profile, UserRole},
        user::NewProfile,
    },
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    /// Cadastro público do portal: sempre cria um comprador sem empresa.
    pub async fn register_buyer(
        &self,
        email: &str,
        password: &str,
        full_name: Option<String>,
    ) -> Result<String, AppError> {
        let password_hash = hash_password(password).await?;

        let profile = self
            .user_repo
            .create_profile(
                &self.pool,
                &NewProfile {
                    email: email.to_string(),
                    password_hash,
                    full_name,
                    company_id: None,
                    company_name: None,
                    role: UserRole::Buyer,
                    permissions: PermissionMatrix::default(),
                    expiry_date: None,
                },
            )
            .await?;

        tracing::info!(user_id = %profile.id, "New portal buyer registered");
        self.create_token(profile.id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let profile = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = profile.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        if !profile.is_active_on(Utc::now().date_naive()) {
            return Err(AppError::AccountDisabled);
        }

        self.create_token(profile.id)
    }

    /// Equivalente ao `getUser()`: token → perfil ativo
    pub async fn validate_token(&self, token: &str) -> Result<Profile, AppError> {
        let claims = self.decode_token(token)?;

        let profile = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !profile.is_active_on(Utc::now().date_naive()) {
            return Err(AppError::AccountDisabled);
        }

        Ok(profile)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

/// bcrypt é caro: roda fora do executor assíncrono
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {}", e))??;
    Ok(hashed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service_with_secret(secret: &str) -> AuthService {
        // Pool preguiçosa: nenhum teste aqui toca o banco
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(UserRepository::new(pool.clone()), secret.into(), pool)
    }

    #[tokio::test]
    async fn token_round_trips_the_subject() {
        let auth = service_with_secret("test-secret");
        let user_id = Uuid::new_v4();

        let token = auth.create_token(user_id).unwrap();
        let claims = auth.decode_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let auth = service_with_secret("test-secret");
        let other = service_with_secret("another-secret");

        let token = other.create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(auth.decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("secret123").await.unwrap();
        assert!(verify("secret123", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }
}
