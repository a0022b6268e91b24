// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{FavoriteRepository, LeadRepository, PropertyRepository, UserRepository},
    services::{
        auth::AuthService,
        lead_service::LeadService,
        notifier::{LogNotifier, Notifier},
        portal_service::PortalService,
        property_service::PropertyService,
        user_service::UserService,
    },
};

/// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    // Segredo de "service role": assina os tokens, nunca vai para o navegador
    pub jwt_secret: String,
    // Única URL exposta aos clientes públicos
    pub public_api_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub portal_page_size: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let public_api_url = env::var("PUBLIC_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v.parse().context("DB_MAX_CONNECTIONS must be a number")?,
            Err(_) => 5,
        };

        let portal_page_size = match env::var("PORTAL_PAGE_SIZE") {
            Ok(v) => v.parse().context("PORTAL_PAGE_SIZE must be a number")?,
            Err(_) => 12,
        };

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string()),
        );

        Ok(Self {
            database_url,
            jwt_secret,
            public_api_url,
            bind_addr,
            db_max_connections,
            cors_origins,
            portal_page_size,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub property_service: PropertyService,
    pub lead_service: LeadService,
    pub portal_service: PortalService,
}

impl AppState {
    // Conecta ao banco, propagando erros com '?'
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("failed to connect to the database")?;

        tracing::info!("✅ Database connection established");

        Ok(Self::with_pool(db_pool, config, Arc::new(LogNotifier)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: Config, notifier: Arc<dyn Notifier>) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let favorite_repo = FavoriteRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), config.jwt_secret.clone(), db_pool.clone());
        let user_service = UserService::new(user_repo);
        let property_service = PropertyService::new(property_repo.clone(), notifier);
        let lead_service = LeadService::new(lead_repo, property_repo.clone());
        let portal_service = PortalService::new(property_repo, favorite_repo, config.portal_page_size);

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            user_service,
            property_service,
            lead_service,
            portal_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test ,,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
