// src/routes.rs

use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppState, Config},
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, tenancy::tenant_guard},
};

/// Monta o router completo. O `main` e os testes usam a mesma função.
pub fn create_router(app_state: AppState) -> Router {
    let cors = build_cors_layer(&app_state.config);

    // Rotas públicas (login, cadastro do portal, vitrine, consulta)
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/portal/properties",
            get(handlers::portal::list_published_properties),
        )
        .route(
            "/api/portal/properties/{id}",
            get(handlers::portal::get_published_property),
        )
        .route("/api/portal/inquire", post(handlers::portal::inquire));

    // Qualquer usuário logado (equipe ou comprador)
    let user_routes = Router::new()
        .route("/api/users/me", get(handlers::auth::get_me))
        .route(
            "/api/portal/favorites",
            get(handlers::portal::list_favorites).post(handlers::portal::toggle_favorite),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Dashboard: auth + tenant (empresa do perfil)
    let dashboard_routes = Router::new()
        .route(
            "/api/properties",
            get(handlers::properties::list_properties).post(handlers::properties::create_property),
        )
        .route(
            "/api/properties/{id}",
            get(handlers::properties::get_property)
                .put(handlers::properties::update_property)
                .delete(handlers::properties::delete_property),
        )
        .route(
            "/api/leads",
            get(handlers::leads::list_leads)
                .post(handlers::leads::create_lead)
                .put(handlers::leads::bulk_update_leads)
                .delete(handlers::leads::bulk_delete_leads),
        )
        .route("/api/leads/analytics", get(handlers::leads::get_leads_analytics))
        .route("/api/leads/{id}", put(handlers::leads::update_lead))
        .route("/api/leads/{id}/events", get(handlers::leads::list_lead_events))
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(user_routes)
        .merge(dashboard_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// CORS a partir da configuração. Origem inválida é ignorada com aviso.
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
