// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common::response::BulkResult;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Properties ---
        handlers::properties::list_properties,
        handlers::properties::get_property,
        handlers::properties::create_property,
        handlers::properties::update_property,
        handlers::properties::delete_property,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::get_leads_analytics,
        handlers::leads::list_lead_events,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::bulk_update_leads,
        handlers::leads::bulk_delete_leads,

        // --- Portal ---
        handlers::portal::list_published_properties,
        handlers::portal::get_published_property,
        handlers::portal::list_favorites,
        handlers::portal::toggle_favorite,
        handlers::portal::inquire,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::Profile,
            models::auth::RegisterBuyerPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,

            // --- Properties ---
            models::property::PropertyType,
            models::property::PropertyStatus,
            models::property::PropertySort,
            models::property::Property,
            models::property::PropertyInput,
            models::property::PortalProperty,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::LeadSource,
            models::lead::Lead,
            models::lead::LeadInput,
            models::lead::LeadEvent,
            models::lead::LeadPatch,
            models::lead::PropertyLeadCount,
            models::lead::LeadsAnalytics,

            // --- Portal ---
            models::portal::FavoriteToggleResult,
            handlers::portal::ToggleFavoritePayload,
            handlers::portal::InquiryPayload,
            handlers::portal::InquiryReceived,

            // --- Ações em massa ---
            BulkResult,
        )
    ),
    tags(
        (name = "Auth", description = "Login and portal sign-up"),
        (name = "Users", description = "Profile and team management"),
        (name = "Properties", description = "Company inventory"),
        (name = "Leads", description = "Leads, bulk actions and analytics"),
        (name = "Portal", description = "Public listings, favorites and inquiries")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
