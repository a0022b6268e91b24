// src/handlers/leads.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::begin_rls_transaction,
        error::AppError,
        response::{BulkRequest, BulkResult, Envelope},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermLeadsCreate, PermLeadsDelete, PermLeadsEdit, PermLeadsView, RequirePermission},
        tenancy::TenantContext,
    },
    models::lead::{Lead, LeadEvent, LeadInput, LeadPatch, LeadsAnalytics},
};

// =============================================================================
//  ÁREA 1: LEITURA
// =============================================================================

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "All leads of the company", body = Vec<Lead>),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermLeadsView>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let leads = app_state.lead_service.list(&mut *tx, tenant.0).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/analytics
#[utoipa::path(
    get,
    path = "/api/leads/analytics",
    tag = "Leads",
    responses(
        (status = 200, description = "Counts by source/status, conversion rate and top properties", body = LeadsAnalytics)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_leads_analytics(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermLeadsView>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let analytics = app_state.lead_service.get_leads_analytics(&mut *tx, tenant.0).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(analytics)))
}

// GET /api/leads/{id}/events
#[utoipa::path(
    get,
    path = "/api/leads/{id}/events",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Lead history", body = Vec<LeadEvent>),
        (status = 404, description = "Lead not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_lead_events(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermLeadsView>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let events = app_state.lead_service.list_events(&mut tx, tenant.0, id).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(events)))
}

// =============================================================================
//  ÁREA 2: FORMULÁRIO (create / update)
// =============================================================================

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = LeadInput,
    responses(
        (status = 201, description = "Lead created", body = Envelope<Lead>),
        (status = 400, description = "Invalid data")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermLeadsCreate>,
    Json(payload): Json<LeadInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let lead = app_state.lead_service.create(&mut tx, tenant.0, &payload).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(lead))))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "Lead ID")),
    request_body = LeadInput,
    responses(
        (status = 200, description = "Lead updated", body = Envelope<Lead>),
        (status = 404, description = "Lead not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermLeadsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let lead = app_state.lead_service.update(&mut tx, tenant.0, id, &payload).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(Envelope::new(lead))))
}

// =============================================================================
//  ÁREA 3: AÇÕES EM MASSA
// =============================================================================

// PUT /api/leads  { ids, data: { status } }
#[utoipa::path(
    put,
    path = "/api/leads",
    tag = "Leads",
    request_body = BulkRequest<LeadPatch>,
    responses(
        (status = 200, description = "Leads updated", body = Envelope<BulkResult>),
        (status = 400, description = "Empty ids or nothing to update")
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_update_leads(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermLeadsEdit>,
    Json(payload): Json<BulkRequest<LeadPatch>>,
) -> Result<impl IntoResponse, AppError> {
    let patch = payload.data.unwrap_or_default();

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let affected = app_state
        .lead_service
        .bulk_update(&mut *tx, tenant.0, &payload.ids, &patch)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(Envelope::new(BulkResult { affected }))))
}

// DELETE /api/leads  { ids }
#[utoipa::path(
    delete,
    path = "/api/leads",
    tag = "Leads",
    request_body = BulkRequest<LeadPatch>,
    responses(
        (status = 200, description = "Leads deleted", body = Envelope<BulkResult>),
        (status = 400, description = "Empty ids")
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_delete_leads(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermLeadsDelete>,
    Json(payload): Json<BulkRequest<serde_json::Value>>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user).await?;
    let affected = app_state
        .lead_service
        .bulk_delete(&mut *tx, tenant.0, &payload.ids)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(Envelope::new(BulkResult { affected }))))
}
