// src/client/api.rs
//
// Cliente REST tipado. Os fluxos do dashboard dependem só dos traits,
// então os testes trocam a rede por implementações em memória.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    common::response::{BulkRequest, BulkResult, Envelope},
    models::{
        auth::AuthResponse,
        lead::{Lead, LeadInput, LeadPatch, LeadsAnalytics},
        portal::FavoriteToggleResult,
        property::{Paginated, PortalProperty, Property, PropertyFilters, PropertySort},
    },
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    // Corpo `{error, details?}` devolvido pela API
    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        details: Option<serde_json::Value>,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    details: Option<serde_json::Value>,
}

// --- SEAMS ---

/// Ações em massa da tabela de leads
#[async_trait]
pub trait LeadsApi: Send + Sync {
    async fn bulk_update_leads(&self, ids: &[Uuid], patch: &LeadPatch) -> Result<BulkResult, ClientError>;
    async fn bulk_delete_leads(&self, ids: &[Uuid]) -> Result<BulkResult, ClientError>;
}

/// Próximas páginas do portal
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_page(&self, criteria: &PropertyFilters, page: i64) -> Result<Paginated<PortalProperty>, ClientError>;
}

#[async_trait]
pub trait FavoritesApi: Send + Sync {
    async fn toggle_favorite(&self, property_id: Uuid) -> Result<FavoriteToggleResult, ClientError>;
}

// --- CLIENTE HTTP ---

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` é o `PUBLIC_API_URL` do servidor
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorize(request).send().await?;
        read_json(response).await
    }

    // =========================================================================
    //  AUTH
    // =========================================================================

    /// Faz login e guarda o token para as próximas chamadas
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            email: &'a str,
            password: &'a str,
        }

        let auth: AuthResponse = self
            .send(self.http.post(self.url("/api/auth/login")).json(&Credentials { email, password }))
            .await?;
        self.token = Some(auth.token);
        Ok(())
    }

    // =========================================================================
    //  LOADERS DO DASHBOARD
    // =========================================================================

    pub async fn list_leads(&self) -> Result<Vec<Lead>, ClientError> {
        self.send(self.http.get(self.url("/api/leads"))).await
    }

    pub async fn leads_analytics(&self) -> Result<LeadsAnalytics, ClientError> {
        self.send(self.http.get(self.url("/api/leads/analytics"))).await
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>, ClientError> {
        self.send(self.http.get(self.url("/api/properties"))).await
    }

    pub async fn create_lead(&self, input: &LeadInput) -> Result<Lead, ClientError> {
        let envelope: Envelope<Lead> = self.send(self.http.post(self.url("/api/leads")).json(input)).await?;
        Ok(envelope.data)
    }

    // =========================================================================
    //  PORTAL
    // =========================================================================

    pub async fn list_published(
        &self,
        criteria: &PropertyFilters,
        page: i64,
    ) -> Result<Paginated<PortalProperty>, ClientError> {
        let query = filter_query(criteria, page);
        self.send(self.http.get(self.url("/api/portal/properties")).query(&query))
            .await
    }

    pub async fn list_favorites(&self) -> Result<Vec<Property>, ClientError> {
        self.send(self.http.get(self.url("/api/portal/favorites"))).await
    }
}

#[async_trait]
impl LeadsApi for ApiClient {
    async fn bulk_update_leads(&self, ids: &[Uuid], patch: &LeadPatch) -> Result<BulkResult, ClientError> {
        let body = BulkRequest {
            ids: ids.to_vec(),
            data: Some(patch.clone()),
        };
        let envelope: Envelope<BulkResult> = self.send(self.http.put(self.url("/api/leads")).json(&body)).await?;
        Ok(envelope.data)
    }

    async fn bulk_delete_leads(&self, ids: &[Uuid]) -> Result<BulkResult, ClientError> {
        let body: BulkRequest<()> = BulkRequest {
            ids: ids.to_vec(),
            data: None,
        };
        let envelope: Envelope<BulkResult> = self
            .send(self.http.delete(self.url("/api/leads")).json(&body))
            .await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ListingSource for ApiClient {
    async fn fetch_page(&self, criteria: &PropertyFilters, page: i64) -> Result<Paginated<PortalProperty>, ClientError> {
        self.list_published(criteria, page).await
    }
}

#[async_trait]
impl FavoritesApi for ApiClient {
    async fn toggle_favorite(&self, property_id: Uuid) -> Result<FavoriteToggleResult, ClientError> {
        let body = serde_json::json!({ "propertyId": property_id });
        let envelope: Envelope<FavoriteToggleResult> = self
            .send(self.http.post(self.url("/api/portal/favorites")).json(&body))
            .await?;
        Ok(envelope.data)
    }
}

// Sucesso → corpo tipado; falha → `ClientError::Api` com a mensagem do servidor
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    Err(api_error(status, &text))
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status,
            message: parsed.error,
            details: parsed.details,
        },
        Err(_) => ClientError::Api {
            status,
            message: status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
            details: None,
        },
    }
}

/// Filtros em pares de query string. Listas viram chaves repetidas
/// (`propertyTypes=Villa&propertyTypes=Apartment`).
pub fn filter_query(criteria: &PropertyFilters, page: i64) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();

    if let Some(v) = criteria.price_min {
        query.push(("priceMin", v.to_string()));
    }
    if let Some(v) = criteria.price_max {
        query.push(("priceMax", v.to_string()));
    }
    if let Some(v) = criteria.bedrooms {
        query.push(("bedrooms", v.to_string()));
    }
    for t in &criteria.property_types {
        query.push(("propertyTypes", t.as_str().to_string()));
    }
    for s in &criteria.statuses {
        query.push(("statuses", s.as_str().to_string()));
    }
    if let Some(search) = criteria.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query.push(("search", search.to_string()));
    }
    if let Some(sort) = criteria.sort {
        let value = match sort {
            PropertySort::Newest => "newest",
            PropertySort::PriceAsc => "price_asc",
            PropertySort::PriceDesc => "price_desc",
        };
        query.push(("sort", value.to_string()));
    }
    if let Some(limit) = criteria.limit {
        query.push(("limit", limit.to_string()));
    }
    query.push(("page", page.to_string()));

    query
}
