// src/models/lead.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema,
)]
#[sqlx(type_name = "lead_status")]
pub enum LeadStatus {
    New,
    Contacted,
    Viewing,
    Negotiation,
    Won,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Viewing => "Viewing",
            LeadStatus::Negotiation => "Negotiation",
            LeadStatus::Won => "Won",
            LeadStatus::Lost => "Lost",
        }
    }
}

// "portal" fica minúsculo: é o valor gravado pelas consultas do portal
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema,
)]
#[sqlx(type_name = "lead_source")]
pub enum LeadSource {
    WhatsApp,
    Website,
    Referral,
    Other,
    #[sqlx(rename = "portal")]
    #[serde(rename = "portal")]
    Portal,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::WhatsApp => "WhatsApp",
            LeadSource::Website => "Website",
            LeadSource::Referral => "Referral",
            LeadSource::Other => "Other",
            LeadSource::Portal => "portal",
        }
    }
}

// --- LEAD ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    // Referência fraca: o imóvel pode ter sido apagado
    pub property_id: Option<Uuid>,

    #[schema(example = "Omar Khalid")]
    pub name: String,
    #[schema(example = "+971501234567")]
    pub phone: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,

    pub status: LeadStatus,
    pub source: LeadSource,

    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_status() -> LeadStatus {
    LeadStatus::New
}

fn default_source() -> LeadSource {
    LeadSource::Other
}

// Formulário de lead do dashboard (create e update)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    pub property_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    #[validate(length(min = 6, max = 20, message = "invalid_phone"))]
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    pub message: Option<String>,

    #[serde(default = "default_status")]
    pub status: LeadStatus,

    #[serde(default = "default_source")]
    pub source: LeadSource,

    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

// Histórico de alterações (somente leitura)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadEvent {
    pub id: Uuid,
    pub lead_id: Uuid,
    #[schema(example = "status_changed")]
    pub event_type: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Campos alteráveis em massa (PUT /api/leads)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeadPatch {
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.follow_up_date.is_none() && self.notes.is_none()
    }
}

// --- ANALYTICS ---

// Linha crua usada pela agregação em memória
#[derive(Debug, Clone, FromRow)]
pub struct LeadAnalyticsRow {
    pub status: LeadStatus,
    pub source: LeadSource,
    pub property_id: Option<Uuid>,
    pub property_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLeadCount {
    pub property_id: Uuid,
    pub title: Option<String>,
    pub lead_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadsAnalytics {
    pub total: u64,
    #[schema(value_type = Object)]
    pub by_source: BTreeMap<LeadSource, u64>,
    #[schema(value_type = Object)]
    pub by_status: BTreeMap<LeadStatus, u64>,
    /// Percentual inteiro: round(won * 100 / total)
    pub conversion_rate: u32,
    pub top_properties: Vec<PropertyLeadCount>,
}
