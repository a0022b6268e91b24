// src/models/property.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- ENUMS ---

// Mapeia o CREATE TYPE property_type do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "property_type")]
pub enum PropertyType {
    Apartment,
    Villa,
    Townhouse,
    Office,
    Plot,
    Commercial,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Office => "Office",
            PropertyType::Plot => "Plot",
            PropertyType::Commercial => "Commercial",
        }
    }
}

// Os valores do banco têm espaço e hífen ("For Sale", "Off-Plan")
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "property_status")]
pub enum PropertyStatus {
    #[sqlx(rename = "For Sale")]
    #[serde(rename = "For Sale")]
    ForSale,
    #[sqlx(rename = "For Rent")]
    #[serde(rename = "For Rent")]
    ForRent,
    #[sqlx(rename = "Off-Plan")]
    #[serde(rename = "Off-Plan")]
    OffPlan,
    Ready,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::ForSale => "For Sale",
            PropertyStatus::ForRent => "For Rent",
            PropertyStatus::OffPlan => "Off-Plan",
            PropertyStatus::Ready => "Ready",
        }
    }
}

// --- IMÓVEL ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Marina View 2BR")]
    pub title: String,

    #[schema(example = 1850000)]
    pub price: Decimal,

    #[schema(example = "Dubai Marina")]
    pub location: String,

    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: Decimal,

    pub property_type: PropertyType,
    pub status: PropertyStatus,

    // Ordem importa: a primeira é a capa
    pub images: Vec<String>,
    pub amenities: Vec<String>,

    pub is_published: bool,
    pub description: Option<String>,

    // Campos específicos do mercado dos Emirados
    pub handover_date: Option<NaiveDate>,
    pub payment_plan: Option<String>,
    pub rera_id: Option<String>,
    pub roi_estimate: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- FORMULÁRIO (create/update) ---

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("must_not_be_negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Marina View 2BR")]
    pub title: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 1850000)]
    pub price: Decimal,

    #[validate(length(min = 1, message = "required"))]
    pub location: String,

    #[validate(range(min = 0, message = "must_not_be_negative"))]
    #[serde(default)]
    pub bedrooms: i32,

    #[validate(range(min = 0, message = "must_not_be_negative"))]
    #[serde(default)]
    pub bathrooms: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub area: Decimal,

    pub property_type: PropertyType,
    pub status: PropertyStatus,

    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub is_published: bool,
    pub description: Option<String>,

    pub handover_date: Option<NaiveDate>,
    pub payment_plan: Option<String>,
    #[validate(length(max = 32, message = "too_long"))]
    pub rera_id: Option<String>,
    pub roi_estimate: Option<Decimal>,
}

// --- FILTROS DO PORTAL ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertySort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// Filtros opcionais da listagem pública.
/// Campo ausente significa "sem restrição", nunca um valor padrão.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PropertyFilters {
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub property_types: Vec<PropertyType>,
    #[serde(default)]
    pub statuses: Vec<PropertyStatus>,
    pub search: Option<String>,
    pub sort: Option<PropertySort>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// --- PAGINAÇÃO ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// ceil(total / limit), com limite inválido tratado como zero páginas.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

// Imóvel do portal já marcado como favorito (ou não) para o comprador logado
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalProperty {
    #[serde(flatten)]
    pub property: Property,
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 12), 3);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn status_serializes_with_display_names() {
        let json = serde_json::to_string(&PropertyStatus::OffPlan).unwrap();
        assert_eq!(json, "\"Off-Plan\"");
        let parsed: PropertyStatus = serde_json::from_str("\"For Sale\"").unwrap();
        assert_eq!(parsed, PropertyStatus::ForSale);
    }

    #[test]
    fn filters_default_to_no_constraint() {
        let filters: PropertyFilters = serde_json::from_str("{}").unwrap();
        assert_eq!(filters, PropertyFilters::default());
        assert!(filters.property_types.is_empty());
        assert!(filters.price_min.is_none());
    }
}
