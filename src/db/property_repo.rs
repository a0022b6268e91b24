// src/db/property_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{db_utils::query_failed, error::AppError},
    models::property::{Paginated, Property, PropertyFilters, PropertyInput, PropertySort},
};

const PROPERTY_COLUMNS: &str = r#"
    id, tenant_id, title, price, location, bedrooms, bathrooms, area,
    property_type, status, images, amenities, is_published, description,
    handover_date, payment_plan, rera_id, roi_estimate, created_at, updated_at
"#;

/// Teto de itens por página da listagem pública
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  DASHBOARD (escopo do tenant)
    // =========================================================================

    /// Todos os imóveis do tenant. O grid filtra/ordena em memória.
    pub async fn list_for_tenant<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM properties WHERE tenant_id = $1 ORDER BY created_at DESC",
            PROPERTY_COLUMNS
        );
        sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .fetch_all(executor)
            .await
            .map_err(query_failed("fetch properties"))
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM properties WHERE tenant_id = $1 AND id = $2",
            PROPERTY_COLUMNS
        );
        sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(query_failed("fetch property"))
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        input: &PropertyInput,
    ) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO properties (
                tenant_id, title, price, location, bedrooms, bathrooms, area,
                property_type, status, images, amenities, is_published, description,
                handover_date, payment_plan, rera_id, roi_estimate
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        );
        sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .bind(&input.title)
            .bind(input.price)
            .bind(&input.location)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.area)
            .bind(input.property_type)
            .bind(input.status)
            .bind(&input.images)
            .bind(&input.amenities)
            .bind(input.is_published)
            .bind(&input.description)
            .bind(input.handover_date)
            .bind(&input.payment_plan)
            .bind(&input.rera_id)
            .bind(input.roi_estimate)
            .fetch_one(executor)
            .await
            .map_err(query_failed("create property"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        input: &PropertyInput,
    ) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE properties SET
                title = $3, price = $4, location = $5, bedrooms = $6, bathrooms = $7,
                area = $8, property_type = $9, status = $10, images = $11, amenities = $12,
                is_published = $13, description = $14, handover_date = $15,
                payment_plan = $16, rera_id = $17, roi_estimate = $18,
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        );
        sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.title)
            .bind(input.price)
            .bind(&input.location)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.area)
            .bind(input.property_type)
            .bind(input.status)
            .bind(&input.images)
            .bind(&input.amenities)
            .bind(input.is_published)
            .bind(&input.description)
            .bind(input.handover_date)
            .bind(&input.payment_plan)
            .bind(&input.rera_id)
            .bind(input.roi_estimate)
            .fetch_optional(executor)
            .await
            .map_err(query_failed("update property"))
    }

    /// Apaga e devolve a linha removida (usada pela notificação).
    pub async fn delete<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "DELETE FROM properties WHERE tenant_id = $1 AND id = $2 RETURNING {}",
            PROPERTY_COLUMNS
        );
        sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(query_failed("delete property"))
    }

    /// Confere se o imóvel pertence ao tenant (referência do lead).
    pub async fn belongs_to_tenant<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM properties WHERE tenant_id = $1 AND id = $2)",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(query_failed("check property"))?;

        Ok(exists)
    }

    // =========================================================================
    //  PORTAL (somente publicados, sem tenant)
    // =========================================================================

    pub async fn get_published_properties(
        &self,
        filters: &PropertyFilters,
        default_limit: i64,
    ) -> Result<Paginated<Property>, AppError> {
        let (page, limit) = normalize_paging(filters, default_limit);
        let offset = paging_offset(page, limit);

        let mut count_query = build_published_count(filters);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(query_failed("count published properties"))?;

        let mut list_query = build_published_query(filters, limit, offset);
        let data = list_query
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("fetch published properties"))?;

        Ok(Paginated::new(data, total, page, limit))
    }

    pub async fn find_published(&self, id: Uuid) -> Result<Option<Property>, AppError> {
        let sql = format!(
            "SELECT {} FROM properties WHERE id = $1 AND is_published = TRUE",
            PROPERTY_COLUMNS
        );
        sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("fetch published property"))
    }
}

// ---
// Composição da consulta do portal
// ---

pub(crate) fn normalize_paging(filters: &PropertyFilters, default_limit: i64) -> (i64, i64) {
    let page = filters.page.unwrap_or(1).max(1);
    let limit = filters.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

// A página vem da query string sem teto; OFFSET satura em vez de estourar
pub(crate) fn paging_offset(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

// Cada filtro só entra na consulta se estiver presente
fn push_published_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &PropertyFilters) {
    qb.push(" WHERE is_published = TRUE");

    if let Some(min) = filters.price_min {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filters.price_max {
        qb.push(" AND price <= ").push_bind(max);
    }
    if let Some(bedrooms) = filters.bedrooms {
        qb.push(" AND bedrooms >= ").push_bind(bedrooms);
    }
    if !filters.property_types.is_empty() {
        qb.push(" AND property_type IN (");
        let mut separated = qb.separated(", ");
        for property_type in &filters.property_types {
            separated.push_bind(*property_type);
        }
        separated.push_unseparated(")");
    }
    if !filters.statuses.is_empty() {
        qb.push(" AND status IN (");
        let mut separated = qb.separated(", ");
        for status in &filters.statuses {
            separated.push_bind(*status);
        }
        separated.push_unseparated(")");
    }
    if let Some(term) = filters.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

pub(crate) fn build_published_count(filters: &PropertyFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM properties");
    push_published_filters(&mut qb, filters);
    qb
}

pub(crate) fn build_published_query(
    filters: &PropertyFilters,
    limit: i64,
    offset: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM properties", PROPERTY_COLUMNS));
    push_published_filters(&mut qb, filters);

    // id no fim deixa a paginação estável entre requisições
    let order = match filters.sort.unwrap_or_default() {
        PropertySort::Newest => " ORDER BY created_at DESC, id",
        PropertySort::PriceAsc => " ORDER BY price ASC, id",
        PropertySort::PriceDesc => " ORDER BY price DESC, id",
    };
    qb.push(order);
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::property::{PropertyStatus, PropertyType};
    use rust_decimal::Decimal;

    fn compact(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn no_filters_only_constrains_published() {
        let qb = build_published_count(&PropertyFilters::default());
        assert_eq!(
            compact(qb.sql()),
            "SELECT COUNT(*) FROM properties WHERE is_published = TRUE"
        );
    }

    #[test]
    fn price_range_adds_both_bounds() {
        let filters = PropertyFilters {
            price_min: Some(Decimal::from(1_000_000)),
            price_max: Some(Decimal::from(2_000_000)),
            ..Default::default()
        };
        let qb = build_published_count(&filters);
        let sql = compact(qb.sql());
        assert!(sql.contains("AND price >= $1"));
        assert!(sql.contains("AND price <= $2"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn set_membership_binds_each_value() {
        let filters = PropertyFilters {
            property_types: vec![PropertyType::Villa, PropertyType::Townhouse],
            statuses: vec![PropertyStatus::OffPlan],
            ..Default::default()
        };
        let sql = compact(build_published_count(&filters).sql());
        assert!(sql.contains("AND property_type IN ($1, $2)"));
        assert!(sql.contains("AND status IN ($3)"));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filters = PropertyFilters {
            search: Some("   ".into()),
            ..Default::default()
        };
        let sql = compact(build_published_count(&filters).sql());
        assert!(!sql.contains("ILIKE"));

        let filters = PropertyFilters {
            search: Some("marina".into()),
            ..Default::default()
        };
        let sql = compact(build_published_count(&filters).sql());
        assert!(sql.contains("(title ILIKE $1 OR location ILIKE $2)"));
    }

    #[test]
    fn list_query_sorts_and_paginates_last() {
        let filters = PropertyFilters {
            bedrooms: Some(2),
            sort: Some(PropertySort::PriceAsc),
            ..Default::default()
        };
        let sql = compact(build_published_query(&filters, 12, 24).sql());
        assert!(sql.contains("AND bedrooms >= $1"));
        assert!(sql.ends_with("ORDER BY price ASC, id LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn paging_is_clamped() {
        let filters = PropertyFilters {
            page: Some(0),
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(normalize_paging(&filters, 12), (1, MAX_PAGE_SIZE));
        assert_eq!(normalize_paging(&PropertyFilters::default(), 12), (1, 12));
    }

    #[test]
    fn huge_page_saturates_the_offset() {
        let filters = PropertyFilters {
            page: Some(i64::MAX),
            limit: Some(100),
            ..Default::default()
        };
        let (page, limit) = normalize_paging(&filters, 12);
        assert_eq!((page, limit), (i64::MAX, 100));
        assert_eq!(paging_offset(page, limit), i64::MAX);
        assert_eq!(paging_offset(3, 12), 24);
        assert_eq!(paging_offset(1, 12), 0);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
