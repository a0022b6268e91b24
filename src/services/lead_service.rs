// src/services/lead_service.rs

use std::collections::{BTreeMap, HashMap};

use sqlx::{Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LeadRepository, PropertyRepository},
    models::lead::{
        Lead, LeadAnalyticsRow, LeadEvent, LeadInput, LeadPatch, LeadSource, LeadStatus, LeadsAnalytics,
        PropertyLeadCount,
    },
};

/// Quantos imóveis entram no ranking do dashboard
pub const TOP_PROPERTIES: usize = 5;

// Campos de uma consulta vinda do portal
#[derive(Debug, Clone)]
pub struct Inquiry {
    pub property_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct LeadService {
    lead_repo: LeadRepository,
    property_repo: PropertyRepository,
}

impl LeadService {
    pub fn new(lead_repo: LeadRepository, property_repo: PropertyRepository) -> Self {
        Self { lead_repo, property_repo }
    }

    // =========================================================================
    //  1. LEITURA
    // =========================================================================

    pub async fn list<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.lead_repo.list_for_tenant(executor, tenant_id).await
    }

    /// Histórico de auditoria. A aplicação só lê esta tabela.
    pub async fn list_events(&self, conn: &mut PgConnection, tenant_id: Uuid, lead_id: Uuid) -> Result<Vec<LeadEvent>, AppError> {
        if self.lead_repo.find_by_id(&mut *conn, tenant_id, lead_id).await?.is_none() {
            return Err(AppError::NotFound("Lead"));
        }
        self.lead_repo.list_events(&mut *conn, tenant_id, lead_id).await
    }

    pub async fn get_leads_analytics<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<LeadsAnalytics, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self.lead_repo.fetch_analytics_rows(executor, tenant_id).await?;
        Ok(summarize_leads(&rows))
    }

    // =========================================================================
    //  2. ESCRITA (dashboard)
    // =========================================================================

    pub async fn create(&self, conn: &mut PgConnection, tenant_id: Uuid, input: &LeadInput) -> Result<Lead, AppError> {
        self.ensure_property_in_tenant(conn, tenant_id, input.property_id).await?;

        let lead = self.lead_repo.create(&mut *conn, tenant_id, input).await?;
        tracing::info!(lead_id = %lead.id, tenant_id = %tenant_id, "Lead created");
        Ok(lead)
    }

    pub async fn update(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        id: Uuid,
        input: &LeadInput,
    ) -> Result<Lead, AppError> {
        self.ensure_property_in_tenant(conn, tenant_id, input.property_id).await?;

        self.lead_repo
            .update(&mut *conn, tenant_id, id, input)
            .await?
            .ok_or(AppError::NotFound("Lead"))
    }

    /// PUT /api/leads: um único UPDATE para todos os ids
    pub async fn bulk_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        ids: &[Uuid],
        patch: &LeadPatch,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if ids.is_empty() {
            return Err(AppError::BadRequest("No lead ids were provided.".into()));
        }
        if patch.is_empty() {
            return Err(AppError::BadRequest("Nothing to update.".into()));
        }

        let affected = self.lead_repo.bulk_update(executor, tenant_id, ids, patch).await?;
        tracing::info!(tenant_id = %tenant_id, requested = ids.len(), affected, "Leads updated in bulk");
        Ok(affected)
    }

    /// DELETE /api/leads: remoção simples é o mesmo contrato com um id
    pub async fn bulk_delete<'e, E>(&self, executor: E, tenant_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if ids.is_empty() {
            return Err(AppError::BadRequest("No lead ids were provided.".into()));
        }

        let affected = self.lead_repo.bulk_delete(executor, tenant_id, ids).await?;
        tracing::info!(tenant_id = %tenant_id, requested = ids.len(), affected, "Leads deleted");
        Ok(affected)
    }

    // =========================================================================
    //  3. PORTAL
    // =========================================================================

    /// Consulta do portal vira lead no tenant dono do imóvel.
    pub async fn create_from_inquiry(&self, inquiry: Inquiry) -> Result<Lead, AppError> {
        let property = self
            .property_repo
            .find_published(inquiry.property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;

        let input = LeadInput {
            property_id: Some(property.id),
            name: inquiry.name,
            phone: inquiry.phone,
            email: inquiry.email,
            message: inquiry.message,
            status: LeadStatus::New,
            source: LeadSource::Portal,
            follow_up_date: None,
            notes: None,
        };

        let lead = self.lead_repo.create_from_inquiry(property.tenant_id, &input).await?;
        tracing::info!(lead_id = %lead.id, property_id = %property.id, "Portal inquiry received");
        Ok(lead)
    }

    async fn ensure_property_in_tenant(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        property_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let Some(property_id) = property_id else {
            return Ok(());
        };

        if !self.property_repo.belongs_to_tenant(&mut *conn, tenant_id, property_id).await? {
            return Err(AppError::BadRequest("The selected property does not exist.".into()));
        }
        Ok(())
    }
}

/// Agregação em memória sobre os leads já carregados.
/// Empates no ranking mantêm a ordem de chegada.
pub fn summarize_leads(rows: &[LeadAnalyticsRow]) -> LeadsAnalytics {
    let mut by_source: BTreeMap<LeadSource, u64> = BTreeMap::new();
    let mut by_status: BTreeMap<LeadStatus, u64> = BTreeMap::new();

    let mut ranking: Vec<PropertyLeadCount> = Vec::new();
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        *by_source.entry(row.source).or_default() += 1;
        *by_status.entry(row.status).or_default() += 1;

        if let Some(property_id) = row.property_id {
            match positions.get(&property_id) {
                Some(&idx) => ranking[idx].lead_count += 1,
                None => {
                    positions.insert(property_id, ranking.len());
                    ranking.push(PropertyLeadCount {
                        property_id,
                        title: row.property_title.clone(),
                        lead_count: 1,
                    });
                }
            }
        }
    }

    // sort_by é estável
    ranking.sort_by(|a, b| b.lead_count.cmp(&a.lead_count));
    ranking.truncate(TOP_PROPERTIES);

    let total = rows.len() as u64;
    let won = by_status.get(&LeadStatus::Won).copied().unwrap_or(0);

    LeadsAnalytics {
        total,
        by_source,
        by_status,
        conversion_rate: conversion_rate(won, total),
        top_properties: ranking,
    }
}

fn conversion_rate(won: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((won as f64 * 100.0) / total as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: LeadStatus, source: LeadSource, property: Option<Uuid>) -> LeadAnalyticsRow {
        LeadAnalyticsRow {
            status,
            source,
            property_id: property,
            property_title: property.map(|id| format!("Property {}", &id.to_string()[..4])),
        }
    }

    #[test]
    fn conversion_rate_is_rounded() {
        let rows = vec![
            row(LeadStatus::Won, LeadSource::Website, None),
            row(LeadStatus::Won, LeadSource::Portal, None),
            row(LeadStatus::Lost, LeadSource::Website, None),
        ];

        let summary = summarize_leads(&rows);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.conversion_rate, 67);
        assert_eq!(
            summary.by_status,
            BTreeMap::from([(LeadStatus::Won, 2), (LeadStatus::Lost, 1)])
        );
        assert_eq!(
            summary.by_source,
            BTreeMap::from([(LeadSource::Website, 2), (LeadSource::Portal, 1)])
        );
    }

    #[test]
    fn empty_tenant_has_zero_conversion() {
        let summary = summarize_leads(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.conversion_rate, 0);
        assert!(summary.top_properties.is_empty());
    }

    #[test]
    fn top_properties_keeps_five_with_ties_in_fetch_order() {
        let ids: Vec<Uuid> = (0..7).map(|_| Uuid::new_v4()).collect();
        let mut rows = Vec::new();
        // ids[6] tem 3 leads, ids[3] tem 2, o resto 1
        for (i, id) in ids.iter().enumerate() {
            rows.push(row(LeadStatus::New, LeadSource::Other, Some(*id)));
            if i == 3 || i == 6 {
                rows.push(row(LeadStatus::New, LeadSource::Other, Some(*id)));
            }
            if i == 6 {
                rows.push(row(LeadStatus::New, LeadSource::Other, Some(*id)));
            }
        }
        rows.push(row(LeadStatus::New, LeadSource::Other, None));

        let summary = summarize_leads(&rows);
        let ranked: Vec<Uuid> = summary.top_properties.iter().map(|p| p.property_id).collect();

        assert_eq!(ranked, vec![ids[6], ids[3], ids[0], ids[1], ids[2]]);
        assert_eq!(summary.top_properties[0].lead_count, 3);
    }

    #[test]
    fn conversion_helper_handles_edges() {
        assert_eq!(conversion_rate(0, 10), 0);
        assert_eq!(conversion_rate(10, 10), 100);
        assert_eq!(conversion_rate(1, 8), 13);
    }
}
