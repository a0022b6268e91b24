// src/db/lead_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::query_failed, error::AppError},
    models::lead::{Lead, LeadAnalyticsRow, LeadEvent, LeadInput, LeadPatch},
};

const LEAD_COLUMNS: &str = r#"
    id, tenant_id, property_id, name, phone, email, message,
    status, source, follow_up_date, notes, created_at, updated_at
"#;

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_for_tenant<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM leads WHERE tenant_id = $1 ORDER BY created_at DESC",
            LEAD_COLUMNS
        );
        sqlx::query_as::<_, Lead>(&sql)
            .bind(tenant_id)
            .fetch_all(executor)
            .await
            .map_err(query_failed("fetch leads"))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, tenant_id: Uuid, id: Uuid) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM leads WHERE tenant_id = $1 AND id = $2", LEAD_COLUMNS);
        sqlx::query_as::<_, Lead>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(query_failed("fetch lead"))
    }

    /// Histórico do lead. O JOIN garante que o lead é do tenant.
    pub async fn list_events<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead_id: Uuid,
    ) -> Result<Vec<LeadEvent>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LeadEvent>(
            r#"
            SELECT e.id, e.lead_id, e.event_type, e.old_value, e.new_value, e.created_at
            FROM lead_events e
            INNER JOIN leads l ON l.id = e.lead_id
            WHERE l.tenant_id = $1 AND e.lead_id = $2
            ORDER BY e.created_at ASC
            "#,
        )
        .bind(tenant_id)
        .bind(lead_id)
        .fetch_all(executor)
        .await
        .map_err(query_failed("fetch lead events"))
    }

    /// Uma única busca de todos os leads do tenant, com o título do imóvel.
    /// A agregação é feita em memória pelo serviço.
    pub async fn fetch_analytics_rows<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<LeadAnalyticsRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LeadAnalyticsRow>(
            r#"
            SELECT l.status, l.source, l.property_id, p.title AS property_title
            FROM leads l
            LEFT JOIN properties p ON p.id = l.property_id
            WHERE l.tenant_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await
        .map_err(query_failed("fetch leads analytics"))
    }

    // ---
    // Escrita
    // ---

    pub async fn create<'e, E>(&self, executor: E, tenant_id: Uuid, input: &LeadInput) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO leads (
                tenant_id, property_id, name, phone, email, message,
                status, source, follow_up_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );
        sqlx::query_as::<_, Lead>(&sql)
            .bind(tenant_id)
            .bind(input.property_id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.message)
            .bind(input.status)
            .bind(input.source)
            .bind(input.follow_up_date)
            .bind(&input.notes)
            .fetch_one(executor)
            .await
            .map_err(query_failed("create lead"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        input: &LeadInput,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE leads SET
                property_id = $3, name = $4, phone = $5, email = $6, message = $7,
                status = $8, source = $9, follow_up_date = $10, notes = $11,
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );
        sqlx::query_as::<_, Lead>(&sql)
            .bind(tenant_id)
            .bind(id)
            .bind(input.property_id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.message)
            .bind(input.status)
            .bind(input.source)
            .bind(input.follow_up_date)
            .bind(&input.notes)
            .fetch_optional(executor)
            .await
            .map_err(query_failed("update lead"))
    }

    /// Atualização em massa: um único UPDATE, tudo ou nada.
    /// Campos ausentes no patch mantêm o valor atual.
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
        let result = sqlx::query(
            r#"
            UPDATE leads SET
                status = COALESCE($3, status),
                follow_up_date = COALESCE($4, follow_up_date),
                notes = COALESCE($5, notes),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(tenant_id)
        .bind(ids)
        .bind(patch.status)
        .bind(patch.follow_up_date)
        .bind(&patch.notes)
        .execute(executor)
        .await
        .map_err(query_failed("update leads"))?;

        Ok(result.rows_affected())
    }

    /// Remoção simples e em massa usam o mesmo caminho (ids com 1 ou N itens).
    pub async fn bulk_delete<'e, E>(&self, executor: E, tenant_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM leads WHERE tenant_id = $1 AND id = ANY($2)")
            .bind(tenant_id)
            .bind(ids)
            .execute(executor)
            .await
            .map_err(query_failed("delete leads"))?;

        Ok(result.rows_affected())
    }

    /// Lead criado a partir de uma consulta do portal (sem RLS, tenant vem do imóvel).
    pub async fn create_from_inquiry(&self, tenant_id: Uuid, input: &LeadInput) -> Result<Lead, AppError> {
        self.create(&self.pool, tenant_id, input).await
    }
}
