use sqlx::{Postgres, Transaction};

use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::tenancy::TenantContext;

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Abre uma transação e define as variáveis RLS (a "chave").
/// `set_config(..., true)` vale só dentro da transação, então a conexão
/// volta limpa para a pool depois do commit/rollback.
pub(crate) async fn begin_rls_transaction(
    app_state: &AppState,
    tenant_ctx: &TenantContext,
    user: &AuthenticatedUser,
) -> Result<Transaction<'static, Postgres>, AppError> {
    // 1. Inicia a transação
    let mut tx = app_state.db_pool.begin().await?;

    // 2. Define Tenant ID
    sqlx::query("SELECT set_config('app.tenant_id', $1, true)")
        .bind(tenant_ctx.0.to_string())
        .execute(&mut *tx)
        .await?;

    // 3. Define User ID
    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user.0.id.to_string())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

/// Loga e embrulha o erro de uma consulta com contexto.
/// Uso: `.map_err(query_failed("fetch leads"))?`
pub(crate) fn query_failed(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |source| {
        tracing::error!(error = %source, "Failed to {}", context);
        AppError::Query { context, source }
    }
}
