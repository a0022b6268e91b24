// src/db/user_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::query_failed, error::AppError},
    models::{
        auth::Profile,
        user::{NewProfile, UpdateUserPayload},
    },
};

const PROFILE_COLUMNS: &str = r#"
    id, email, password_hash, full_name, company_id, company_name, role,
    permissions, notification_preferences, is_disabled, expiry_date,
    created_at, updated_at
"#;

// O repositório de perfis, responsável por todas as interações com a tabela 'profiles'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um perfil pelo e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {} FROM profiles WHERE lower(email) = lower($1)", PROFILE_COLUMNS);
        sqlx::query_as::<_, Profile>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("fetch profile"))
    }

    // Busca um perfil pelo ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("fetch profile"))
    }

    /// Equipe da imobiliária (compradores do portal ficam de fora)
    pub async fn list_for_company<'e, E>(&self, executor: E, company_id: Uuid) -> Result<Vec<Profile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM profiles WHERE company_id = $1 AND role <> 'buyer' ORDER BY created_at ASC",
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(company_id)
            .fetch_all(executor)
            .await
            .map_err(query_failed("fetch users"))
    }

    // Cria um novo perfil.
    // Com tratamento de erro específico para e-mails duplicados.
    pub async fn create_profile<'e, E>(&self, executor: E, profile: &NewProfile) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO profiles (
                email, password_hash, full_name, company_id, company_name,
                role, permissions, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(&profile.email)
            .bind(&profile.password_hash)
            .bind(&profile.full_name)
            .bind(profile.company_id)
            .bind(&profile.company_name)
            .bind(profile.role)
            .bind(Json(&profile.permissions))
            .bind(profile.expiry_date)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                query_failed("create user")(e)
            })
    }

    pub async fn update_profile<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        changes: &UpdateUserPayload,
    ) -> Result<Option<Profile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($3, full_name),
                role = COALESCE($4, role),
                permissions = COALESCE($5, permissions),
                notification_preferences = COALESCE($6, notification_preferences),
                is_disabled = COALESCE($7, is_disabled),
                expiry_date = COALESCE($8, expiry_date),
                updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(company_id)
            .bind(id)
            .bind(&changes.full_name)
            .bind(changes.role)
            .bind(changes.permissions.as_ref().map(Json))
            .bind(changes.notification_preferences.as_ref().map(Json))
            .bind(changes.is_disabled)
            .bind(changes.expiry_date)
            .fetch_optional(executor)
            .await
            .map_err(query_failed("update user"))
    }

    pub async fn delete_profile<'e, E>(&self, executor: E, company_id: Uuid, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM profiles WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(executor)
            .await
            .map_err(query_failed("delete user"))?;

        Ok(result.rows_affected() > 0)
    }
}
