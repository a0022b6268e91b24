// src/services/user_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::Profile,
        user::{CreateUserPayload, NewProfile, UpdateUserPayload},
    },
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn list_team<'e, E>(&self, executor: E, company_id: Uuid) -> Result<Vec<Profile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_for_company(executor, company_id).await
    }

    /// Criação "elevada": o admin cria o perfil direto, já dentro da empresa dele.
    pub async fn create_team_user<'e, E>(
        &self,
        executor: E,
        admin: &Profile,
        payload: CreateUserPayload,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company_id = admin.company_id.ok_or(AppError::MissingTenant)?;
        let password_hash = hash_password(&payload.password).await?;

        let profile = self
            .repo
            .create_profile(
                executor,
                &NewProfile {
                    email: payload.email,
                    password_hash,
                    full_name: payload.full_name,
                    company_id: Some(company_id),
                    company_name: admin.company_name.clone(),
                    role: payload.role,
                    permissions: payload.permissions,
                    expiry_date: payload.expiry_date,
                },
            )
            .await?;

        tracing::info!(user_id = %profile.id, admin_id = %admin.id, "Team user created");
        Ok(profile)
    }

    pub async fn update_team_user<'e, E>(
        &self,
        executor: E,
        admin: &Profile,
        user_id: Uuid,
        changes: UpdateUserPayload,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company_id = admin.company_id.ok_or(AppError::MissingTenant)?;

        // O admin não pode se desativar sozinho
        if admin.id == user_id && changes.is_disabled == Some(true) {
            return Err(AppError::BadRequest("You cannot disable your own account.".into()));
        }

        self.repo
            .update_profile(executor, company_id, user_id, &changes)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn delete_team_user<'e, E>(&self, executor: E, admin: &Profile, user_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company_id = admin.company_id.ok_or(AppError::MissingTenant)?;

        if admin.id == user_id {
            return Err(AppError::BadRequest("You cannot delete your own account.".into()));
        }

        if !self.repo.delete_profile(executor, company_id, user_id).await? {
            return Err(AppError::NotFound("User"));
        }

        tracing::info!(user_id = %user_id, admin_id = %admin.id, "Team user deleted");
        Ok(())
    }
}
