// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{auth::Credentials, users::ProfileRow},
};

const PROFILE_COLUMNS: &str = "id, name, email, permissions, created_at, updated_at";

// Repositório das tabelas `auth_identities` (login) e `profiles` (operador)
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca as credenciais pelo e-mail
    pub async fn find_credentials_by_email(&self, email: &str) -> Result<Option<Credentials>, AppError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, email, password_hash FROM auth_identities WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }

    pub async fn find_credentials_by_id(&self, id: Uuid) -> Result<Option<Credentials>, AppError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, email, password_hash FROM auth_identities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }

    pub async fn find_profile(&self, id: Uuid) -> Result<Option<ProfileRow>, AppError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list_profiles(&self) -> Result<Vec<ProfileRow>, AppError> {
        let sql = format!("SELECT {} FROM profiles ORDER BY name", PROFILE_COLUMNS);
        let rows = sqlx::query_as::<_, ProfileRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn count_profiles(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // Cria a identidade de autenticação
    pub async fn create_identity<'e, E>(&self, executor: E, email: &str, password_hash: &str) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO auth_identities (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn create_profile<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        email: &str,
        permissions: &[String],
    ) -> Result<ProfileRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO profiles (id, name, email, permissions) VALUES ($1, $2, $3, $4) RETURNING {}",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(permissions)
            .fetch_one(executor)
            .await?;
        Ok(row)
    }

    /// Campos `None` ficam como estão.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        permissions: Option<&[String]>,
    ) -> Result<Option<ProfileRow>, AppError> {
        let sql = format!(
            r#"
            UPDATE profiles
            SET name = COALESCE($1, name),
                permissions = COALESCE($2, permissions),
                updated_at = NOW()
            WHERE id = $3
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(name)
            .bind(permissions)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE auth_identities SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Apaga a identidade; o perfil cai junto (ON DELETE CASCADE).
    pub async fn delete_identity(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM auth_identities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
