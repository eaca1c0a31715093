// src/db/client_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::clients::{ClientPayload, ClientRow, ClientService, ClientServicePayload},
};

const CLIENT_COLUMNS: &str =
    "id, name, document, email, phone, contact_name, notes, active, created_at, updated_at";
const CONTRACT_COLUMNS: &str =
    "id, client_id, service_id, location_ids, start_date, end_date, value";

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_clients(&self) -> Result<Vec<ClientRow>, AppError> {
        let sql = format!("SELECT {} FROM clients ORDER BY name", CLIENT_COLUMNS);
        let rows = sqlx::query_as::<_, ClientRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Todos os contratos de uma vez; o serviço agrupa por cliente.
    pub async fn list_all_contracts(&self) -> Result<Vec<ClientService>, AppError> {
        let sql = format!("SELECT {} FROM client_services ORDER BY start_date", CONTRACT_COLUMNS);
        let rows = sqlx::query_as::<_, ClientService>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn find_client<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ClientRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM clients WHERE id = $1", CLIENT_COLUMNS);
        let row = sqlx::query_as::<_, ClientRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn list_contracts<'e, E>(&self, executor: E, client_id: Uuid) -> Result<Vec<ClientService>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM client_services WHERE client_id = $1 ORDER BY start_date",
            CONTRACT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ClientService>(&sql)
            .bind(client_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn insert_client<'e, E>(&self, executor: E, input: &ClientPayload) -> Result<ClientRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO clients (name, document, email, phone, contact_name, notes, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        );
        sqlx::query_as::<_, ClientRow>(&sql)
            .bind(&input.name)
            .bind(&input.document)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.contact_name)
            .bind(&input.notes)
            .bind(input.active)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_db(e, "Cliente com este documento"))
    }

    pub async fn update_client<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &ClientPayload,
    ) -> Result<Option<ClientRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE clients
            SET name = $1, document = $2, email = $3, phone = $4,
                contact_name = $5, notes = $6, active = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        );
        sqlx::query_as::<_, ClientRow>(&sql)
            .bind(&input.name)
            .bind(&input.document)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.contact_name)
            .bind(&input.notes)
            .bind(input.active)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_db(e, "Cliente com este documento"))
    }

    pub async fn insert_contract<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        input: &ClientServicePayload,
    ) -> Result<ClientService, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO client_services (client_id, service_id, location_ids, start_date, end_date, value)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CONTRACT_COLUMNS
        );
        sqlx::query_as::<_, ClientService>(&sql)
            .bind(client_id)
            .bind(input.service_id)
            .bind(&input.location_ids)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.value)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_db(e, &format!("Serviço {}", input.service_id)))
    }

    pub async fn delete_contracts<'e, E>(&self, executor: E, client_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM client_services WHERE client_id = $1")
            .bind(client_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Remove o cliente; os contratos caem junto (ON DELETE CASCADE).
    pub async fn delete_client<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
