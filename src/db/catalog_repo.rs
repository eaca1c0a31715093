// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Benefit, PlanPrice, PlanPricePayload, ServiceBenefitRow, ServicePayload, ServiceRow},
};

const SERVICE_COLUMNS: &str = "id, name, kind, description, active, created_at, updated_at";
const PRICE_COLUMNS: &str = "id, service_id, period, price, installments, discount";

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SERVIÇOS
    // =========================================================================

    pub async fn list_services(&self) -> Result<Vec<ServiceRow>, AppError> {
        let sql = format!("SELECT {} FROM services ORDER BY name", SERVICE_COLUMNS);
        let rows = sqlx::query_as::<_, ServiceRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn find_service<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ServiceRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM services WHERE id = $1", SERVICE_COLUMNS);
        let row = sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn insert_service<'e, E>(&self, executor: E, input: &ServicePayload) -> Result<ServiceRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO services (name, kind, description, active) VALUES ($1, $2, $3, $4) RETURNING {}",
            SERVICE_COLUMNS
        );
        sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(&input.name)
            .bind(input.kind)
            .bind(&input.description)
            .bind(input.active)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_db(e, &format!("Serviço '{}'", input.name)))
    }

    pub async fn update_service<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &ServicePayload,
    ) -> Result<Option<ServiceRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE services
            SET name = $1, kind = $2, description = $3, active = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {}
            "#,
            SERVICE_COLUMNS
        );
        sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(&input.name)
            .bind(input.kind)
            .bind(&input.description)
            .bind(input.active)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_db(e, &format!("Serviço '{}'", input.name)))
    }

    /// Serviços contratados por algum cliente não podem sair (FK restrict).
    pub async fn delete_service<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ResourceInUse("Serviço".into());
                    }
                }
                AppError::DatabaseError(e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PREÇOS
    // =========================================================================

    pub async fn list_all_prices(&self) -> Result<Vec<PlanPrice>, AppError> {
        let sql = format!("SELECT {} FROM plan_prices ORDER BY price", PRICE_COLUMNS);
        let rows = sqlx::query_as::<_, PlanPrice>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn list_prices<'e, E>(&self, executor: E, service_id: Uuid) -> Result<Vec<PlanPrice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM plan_prices WHERE service_id = $1 ORDER BY price",
            PRICE_COLUMNS
        );
        let rows = sqlx::query_as::<_, PlanPrice>(&sql)
            .bind(service_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn insert_price<'e, E>(
        &self,
        executor: E,
        service_id: Uuid,
        input: &PlanPricePayload,
    ) -> Result<PlanPrice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO plan_prices (service_id, period, price, installments, discount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            PRICE_COLUMNS
        );
        let price = sqlx::query_as::<_, PlanPrice>(&sql)
            .bind(service_id)
            .bind(input.period)
            .bind(input.price)
            .bind(input.installments)
            .bind(input.discount)
            .fetch_one(executor)
            .await?;
        Ok(price)
    }

    pub async fn delete_prices<'e, E>(&self, executor: E, service_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM plan_prices WHERE service_id = $1")
            .bind(service_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  BENEFÍCIOS
    // =========================================================================

    pub async fn list_benefits(&self) -> Result<Vec<Benefit>, AppError> {
        let rows = sqlx::query_as::<_, Benefit>("SELECT id, description FROM benefits ORDER BY description")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn insert_benefit(&self, description: &str) -> Result<Benefit, AppError> {
        sqlx::query_as::<_, Benefit>("INSERT INTO benefits (description) VALUES ($1) RETURNING id, description")
            .bind(description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_db(e, &format!("Benefício '{}'", description)))
    }

    pub async fn list_all_service_benefits(&self) -> Result<Vec<ServiceBenefitRow>, AppError> {
        let rows = sqlx::query_as::<_, ServiceBenefitRow>(
            r#"
            SELECT sb.service_id, b.id, b.description
            FROM service_benefits sb
            JOIN benefits b ON b.id = sb.benefit_id
            ORDER BY b.description
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_service_benefits<'e, E>(
        &self,
        executor: E,
        service_id: Uuid,
    ) -> Result<Vec<ServiceBenefitRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ServiceBenefitRow>(
            r#"
            SELECT sb.service_id, b.id, b.description
            FROM service_benefits sb
            JOIN benefits b ON b.id = sb.benefit_id
            WHERE sb.service_id = $1
            ORDER BY b.description
            "#,
        )
        .bind(service_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn clear_service_benefits<'e, E>(&self, executor: E, service_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM service_benefits WHERE service_id = $1")
            .bind(service_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Inserção em massa usando UNNEST
    pub async fn link_service_benefits<'e, E>(
        &self,
        executor: E,
        service_id: Uuid,
        benefit_ids: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO service_benefits (service_id, benefit_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(service_id)
        .bind(benefit_ids)
        .execute(executor)
        .await
        .map_err(|e| AppError::from_db(e, "Benefício"))?;
        Ok(())
    }
}
