// src/services/catalog_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{not_found, AppError},
    db::CatalogRepository,
    models::catalog::{Benefit, Service, ServicePayload, ServiceRow},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        let rows = self.repo.list_services().await?;
        let prices = self.repo.list_all_prices().await?;
        let benefits = self.repo.list_all_service_benefits().await?;
        Ok(Service::assemble(rows, prices, benefits))
    }

    pub async fn get_service(&self, id: Uuid) -> Result<Service, AppError> {
        let row = self
            .repo
            .find_service(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("Serviço", id))?;
        self.load_children(row).await
    }

    pub async fn create_service(&self, input: &ServicePayload) -> Result<Service, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = self.repo.insert_service(&mut *tx, input).await?;
        for price in &input.prices {
            self.repo.insert_price(&mut *tx, row.id, price).await?;
        }
        if !input.benefit_ids.is_empty() {
            self.repo.link_service_benefits(&mut *tx, row.id, &input.benefit_ids).await?;
        }

        tx.commit().await?;

        tracing::info!("📦 Serviço '{}' criado", row.name);
        self.load_children(row).await
    }

    /// Substitui preços e benefícios junto com os dados do serviço.
    pub async fn update_service(&self, id: Uuid, input: &ServicePayload) -> Result<Service, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = self
            .repo
            .update_service(&mut *tx, id, input)
            .await?
            .ok_or_else(|| not_found("Serviço", id))?;

        self.repo.delete_prices(&mut *tx, id).await?;
        for price in &input.prices {
            self.repo.insert_price(&mut *tx, id, price).await?;
        }

        self.repo.clear_service_benefits(&mut *tx, id).await?;
        if !input.benefit_ids.is_empty() {
            self.repo.link_service_benefits(&mut *tx, id, &input.benefit_ids).await?;
        }

        tx.commit().await?;
        self.load_children(row).await
    }

    pub async fn delete_service(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_service(&self.pool, id).await? {
            return Err(not_found("Serviço", id));
        }
        Ok(())
    }

    pub async fn list_benefits(&self) -> Result<Vec<Benefit>, AppError> {
        self.repo.list_benefits().await
    }

    pub async fn create_benefit(&self, description: &str) -> Result<Benefit, AppError> {
        self.repo.insert_benefit(description.trim()).await
    }

    async fn load_children(&self, row: ServiceRow) -> Result<Service, AppError> {
        let prices = self.repo.list_prices(&self.pool, row.id).await?;
        let benefits = self.repo.list_service_benefits(&self.pool, row.id).await?;
        Ok(Service::assemble(vec![row], prices, benefits)
            .pop()
            .ok_or_else(|| anyhow::anyhow!("serviço montado sem linha"))?)
    }
}
