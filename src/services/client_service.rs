// src/services/client_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{not_found, AppError},
    db::{ClientRepository, OccupancyRepository},
    models::clients::{Client, ClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    occupancy_repo: OccupancyRepository,
    pool: PgPool,
}

impl ClientService {
    pub fn new(repo: ClientRepository, occupancy_repo: OccupancyRepository, pool: PgPool) -> Self {
        Self { repo, occupancy_repo, pool }
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        let rows = self.repo.list_clients().await?;
        let contracts = self.repo.list_all_contracts().await?;
        Ok(Client::assemble(rows, contracts))
    }

    pub async fn get_client(&self, id: Uuid) -> Result<Client, AppError> {
        let row = self
            .repo
            .find_client(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("Cliente", id))?;
        let contracts = self.repo.list_contracts(&self.pool, id).await?;
        Ok(Client::from_rows(row, contracts))
    }

    /// Cliente + contratos em uma transação.
    pub async fn create_client(&self, input: &ClientPayload) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = self.repo.insert_client(&mut *tx, input).await?;
        let mut contracts = Vec::with_capacity(input.services.len());
        for service in &input.services {
            contracts.push(self.repo.insert_contract(&mut *tx, row.id, service).await?);
        }

        tx.commit().await?;

        tracing::info!("🤝 Cliente '{}' criado com {} contrato(s)", row.name, contracts.len());
        Ok(Client::from_rows(row, contracts))
    }

    /// PUT: substitui os dados e a lista de contratos.
    pub async fn update_client(&self, id: Uuid, input: &ClientPayload) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = self
            .repo
            .update_client(&mut *tx, id, input)
            .await?
            .ok_or_else(|| not_found("Cliente", id))?;

        self.repo.delete_contracts(&mut *tx, id).await?;
        let mut contracts = Vec::with_capacity(input.services.len());
        for service in &input.services {
            contracts.push(self.repo.insert_contract(&mut *tx, id, service).await?);
        }

        tx.commit().await?;
        Ok(Client::from_rows(row, contracts))
    }

    /// Solta salas e estações do cliente antes de apagá-lo.
    pub async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let rooms = self.occupancy_repo.release_client_rooms(&mut *tx, id).await?;
        let stations = self.occupancy_repo.release_client_stations(&mut *tx, id).await?;

        if !self.repo.delete_client(&mut *tx, id).await? {
            return Err(not_found("Cliente", id));
        }

        tx.commit().await?;

        tracing::info!(
            "🗑️ Cliente {} removido ({} sala(s) e {} estação(ões) liberadas)",
            id,
            rooms,
            stations
        );
        Ok(())
    }
}
