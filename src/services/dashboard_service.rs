// src/services/dashboard_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{ClientRepository, OccupancyRepository},
    models::{
        clients::{Client, ClientRow, ClientService},
        dashboard::{DashboardSummary, LocationStats},
        occupancy::{Room, RoomStatus, StationStatus, WorkStation},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    occupancy_repo: OccupancyRepository,
    client_repo: ClientRepository,
}

impl DashboardService {
    pub fn new(occupancy_repo: OccupancyRepository, client_repo: ClientRepository) -> Self {
        Self { occupancy_repo, client_repo }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let rooms = self.occupancy_repo.list_rooms().await?;
        let stations = self.occupancy_repo.list_stations().await?;
        let clients: Vec<ClientRow> = self.client_repo.list_clients().await?;
        let contracts = self.client_repo.list_all_contracts().await?;
        let clients = Client::assemble(clients, contracts);

        Ok(summarize(&rooms, &stations, &clients, Utc::now().date_naive()))
    }
}

fn rate(occupied: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        occupied as f64 / total as f64
    }
}

fn room_stats(rooms: &[Room]) -> LocationStats {
    let mut stats = LocationStats { total: rooms.len(), ..Default::default() };
    for room in rooms {
        match room.status {
            RoomStatus::Available => stats.available += 1,
            RoomStatus::Occupied => stats.occupied += 1,
            RoomStatus::Reserved => stats.reserved += 1,
            RoomStatus::Maintenance => stats.maintenance += 1,
        }
    }
    stats.occupancy_rate = rate(stats.occupied, stats.total);
    stats
}

fn station_stats(stations: &[WorkStation]) -> LocationStats {
    let mut stats = LocationStats { total: stations.len(), ..Default::default() };
    for station in stations {
        match station.status {
            StationStatus::Available => stats.available += 1,
            StationStatus::Occupied => stats.occupied += 1,
            StationStatus::Flex => stats.flex += 1,
            StationStatus::Reserved => stats.reserved += 1,
            StationStatus::Maintenance => stats.maintenance += 1,
        }
    }
    stats.occupancy_rate = rate(stats.occupied, stats.total);
    stats
}

/// Monta os cards do painel. Receita mensal = soma dos contratos vigentes
/// em `today` de clientes ativos.
pub fn summarize(rooms: &[Room], stations: &[WorkStation], clients: &[Client], today: NaiveDate) -> DashboardSummary {
    let active: Vec<&Client> = clients.iter().filter(|c| c.active).collect();
    let contracts: Vec<&ClientService> = active
        .iter()
        .flat_map(|c| c.services.iter())
        .filter(|s| s.is_active_on(today))
        .collect();

    DashboardSummary {
        rooms: room_stats(rooms),
        workstations: station_stats(stations),
        active_clients: active.len(),
        active_contracts: contracts.len(),
        monthly_revenue: contracts.iter().map(|s| s.value).sum::<Decimal>(),
    }
}
