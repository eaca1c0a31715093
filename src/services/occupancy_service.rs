// src/services/occupancy_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{not_found, AppError},
    db::OccupancyRepository,
    models::occupancy::{
        ConversionResponse, CreateRoomPayload, CreateWorkStationPayload, Room, RoomStatus, SeedResponse,
        StationStatus, StationType, WorkStation,
    },
    services::reconciliation::{self, FlexReplacementPolicy},
};

const FLOORS: [i16; 3] = [1, 2, 3];
const ROOMS_PER_FLOOR: i16 = 4;
const STATIONS_PER_FLOOR: i16 = 10;
const FLEX_PER_FLOOR: i16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SeedRoom {
    pub floor: i16,
    pub number: String,
    pub status: RoomStatus,
    pub area: Decimal,
    pub capacity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedStation {
    pub floor: i16,
    pub number: String,
    pub station_type: StationType,
    pub status: StationStatus,
}

/// Layout fixo usado pelo "Popular Dados": 4 salas e 10 estações por andar,
/// as 3 primeiras estações de cada andar no pool flex.
pub fn seed_layout() -> (Vec<SeedRoom>, Vec<SeedStation>) {
    let mut rooms = Vec::new();
    let mut stations = Vec::new();

    for floor in FLOORS {
        for n in 1..=ROOMS_PER_FLOOR {
            let capacity = i32::from(n) * 2;
            rooms.push(SeedRoom {
                floor,
                number: format!("{}{:02}", floor, n),
                status: RoomStatus::Available,
                // 6 m² por pessoa
                area: Decimal::from(capacity * 6),
                capacity,
            });
        }
        for n in 1..=STATIONS_PER_FLOOR {
            let flex = n <= FLEX_PER_FLOOR;
            stations.push(SeedStation {
                floor,
                number: format!("E{}-{:02}", floor, n),
                station_type: if flex { StationType::Flex } else { StationType::Fixed },
                status: if flex { StationStatus::Flex } else { StationStatus::Available },
            });
        }
    }

    (rooms, stations)
}

#[derive(Clone)]
pub struct OccupancyService {
    repo: OccupancyRepository,
    pool: PgPool,
    policy: FlexReplacementPolicy,
    allow_seed: bool,
}

impl OccupancyService {
    pub fn new(repo: OccupancyRepository, pool: PgPool, policy: FlexReplacementPolicy, allow_seed: bool) -> Self {
        Self { repo, pool, policy, allow_seed }
    }

    // =========================================================================
    //  SALAS
    // =========================================================================

    pub async fn list_rooms(&self) -> Result<Vec<Room>, AppError> {
        self.repo.list_rooms().await
    }

    pub async fn create_room(&self, input: &CreateRoomPayload) -> Result<Room, AppError> {
        self.repo
            .insert_room(&self.pool, input.floor, &input.number, RoomStatus::Available, input.area, input.capacity)
            .await
    }

    pub async fn update_room_status(&self, id: Uuid, status: RoomStatus) -> Result<Room, AppError> {
        self.mutate_room(id, |room| reconciliation::apply_room_status(room, status)).await
    }

    pub async fn link_room_client(&self, id: Uuid, client_id: Uuid) -> Result<Room, AppError> {
        self.mutate_room(id, |room| reconciliation::link_room_client(room, client_id)).await
    }

    pub async fn unlink_room_client(&self, id: Uuid) -> Result<Room, AppError> {
        self.mutate_room(id, reconciliation::unlink_room_client).await
    }

    // Lê com lock, aplica a regra e grava: a resposta é sempre a linha do banco
    async fn mutate_room<F>(&self, id: Uuid, rule: F) -> Result<Room, AppError>
    where
        F: FnOnce(&mut Room),
    {
        let mut tx = self.pool.begin().await?;

        let mut room = self
            .repo
            .find_room_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found("Sala", id))?;
        rule(&mut room);
        let saved = self.repo.save_room(&mut *tx, &room).await?;

        tx.commit().await?;
        Ok(saved)
    }

    // =========================================================================
    //  ESTAÇÕES
    // =========================================================================

    pub async fn list_stations(&self) -> Result<Vec<WorkStation>, AppError> {
        self.repo.list_stations().await
    }

    pub async fn create_station(&self, input: &CreateWorkStationPayload) -> Result<WorkStation, AppError> {
        let status = match input.station_type {
            StationType::Flex => StationStatus::Flex,
            StationType::Fixed => StationStatus::Available,
        };
        self.repo
            .insert_station(&self.pool, input.floor, &input.number, input.station_type, status)
            .await
    }

    pub async fn update_station_status(&self, id: Uuid, status: StationStatus) -> Result<WorkStation, AppError> {
        self.mutate_station(id, |s| reconciliation::apply_station_status(s, status)).await
    }

    pub async fn link_station_client(&self, id: Uuid, client_id: Uuid) -> Result<WorkStation, AppError> {
        self.mutate_station(id, |s| reconciliation::link_station_client(s, client_id)).await
    }

    pub async fn unlink_station_client(&self, id: Uuid) -> Result<WorkStation, AppError> {
        self.mutate_station(id, reconciliation::unlink_station_client).await
    }

    async fn mutate_station<F>(&self, id: Uuid, rule: F) -> Result<WorkStation, AppError>
    where
        F: FnOnce(&mut WorkStation),
    {
        let mut tx = self.pool.begin().await?;

        let mut station = self
            .repo
            .find_station_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found("Estação", id))?;
        rule(&mut station);
        let saved = self.repo.save_station(&mut *tx, &station).await?;

        tx.commit().await?;
        Ok(saved)
    }

    // =========================================================================
    //  POOL FLEX
    // =========================================================================

    /// Converte a estação flex em fixa e repõe o pool, tudo numa transação
    /// com as estações travadas.
    pub async fn convert_flex_to_fixed(&self, station_id: Uuid, client_id: Uuid) -> Result<ConversionResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let stations = self.repo.list_stations_for_update(&mut *tx).await?;
        let conversion = reconciliation::convert_flex_to_fixed(&stations, station_id, client_id, self.policy)?;

        let station = self.repo.save_station(&mut *tx, &conversion.converted).await?;
        let replacement = match &conversion.replacement {
            Some(r) => Some(self.repo.save_station(&mut *tx, r).await?),
            None => None,
        };

        tx.commit().await?;

        match &replacement {
            Some(r) => tracing::info!("🔁 Estação {} virou fixa; {} entrou no pool flex", station.number, r.number),
            None => tracing::warn!(
                "⚠️ Estação {} virou fixa sem reposição: pool flex diminuiu em 1",
                station.number
            ),
        }

        Ok(ConversionResponse {
            flex_pool_shrank: conversion.flex_pool_shrank(),
            station,
            replacement,
        })
    }

    pub async fn allocate_flex(&self, client_id: Uuid) -> Result<WorkStation, AppError> {
        let mut tx = self.pool.begin().await?;

        let stations = self.repo.list_stations_for_update(&mut *tx).await?;
        let change = reconciliation::allocate_flex(&stations, client_id, self.policy)?;
        let saved = self.repo.save_station(&mut *tx, &change.station).await?;

        tx.commit().await?;
        Ok(saved)
    }

    pub async fn release_station(&self, station_id: Uuid) -> Result<WorkStation, AppError> {
        let mut tx = self.pool.begin().await?;

        let stations = self.repo.list_stations_for_update(&mut *tx).await?;
        let change = reconciliation::release_station(&stations, station_id)?;
        let saved = self.repo.save_station(&mut *tx, &change.station).await?;

        tx.commit().await?;
        Ok(saved)
    }

    // =========================================================================
    //  POPULAR DADOS
    // =========================================================================

    /// Apaga salas e estações e recria o layout padrão. Destrutivo.
    pub async fn seed(&self) -> Result<SeedResponse, AppError> {
        if !self.allow_seed {
            return Err(AppError::SeedDisabled);
        }

        let (rooms, stations) = seed_layout();
        let mut tx = self.pool.begin().await?;

        self.repo.delete_all(&mut *tx).await?;
        for r in &rooms {
            self.repo
                .insert_room(&mut *tx, r.floor, &r.number, r.status, r.area, r.capacity)
                .await?;
        }
        for s in &stations {
            self.repo
                .insert_station(&mut *tx, s.floor, &s.number, s.station_type, s.status)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("🌱 Dados de ocupação recriados: {} salas, {} estações", rooms.len(), stations.len());
        Ok(SeedResponse { rooms: rooms.len(), workstations: stations.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_layout_covers_three_floors() {
        let (rooms, stations) = seed_layout();
        assert_eq!(rooms.len(), 12);
        assert_eq!(stations.len(), 30);
        for floor in FLOORS {
            assert_eq!(rooms.iter().filter(|r| r.floor == floor).count(), 4);
        }
    }

    #[test]
    fn seed_layout_puts_three_flex_stations_per_floor() {
        let (_, stations) = seed_layout();
        let flex: Vec<_> = stations.iter().filter(|s| s.status == StationStatus::Flex).collect();
        assert_eq!(flex.len(), 9);
        assert!(flex.iter().all(|s| s.station_type == StationType::Flex));
        assert_eq!(stations[0].number, "E1-01");
    }

    #[test]
    fn seed_layout_numbers_are_unique() {
        let (rooms, stations) = seed_layout();
        let mut numbers: Vec<&str> = rooms.iter().map(|r| r.number.as_str()).collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), rooms.len());

        let mut numbers: Vec<&str> = stations.iter().map(|s| s.number.as_str()).collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), stations.len());
        assert!(rooms.iter().all(|r| r.area > Decimal::ZERO && r.capacity >= 2));
    }
}
