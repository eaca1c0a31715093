// src/db/occupancy_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::occupancy::{Room, RoomStatus, StationStatus, StationType, WorkStation},
};

const ROOM_COLUMNS: &str =
    "id, floor, number, status, client_id, area, capacity, created_at, updated_at";
const STATION_COLUMNS: &str =
    "id, floor, number, station_type, status, client_id, created_at, updated_at";

#[derive(Clone)]
pub struct OccupancyRepository {
    pool: PgPool,
}

impl OccupancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SALAS
    // =========================================================================

    pub async fn list_rooms(&self) -> Result<Vec<Room>, AppError> {
        let sql = format!("SELECT {} FROM rooms ORDER BY floor, number", ROOM_COLUMNS);
        let rooms = sqlx::query_as::<_, Room>(&sql).fetch_all(&self.pool).await?;
        Ok(rooms)
    }

    /// Busca a sala travando a linha até o fim da transação.
    pub async fn find_room_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM rooms WHERE id = $1 FOR UPDATE", ROOM_COLUMNS);
        let room = sqlx::query_as::<_, Room>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(room)
    }

    pub async fn insert_room<'e, E>(
        &self,
        executor: E,
        floor: i16,
        number: &str,
        status: RoomStatus,
        area: Decimal,
        capacity: i32,
    ) -> Result<Room, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO rooms (floor, number, status, area, capacity) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ROOM_COLUMNS
        );
        sqlx::query_as::<_, Room>(&sql)
            .bind(floor)
            .bind(number)
            .bind(status)
            .bind(area)
            .bind(capacity)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_db(e, &format!("Sala {}", number)))
    }

    /// Grava status e vínculo de cliente. Última escrita vence.
    pub async fn save_room<'e, E>(&self, executor: E, room: &Room) -> Result<Room, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE rooms SET status = $1, client_id = $2, updated_at = NOW() WHERE id = $3 RETURNING {}",
            ROOM_COLUMNS
        );
        sqlx::query_as::<_, Room>(&sql)
            .bind(room.status)
            .bind(room.client_id)
            .bind(room.id)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_db(e, "Cliente"))
    }

    // =========================================================================
    //  ESTAÇÕES
    // =========================================================================

    pub async fn list_stations(&self) -> Result<Vec<WorkStation>, AppError> {
        let sql = format!("SELECT {} FROM workstations ORDER BY floor, number", STATION_COLUMNS);
        let stations = sqlx::query_as::<_, WorkStation>(&sql).fetch_all(&self.pool).await?;
        Ok(stations)
    }

    /// Carrega todas as estações travando as linhas; usado pelas regras do pool flex.
    pub async fn list_stations_for_update<'e, E>(&self, executor: E) -> Result<Vec<WorkStation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM workstations ORDER BY floor, number FOR UPDATE",
            STATION_COLUMNS
        );
        let stations = sqlx::query_as::<_, WorkStation>(&sql).fetch_all(executor).await?;
        Ok(stations)
    }

    pub async fn find_station_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<WorkStation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM workstations WHERE id = $1 FOR UPDATE", STATION_COLUMNS);
        let station = sqlx::query_as::<_, WorkStation>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(station)
    }

    pub async fn insert_station<'e, E>(
        &self,
        executor: E,
        floor: i16,
        number: &str,
        station_type: StationType,
        status: StationStatus,
    ) -> Result<WorkStation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO workstations (floor, number, station_type, status) VALUES ($1, $2, $3, $4) RETURNING {}",
            STATION_COLUMNS
        );
        sqlx::query_as::<_, WorkStation>(&sql)
            .bind(floor)
            .bind(number)
            .bind(station_type)
            .bind(status)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_db(e, &format!("Estação {}", number)))
    }

    pub async fn save_station<'e, E>(&self, executor: E, station: &WorkStation) -> Result<WorkStation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE workstations
            SET station_type = $1, status = $2, client_id = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            STATION_COLUMNS
        );
        sqlx::query_as::<_, WorkStation>(&sql)
            .bind(station.station_type)
            .bind(station.status)
            .bind(station.client_id)
            .bind(station.id)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_db(e, "Cliente"))
    }

    // =========================================================================
    //  OPERAÇÕES EM LOTE
    // =========================================================================

    /// Solta todas as salas de um cliente (voltam a `available`).
    pub async fn release_client_rooms<'e, E>(&self, executor: E, client_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET client_id = NULL,
                status = CASE WHEN status = 'occupied' THEN 'available'::room_status ELSE status END,
                updated_at = NOW()
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Solta todas as estações de um cliente (flex volta ao pool flex).
    ///
    /// Trava as linhas na mesma ordem de `list_stations_for_update` (andar,
    /// número) para não cruzar com uma conversão flex em andamento.
    pub async fn release_client_stations<'e, E>(&self, executor: E, client_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            WITH locked AS (
                SELECT id FROM workstations
                WHERE client_id = $1
                ORDER BY floor, number
                FOR UPDATE
            )
            UPDATE workstations w
            SET client_id = NULL,
                status = CASE
                    WHEN w.status <> 'occupied' THEN w.status
                    WHEN w.station_type = 'flex' THEN 'flex'::station_status
                    ELSE 'available'::station_status
                END,
                updated_at = NOW()
            FROM locked
            WHERE w.id = locked.id
            "#,
        )
        .bind(client_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_all<'e, E>(&self, executor: E) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Um único statement para caber em qualquer executor
        sqlx::query("WITH r AS (DELETE FROM rooms) DELETE FROM workstations")
            .execute(executor)
            .await?;
        Ok(())
    }
}
