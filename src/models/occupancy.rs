// src/models/occupancy.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums (mapeiam os CREATE TYPE do banco) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "room_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "station_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    Fixed,
    Flex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "station_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Available,
    Occupied,
    Flex,
    Reserved,
    Maintenance,
}

// --- Entidades ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = 2)]
    pub floor: i16,
    #[schema(example = "201")]
    pub number: String,
    pub status: RoomStatus,
    pub client_id: Option<Uuid>,
    #[schema(example = "18.5")]
    pub area: Decimal,
    #[schema(example = 4)]
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkStation {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440001")]
    pub id: Uuid,
    #[schema(example = 1)]
    pub floor: i16,
    #[schema(example = "E-07")]
    pub number: String,
    #[serde(rename = "type")]
    pub station_type: StationType,
    pub status: StationStatus,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

fn validate_area(area: &Decimal) -> Result<(), ValidationError> {
    if *area <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("A área deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    #[validate(range(min = 1, max = 3, message = "O andar deve estar entre 1 e 3."))]
    #[schema(example = 1)]
    pub floor: i16,

    #[validate(length(min = 1, message = "O número é obrigatório."))]
    #[schema(example = "104")]
    pub number: String,

    #[validate(custom(function = "validate_area"))]
    #[schema(example = "12.0")]
    pub area: Decimal,

    #[validate(range(min = 1, message = "A capacidade deve ser de pelo menos 1 pessoa."))]
    #[schema(example = 3)]
    pub capacity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkStationPayload {
    #[validate(range(min = 1, max = 3, message = "O andar deve estar entre 1 e 3."))]
    pub floor: i16,

    #[validate(length(min = 1, message = "O número é obrigatório."))]
    pub number: String,

    #[serde(rename = "type")]
    pub station_type: StationType,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatusPayload {
    pub status: RoomStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationStatusPayload {
    pub status: StationStatus,
}

// Usado para vincular cliente, converter flex e alocar flex
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientLinkPayload {
    pub client_id: Uuid,
}

// --- Respostas ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub station: WorkStation,
    /// Estação promovida a flex para repor o pool (se havia alguma livre).
    pub replacement: Option<WorkStation>,
    pub flex_pool_shrank: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub rooms: usize,
    pub workstations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn station_type_uses_type_key_on_the_wire() {
        let now = Utc::now();
        let station = WorkStation {
            id: Uuid::nil(),
            floor: 1,
            number: "E-01".into(),
            station_type: StationType::Flex,
            status: StationStatus::Flex,
            client_id: None,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&station).unwrap();
        assert_eq!(value["type"], json!("flex"));
        assert_eq!(value["status"], json!("flex"));
        assert_eq!(value["clientId"], json!(null));
    }

    #[test]
    fn locations_survive_the_wire_unchanged() {
        let now = Utc::now();
        let room = Room {
            id: Uuid::new_v4(),
            floor: 2,
            number: "203".into(),
            status: RoomStatus::Occupied,
            client_id: Some(Uuid::new_v4()),
            area: Decimal::new(185, 1),
            capacity: 6,
            created_at: now,
            updated_at: now,
        };
        let station = WorkStation {
            id: Uuid::new_v4(),
            floor: 3,
            number: "E3-04".into(),
            station_type: StationType::Fixed,
            status: StationStatus::Reserved,
            client_id: None,
            created_at: now,
            updated_at: now,
        };

        let room_back: Room = serde_json::from_value(serde_json::to_value(&room).unwrap()).unwrap();
        let station_back: WorkStation =
            serde_json::from_value(serde_json::to_value(&station).unwrap()).unwrap();

        assert_eq!(room_back, room);
        assert_eq!(station_back, station);
    }

    #[test]
    fn room_payload_rejects_out_of_range_values() {
        let payload = CreateRoomPayload {
            floor: 4,
            number: "401".into(),
            area: Decimal::ZERO,
            capacity: 0,
        };

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("floor"));
        assert!(fields.contains_key("area"));
        assert!(fields.contains_key("capacity"));
    }

    #[test]
    fn room_payload_accepts_valid_values() {
        let payload = CreateRoomPayload {
            floor: 3,
            number: "301".into(),
            area: Decimal::new(125, 1),
            capacity: 2,
        };
        assert!(payload.validate().is_ok());
    }
}
