//! Fluxo do pool flex contra um Postgres de verdade.
//! Rode com `DATABASE_URL=... cargo test -- --ignored`.

mod common;

use sqlx::PgPool;
use uuid::Uuid;

use coworking_backend::{
    common::error::AppError,
    config::AppState,
    models::{
        clients::ClientPayload,
        occupancy::{StationStatus, StationType},
    },
    services::reconciliation::RuleError,
};

async fn setup(pool: PgPool) -> (AppState, Uuid) {
    let state = AppState::from_pool(pool, common::test_config());
    state.occupancy_service.seed().await.unwrap();

    let payload: ClientPayload = serde_json::from_value(serde_json::json!({ "name": "Acme Ltda" })).unwrap();
    let client = state.client_service.create_client(&payload).await.unwrap();
    (state, client.id)
}

fn flex_count(stations: &[coworking_backend::models::occupancy::WorkStation]) -> usize {
    stations.iter().filter(|s| s.status == StationStatus::Flex).count()
}

#[sqlx::test]
#[ignore = "precisa de DATABASE_URL apontando para um Postgres"]
async fn conversion_keeps_flex_pool_size(pool: PgPool) {
    let (state, client_id) = setup(pool).await;
    let before = state.occupancy_service.list_stations().await.unwrap();
    let target = before.iter().find(|s| s.status == StationStatus::Flex).unwrap().id;

    let outcome = state
        .occupancy_service
        .convert_flex_to_fixed(target, client_id)
        .await
        .unwrap();

    assert_eq!(outcome.station.status, StationStatus::Occupied);
    assert_eq!(outcome.station.station_type, StationType::Fixed);
    assert_eq!(outcome.station.client_id, Some(client_id));
    assert!(!outcome.flex_pool_shrank);

    let after = state.occupancy_service.list_stations().await.unwrap();
    assert_eq!(flex_count(&after), flex_count(&before));
}

#[sqlx::test]
#[ignore = "precisa de DATABASE_URL apontando para um Postgres"]
async fn converting_a_non_flex_station_changes_nothing(pool: PgPool) {
    let (state, client_id) = setup(pool).await;
    let before = state.occupancy_service.list_stations().await.unwrap();
    let fixed = before.iter().find(|s| s.status == StationStatus::Available).unwrap().id;

    let err = state
        .occupancy_service
        .convert_flex_to_fixed(fixed, client_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::OccupancyRule(RuleError::StationNotFlex(id)) if id == fixed));
    let after = state.occupancy_service.list_stations().await.unwrap();
    assert_eq!(after, before);
}

#[sqlx::test]
#[ignore = "precisa de DATABASE_URL apontando para um Postgres"]
async fn deleting_a_client_releases_its_stations(pool: PgPool) {
    let (state, client_id) = setup(pool).await;

    let seat = state.occupancy_service.allocate_flex(client_id).await.unwrap();
    assert_eq!(seat.status, StationStatus::Occupied);
    assert_eq!(seat.station_type, StationType::Flex);

    state.client_service.delete_client(client_id).await.unwrap();

    let stations = state.occupancy_service.list_stations().await.unwrap();
    let released = stations.iter().find(|s| s.id == seat.id).unwrap();
    assert_eq!(released.status, StationStatus::Flex);
    assert_eq!(released.client_id, None);
}
