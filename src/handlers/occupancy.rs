// src/handlers/occupancy.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermOccupancy, RequirePermission},
    },
    models::occupancy::{
        ClientLinkPayload, ConversionResponse, CreateRoomPayload, CreateWorkStationPayload, Room,
        RoomStatusPayload, SeedResponse, StationStatusPayload, WorkStation,
    },
};

// ---
// SALAS
// ---

// GET /api/occupancy/rooms
#[utoipa::path(
    get,
    path = "/api/occupancy/rooms",
    tag = "Occupancy",
    responses(
        (status = 200, description = "Salas por andar e número", body = Vec<Room>),
        (status = 403, description = "Sem a permissão 'occupancy'")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
) -> Result<impl IntoResponse, ApiError> {
    let rooms = app_state
        .occupancy_service
        .list_rooms()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(rooms))
}

// POST /api/occupancy/rooms
#[utoipa::path(
    post,
    path = "/api/occupancy/rooms",
    tag = "Occupancy",
    request_body = CreateRoomPayload,
    responses(
        (status = 201, description = "Sala criada", body = Room),
        (status = 400, description = "Andar, área ou capacidade inválidos"),
        (status = 409, description = "Número de sala já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_room(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Json(payload): Json<CreateRoomPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let room = app_state
        .occupancy_service
        .create_room(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(room)))
}

// PUT /api/occupancy/rooms/{id}/status
#[utoipa::path(
    put,
    path = "/api/occupancy/rooms/{id}/status",
    tag = "Occupancy",
    params(("id" = Uuid, Path, description = "ID da sala")),
    request_body = RoomStatusPayload,
    responses(
        (status = 200, description = "Sala como ficou gravada", body = Room),
        (status = 404, description = "Sala não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_room_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoomStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let room = app_state
        .occupancy_service
        .update_room_status(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(room))
}

// PUT /api/occupancy/rooms/{id}/client
#[utoipa::path(
    put,
    path = "/api/occupancy/rooms/{id}/client",
    tag = "Occupancy",
    params(("id" = Uuid, Path, description = "ID da sala")),
    request_body = ClientLinkPayload,
    responses(
        (status = 200, body = Room),
        (status = 404, description = "Sala ou cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn link_room_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientLinkPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let room = app_state
        .occupancy_service
        .link_room_client(id, payload.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(room))
}

// DELETE /api/occupancy/rooms/{id}/client
#[utoipa::path(
    delete,
    path = "/api/occupancy/rooms/{id}/client",
    tag = "Occupancy",
    params(("id" = Uuid, Path, description = "ID da sala")),
    responses(
        (status = 200, body = Room),
        (status = 404, description = "Sala não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn unlink_room_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let room = app_state
        .occupancy_service
        .unlink_room_client(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(room))
}

// ---
// ESTAÇÕES
// ---

// GET /api/occupancy/workstations
#[utoipa::path(
    get,
    path = "/api/occupancy/workstations",
    tag = "Occupancy",
    responses((status = 200, body = Vec<WorkStation>)),
    security(("api_jwt" = []))
)]
pub async fn list_stations(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
) -> Result<impl IntoResponse, ApiError> {
    let stations = app_state
        .occupancy_service
        .list_stations()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(stations))
}

// POST /api/occupancy/workstations
#[utoipa::path(
    post,
    path = "/api/occupancy/workstations",
    tag = "Occupancy",
    request_body = CreateWorkStationPayload,
    responses(
        (status = 201, description = "Estação criada (flex entra direto no pool)", body = WorkStation),
        (status = 409, description = "Número de estação já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_station(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Json(payload): Json<CreateWorkStationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let station = app_state
        .occupancy_service
        .create_station(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(station)))
}

// PUT /api/occupancy/workstations/{id}/status
#[utoipa::path(
    put,
    path = "/api/occupancy/workstations/{id}/status",
    tag = "Occupancy",
    params(("id" = Uuid, Path, description = "ID da estação")),
    request_body = StationStatusPayload,
    responses(
        (status = 200, body = WorkStation),
        (status = 404, description = "Estação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_station_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StationStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let station = app_state
        .occupancy_service
        .update_station_status(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(station))
}

// PUT /api/occupancy/workstations/{id}/client
#[utoipa::path(
    put,
    path = "/api/occupancy/workstations/{id}/client",
    tag = "Occupancy",
    params(("id" = Uuid, Path, description = "ID da estação")),
    request_body = ClientLinkPayload,
    responses(
        (status = 200, body = WorkStation),
        (status = 404, description = "Estação ou cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn link_station_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientLinkPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let station = app_state
        .occupancy_service
        .link_station_client(id, payload.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(station))
}

// DELETE /api/occupancy/workstations/{id}/client
#[utoipa::path(
    delete,
    path = "/api/occupancy/workstations/{id}/client",
    tag = "Occupancy",
    params(("id" = Uuid, Path, description = "ID da estação")),
    responses(
        (status = 200, body = WorkStation),
        (status = 404, description = "Estação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn unlink_station_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let station = app_state
        .occupancy_service
        .unlink_station_client(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(station))
}

// ---
// POOL FLEX
// ---

// POST /api/occupancy/workstations/{id}/convert
#[utoipa::path(
    post,
    path = "/api/occupancy/workstations/{id}/convert",
    tag = "Occupancy",
    params(("id" = Uuid, Path, description = "ID da estação flex")),
    request_body = ClientLinkPayload,
    responses(
        (status = 200, description = "Estação convertida em fixa e pool flex reposto", body = ConversionResponse),
        (status = 404, description = "Estação não encontrada"),
        (status = 422, description = "Estação não está no pool flex")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_flex_to_fixed(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientLinkPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let conversion = app_state
        .occupancy_service
        .convert_flex_to_fixed(id, payload.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(conversion))
}

// POST /api/occupancy/workstations/allocate-flex
#[utoipa::path(
    post,
    path = "/api/occupancy/workstations/allocate-flex",
    tag = "Occupancy",
    request_body = ClientLinkPayload,
    responses(
        (status = 200, description = "Estação flex alocada ao cliente", body = WorkStation),
        (status = 409, description = "Pool flex vazio")
    ),
    security(("api_jwt" = []))
)]
pub async fn allocate_flex(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Json(payload): Json<ClientLinkPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let station = app_state
        .occupancy_service
        .allocate_flex(payload.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(station))
}

// POST /api/occupancy/workstations/{id}/release
#[utoipa::path(
    post,
    path = "/api/occupancy/workstations/{id}/release",
    tag = "Occupancy",
    params(("id" = Uuid, Path, description = "ID da estação ocupada")),
    responses(
        (status = 200, description = "Estação devolvida ao seu pool", body = WorkStation),
        (status = 422, description = "Estação não está ocupada")
    ),
    security(("api_jwt" = []))
)]
pub async fn release_station(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let station = app_state
        .occupancy_service
        .release_station(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(station))
}

// POST /api/occupancy/seed
#[utoipa::path(
    post,
    path = "/api/occupancy/seed",
    tag = "Occupancy",
    responses(
        (status = 200, description = "Salas e estações recriadas", body = SeedResponse),
        (status = 403, description = "Carga desabilitada (ALLOW_SEED) ou sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn seed(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermOccupancy>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .occupancy_service
        .seed()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(summary))
}
