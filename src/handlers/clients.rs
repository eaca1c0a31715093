// src/handlers/clients.rs

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
        rbac::{PermClients, RequirePermission},
    },
    models::clients::{Client, ClientPayload},
};

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "Clientes com seus contratos", body = Vec<Client>),
        (status = 403, description = "Sem a permissão 'clients'")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermClients>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = app_state
        .client_service
        .list_clients()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(clients))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermClients>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .client_service
        .get_client(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(client))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Serviço contratado não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermClients>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let client = app_state
        .client_service
        .create_client(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(client)))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = ClientPayload,
    responses(
        (status = 200, body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermClients>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let client = app_state
        .client_service
        .update_client(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(client))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido e locais liberados"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermClients>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .client_service
        .delete_client(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}
