// src/handlers/catalog.rs

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
        rbac::{PermCatalogRead, PermServices, RequirePermission},
    },
    models::catalog::{Benefit, BenefitPayload, Service, ServicePayload},
};

// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    responses(
        (status = 200, description = "Serviços com preços por período e benefícios", body = Vec<Service>),
        (status = 403, description = "Sem a permissão 'plans' ou 'services'")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCatalogRead>,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .catalog_service
        .list_services()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(services))
}

// GET /api/services/{id}
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses(
        (status = 200, body = Service),
        (status = 404, description = "Serviço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_service(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCatalogRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let service = app_state
        .catalog_service
        .get_service(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(service))
}

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Services",
    request_body = ServicePayload,
    responses(
        (status = 201, description = "Serviço criado", body = Service),
        (status = 409, description = "Já existe um serviço com esse nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermServices>,
    Json(payload): Json<ServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let service = app_state
        .catalog_service
        .create_service(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(service)))
}

// PUT /api/services/{id}
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    request_body = ServicePayload,
    responses(
        (status = 200, body = Service),
        (status = 404, description = "Serviço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermServices>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let service = app_state
        .catalog_service
        .update_service(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(service))
}

// DELETE /api/services/{id}
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses(
        (status = 204, description = "Serviço removido"),
        (status = 409, description = "Serviço contratado por algum cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermServices>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_service(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/benefits
#[utoipa::path(
    get,
    path = "/api/benefits",
    tag = "Services",
    responses((status = 200, body = Vec<Benefit>)),
    security(("api_jwt" = []))
)]
pub async fn list_benefits(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCatalogRead>,
) -> Result<impl IntoResponse, ApiError> {
    let benefits = app_state
        .catalog_service
        .list_benefits()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(benefits))
}

// POST /api/benefits
#[utoipa::path(
    post,
    path = "/api/benefits",
    tag = "Services",
    request_body = BenefitPayload,
    responses(
        (status = 201, body = Benefit),
        (status = 409, description = "Benefício já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_benefit(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermServices>,
    Json(payload): Json<BenefitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let benefit = app_state
        .catalog_service
        .create_benefit(&payload.description)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(benefit)))
}
