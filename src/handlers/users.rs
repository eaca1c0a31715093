// src/handlers/users.rs

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
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermUsers, RequirePermission},
    },
    models::users::{CreateUserPayload, UpdateUserPayload, User},
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Operadores do painel", body = Vec<User>),
        (status = 403, description = "Sem a permissão 'users'")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsers>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .list_users()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(users))
}

// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do operador")),
    responses(
        (status = 200, body = User),
        (status = 404, description = "Operador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .get_user(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(user))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Operador criado", body = User),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsers>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let user = app_state
        .user_service
        .create_user(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do operador")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, body = User),
        (status = 404, description = "Operador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let user = app_state
        .user_service
        .update_user(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(user))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do operador")),
    responses(
        (status = 204, description = "Operador removido"),
        (status = 409, description = "Tentativa de remover o próprio usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsers>,
    AuthenticatedUser(acting): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .user_service
        .delete_user(acting.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(StatusCode::NO_CONTENT)
}
