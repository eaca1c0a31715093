// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::{ChangePasswordPayload, UpdateProfilePayload},
        users::User,
    },
};

// GET /api/settings/profile
#[utoipa::path(
    get,
    path = "/api/settings/profile",
    tag = "Settings",
    responses((status = 200, description = "Perfil do operador logado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_profile(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    (StatusCode::OK, Json(user))
}

// PUT /api/settings/profile
#[utoipa::path(
    put,
    path = "/api/settings/profile",
    tag = "Settings",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Nome atualizado", body = User),
        (status = 400, description = "Nome vazio")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let updated = app_state
        .user_service
        .update_name(user.id, payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(updated)))
}

// PUT /api/settings/password
#[utoipa::path(
    put,
    path = "/api/settings/password",
    tag = "Settings",
    request_body = ChangePasswordPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 401, description = "Senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    app_state
        .auth_service
        .change_password(user.id, &payload.current_password, &payload.new_password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🔐 Senha alterada para {}", user.email);
    Ok(StatusCode::NO_CONTENT)
}
