// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermDashboard, RequirePermission},
    },
    models::dashboard::DashboardSummary,
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Ocupação, clientes ativos e receita mensal", body = DashboardSummary),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Sem a permissão 'dashboard'")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermDashboard>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dashboard_service
        .get_summary()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(summary))
}
