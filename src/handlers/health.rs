// src/handlers/health.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::config::AppState;

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "API e banco respondendo"),
        (status = 503, description = "Banco indisponível")
    )
)]
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::warn!("⚠️ Health check sem banco: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "degraded" })))
        }
    }
}
