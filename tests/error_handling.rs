//! Mapeamento `AppError` -> resposta HTTP (status, código e mensagem).
//! Não sobe servidor: chama `IntoResponse` / `to_api_error` direto.

use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use uuid::Uuid;

use coworking_backend::{
    common::error::AppError, middleware::i18n::Locale, services::reconciliation::RuleError,
};

async fn error_to_response(err: AppError, locale: &Locale) -> (StatusCode, serde_json::Value) {
    let response = err.to_api_error(locale).into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn pt() -> Locale {
    Locale::default()
}

fn en() -> Locale {
    Locale::from_header("en-US")
}

#[tokio::test]
async fn station_not_flex_is_unprocessable() {
    let id = Uuid::new_v4();
    let (status, json) = error_to_response(RuleError::StationNotFlex(id).into(), &pt()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "STATION_NOT_FLEX");
    assert!(json["error"].as_str().unwrap().contains(&id.to_string()));
}

#[tokio::test]
async fn station_not_found_is_404() {
    let (status, json) = error_to_response(RuleError::StationNotFound(Uuid::nil()).into(), &pt()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "STATION_NOT_FOUND");
}

#[tokio::test]
async fn empty_flex_pool_is_conflict() {
    let (status, json) = error_to_response(RuleError::NoFlexAvailable.into(), &en()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "NO_FLEX_AVAILABLE");
    assert_eq!(json["error"], "There are no flex workstations available.");
}

#[tokio::test]
async fn forbidden_names_the_missing_permission() {
    let (status, json) = error_to_response(AppError::Forbidden("occupancy".into()), &pt()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(
        json["error"],
        "Você precisa da permissão 'occupancy' para realizar esta ação."
    );
}

#[tokio::test]
async fn seed_disabled_is_forbidden() {
    let (status, json) = error_to_response(AppError::SeedDisabled, &pt()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "SEED_DISABLED");
}

#[tokio::test]
async fn resource_in_use_is_conflict() {
    let (status, json) = error_to_response(AppError::ResourceInUse("Serviço".into()), &en()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "IN_USE");
    assert_eq!(json["error"], "Serviço is still in use.");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::InternalServerError(anyhow::anyhow!("senha do banco vazou"));
    let (status, json) = error_to_response(err, &pt()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("senha"));
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn app_error_response_defaults_to_portuguese() {
    let response = AppError::InvalidCredentials.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["code"], "INVALID_CREDENTIALS");
    assert_eq!(json["error"], "E-mail ou senha inválidos.");
}
