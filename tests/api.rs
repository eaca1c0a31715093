//! Testes HTTP que não precisam de banco: tudo aqui responde antes da
//! primeira query (validação, autenticação, roteamento, docs).

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_json, build_test_app, get, offline_pool, send};

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let app = build_test_app(offline_pool());
    let response = get(app, "/api/occupancy/workstations").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TOKEN");
    assert_eq!(json["error"], "Token de autenticação inválido ou ausente.");
}

#[tokio::test]
async fn missing_token_message_follows_accept_language() {
    let app = build_test_app(offline_pool());
    let request = Request::get("/api/dashboard/summary")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::empty())
        .unwrap();

    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing or invalid authentication token.");
}

#[tokio::test]
async fn garbage_bearer_token_is_401() {
    let app = build_test_app(offline_pool());
    let request = Request::post("/api/occupancy/workstations/allocate-flex")
        .header(header::AUTHORIZATION, "Bearer nao-e-um-jwt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"clientId":"00000000-0000-0000-0000-000000000000"}"#))
        .unwrap();

    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn login_with_invalid_payload_returns_field_details() {
    let app = build_test_app(offline_pool());
    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email":"nao-e-email","password":"123"}"#))
        .unwrap();

    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"]["email"].is_array());
    assert!(json["details"]["password"].is_array());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(offline_pool());
    let response = get(app, "/api/nao-existe").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = build_test_app(offline_pool());
    let response = get(app, "/api/health").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "degraded");
}

#[tokio::test]
async fn openapi_document_lists_flex_routes() {
    let app = build_test_app(offline_pool());
    let response = get(app, "/api-docs/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let paths = &json["paths"];
    assert!(paths["/api/occupancy/workstations/{id}/convert"]["post"].is_object());
    assert!(paths["/api/occupancy/workstations/allocate-flex"]["post"].is_object());
    assert!(json["components"]["securitySchemes"]["api_jwt"].is_object());
}
