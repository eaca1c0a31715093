// src/routes.rs

use axum::{
    http::{
        header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("⚠️ Origem CORS ignorada: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT_LANGUAGE])
        .max_age(Duration::from_secs(3600))
}

/// Monta o router completo: rotas públicas, rotas protegidas pelo `auth_guard`
/// e a documentação Swagger.
pub fn app(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Rotas protegidas (a permissão de cada uma é checada no handler)
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/clients/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route(
            "/services",
            get(handlers::catalog::list_services).post(handlers::catalog::create_service),
        )
        .route(
            "/services/{id}",
            get(handlers::catalog::get_service)
                .put(handlers::catalog::update_service)
                .delete(handlers::catalog::delete_service),
        )
        .route(
            "/benefits",
            get(handlers::catalog::list_benefits).post(handlers::catalog::create_benefit),
        )
        .nest("/occupancy", occupancy_routes())
        .route(
            "/settings/profile",
            get(handlers::settings::get_profile).put(handlers::settings::update_profile),
        )
        .route("/settings/password", put(handlers::settings::change_password))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&app_state.config.cors_origins))
        .with_state(app_state)
}

fn occupancy_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rooms",
            get(handlers::occupancy::list_rooms).post(handlers::occupancy::create_room),
        )
        .route("/rooms/{id}/status", put(handlers::occupancy::update_room_status))
        .route(
            "/rooms/{id}/client",
            put(handlers::occupancy::link_room_client).delete(handlers::occupancy::unlink_room_client),
        )
        .route(
            "/workstations",
            get(handlers::occupancy::list_stations).post(handlers::occupancy::create_station),
        )
        .route("/workstations/allocate-flex", post(handlers::occupancy::allocate_flex))
        .route("/workstations/{id}/status", put(handlers::occupancy::update_station_status))
        .route(
            "/workstations/{id}/client",
            put(handlers::occupancy::link_station_client).delete(handlers::occupancy::unlink_station_client),
        )
        .route("/workstations/{id}/convert", post(handlers::occupancy::convert_flex_to_fixed))
        .route("/workstations/{id}/release", post(handlers::occupancy::release_station))
        .route("/seed", post(handlers::occupancy::seed))
}
