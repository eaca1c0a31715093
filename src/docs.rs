// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Services ---
        handlers::catalog::list_services,
        handlers::catalog::get_service,
        handlers::catalog::create_service,
        handlers::catalog::update_service,
        handlers::catalog::delete_service,
        handlers::catalog::list_benefits,
        handlers::catalog::create_benefit,

        // --- Occupancy ---
        handlers::occupancy::list_rooms,
        handlers::occupancy::create_room,
        handlers::occupancy::update_room_status,
        handlers::occupancy::link_room_client,
        handlers::occupancy::unlink_room_client,
        handlers::occupancy::list_stations,
        handlers::occupancy::create_station,
        handlers::occupancy::update_station_status,
        handlers::occupancy::link_station_client,
        handlers::occupancy::unlink_station_client,
        handlers::occupancy::convert_flex_to_fixed,
        handlers::occupancy::allocate_flex,
        handlers::occupancy::release_station,
        handlers::occupancy::seed,

        // --- Settings ---
        handlers::settings::get_profile,
        handlers::settings::update_profile,
        handlers::settings::change_password,
    ),
    components(
        schemas(
            // --- Auth / Users ---
            models::users::Permission,
            models::users::User,
            models::users::CreateUserPayload,
            models::users::UpdateUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::UpdateProfilePayload,
            models::auth::ChangePasswordPayload,

            // --- Dashboard ---
            models::dashboard::LocationStats,
            models::dashboard::DashboardSummary,

            // --- Clients ---
            models::clients::Client,
            models::clients::ClientService,
            models::clients::ClientPayload,
            models::clients::ClientServicePayload,

            // --- Services ---
            models::catalog::ServiceKind,
            models::catalog::PlanPeriod,
            models::catalog::PlanPrice,
            models::catalog::Benefit,
            models::catalog::Service,
            models::catalog::PlanPricePayload,
            models::catalog::ServicePayload,
            models::catalog::BenefitPayload,

            // --- Occupancy ---
            models::occupancy::RoomStatus,
            models::occupancy::StationType,
            models::occupancy::StationStatus,
            models::occupancy::Room,
            models::occupancy::WorkStation,
            models::occupancy::CreateRoomPayload,
            models::occupancy::CreateWorkStationPayload,
            models::occupancy::RoomStatusPayload,
            models::occupancy::StationStatusPayload,
            models::occupancy::ClientLinkPayload,
            models::occupancy::ConversionResponse,
            models::occupancy::SeedResponse,
        )
    ),
    tags(
        (name = "Health", description = "Disponibilidade da API"),
        (name = "Auth", description = "Login e sessão"),
        (name = "Dashboard", description = "Indicadores de ocupação e receita"),
        (name = "Users", description = "Operadores do painel e permissões"),
        (name = "Clients", description = "Clientes e contratos"),
        (name = "Services", description = "Catálogo de serviços, planos e benefícios"),
        (name = "Occupancy", description = "Salas, estações e pool flex"),
        (name = "Settings", description = "Perfil e senha do operador")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
