pub mod auth;
pub mod catalog_service;
pub mod client_service;
pub mod dashboard_service;
pub mod occupancy_service;
pub mod reconciliation;
pub mod user_service;
