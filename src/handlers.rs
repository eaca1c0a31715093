pub mod auth;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod occupancy;
pub mod settings;
pub mod users;
