pub mod auth;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod occupancy;
pub mod users;
