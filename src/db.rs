pub mod user_repo;
pub use user_repo::UserRepository;
pub mod occupancy_repo;
pub use occupancy_repo::OccupancyRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
