//! Core domain logic for the vehicle query service.
//! Owns the entity model, SQLite storage and transactional use-cases.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::vehicle::{Vehicle, VehicleId};
pub use repo::vehicle_repo::{
    RepoError, RepoResult, SqliteVehicleRepository, TransactionMode, VehicleRepository,
};
pub use service::vehicle_service::{
    DateInputFormat, LaunchDateConfig, ServiceError, ServiceResult, VehicleService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
