//! Persistence contracts and their SQLite implementations.
//!
//! Service code talks to `VehicleRepository` only; SQL stays in this module.

pub mod vehicle_repo;
