//! Domain model for the vehicle query service.

pub mod vehicle;
