//! Use-case services sitting between the resolver and the store.

pub mod vehicle_service;
