//! Graph-style query surface over the vehicle store.
//!
//! # Responsibility
//! - Resolve `vehicles`, `vehicle` and `createVehicle` field requests.
//! - Turn environment configuration into a ready connection and logger.
//!
//! # Invariants
//! - Public entry points return envelopes or `Err(String)`; they never panic.

pub mod config;
pub mod resolver;

pub use config::ApiConfig;
pub use resolver::{
    ErrorCode, FieldError, FieldRequest, FieldResponse, VehicleResolver, CREATE_VEHICLE_FIELD,
    VEHICLES_FIELD, VEHICLE_FIELD, VEHICLE_FIELDS,
};

use log::warn;
use rusqlite::Connection;
use vehicle_core::db::open_db;
use vehicle_core::{init_logging, SqliteVehicleRepository, VehicleService};

const ENCODE_FAILURE_RESPONSE: &str =
    r#"{"data":null,"errors":[{"message":"request failed","path":[],"extensions":{"code":"INTERNAL"}}]}"#;

/// Starts logging (when a log directory is configured) and opens the store.
///
/// # Errors
/// Returns a human-readable message when logging setup or DB open fails.
pub fn open_configured_db(config: &ApiConfig) -> Result<Connection, String> {
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }
    open_db(&config.db_path).map_err(|err| {
        format!(
            "vehicle DB open failed at `{}`: {err}",
            config.db_path.display()
        )
    })
}

/// Decodes a JSON `FieldRequest`, resolves it against `conn`, and encodes
/// the response envelope.
pub fn execute_json(conn: &Connection, config: &ApiConfig, request_json: &str) -> String {
    let response = match serde_json::from_str::<FieldRequest>(request_json) {
        Ok(request) => {
            let repo = SqliteVehicleRepository::new(conn);
            let service = VehicleService::with_date_config(repo, config.launch_date.clone());
            VehicleResolver::new(service).execute(&request)
        }
        Err(err) => {
            warn!("event=request_decode module=api status=error error={err}");
            FieldResponse::bad_request(format!("malformed request: {err}"))
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|err| {
        warn!("event=response_encode module=api status=error error={err}");
        ENCODE_FAILURE_RESPONSE.to_string()
    })
}
