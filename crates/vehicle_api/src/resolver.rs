//! Query and mutation resolvers for the vehicle surface.
//!
//! # Responsibility
//! - Expose `vehicles`, `vehicle` and `createVehicle` as named fields.
//! - Coerce loosely typed field arguments and shape results into the
//!   `{"data": ..., "errors": [...]}` response envelope.
//!
//! # Invariants
//! - An absent vehicle is `null` data, never an error.
//! - Storage failures are reported as a generic `INTERNAL` error; details
//!   only reach the log.
//! - Selections are validated before any field runs, so a bad selection
//!   never triggers a mutation.

use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use vehicle_core::{ServiceError, ServiceResult, Vehicle, VehicleId, VehicleRepository, VehicleService};

pub const VEHICLES_FIELD: &str = "vehicles";
pub const VEHICLE_FIELD: &str = "vehicle";
pub const CREATE_VEHICLE_FIELD: &str = "createVehicle";

/// Selectable Vehicle fields, in their external spelling.
pub const VEHICLE_FIELDS: &[&str] = &["id", "type", "modelCode", "brandName", "launchDate"];

const GENERIC_FAILURE_MESSAGE: &str = "request failed";

/// One field invocation as received from the transport.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldRequest {
    pub field: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    /// Vehicle fields to keep in the result; `None` keeps all of them.
    #[serde(default)]
    pub selection: Option<Vec<String>>,
}

impl FieldRequest {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn argument(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.to_string(), value.into());
        self
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.selection = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request body itself could not be decoded.
    BadRequest,
    UnknownField,
    InvalidInput,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorExtensions {
    pub code: ErrorCode,
}

/// Field-level error entry of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
    pub path: Vec<String>,
    pub extensions: ErrorExtensions,
}

/// Response envelope; `data` is `null` only when the request was unreadable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldResponse {
    pub data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl FieldResponse {
    fn success(field: &str, value: Value) -> Self {
        let mut data = Map::new();
        data.insert(field.to_string(), value);
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    fn failure(field: &str, err: &ResolverError) -> Self {
        let mut data = Map::new();
        data.insert(field.to_string(), Value::Null);
        Self {
            data: Some(data),
            errors: vec![FieldError {
                message: err.to_string(),
                path: vec![field.to_string()],
                extensions: ErrorExtensions { code: err.code() },
            }],
        }
    }

    /// Envelope for a request that never reached a field.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![FieldError {
                message: message.into(),
                path: Vec::new(),
                extensions: ErrorExtensions {
                    code: ErrorCode::BadRequest,
                },
            }],
        }
    }

    /// Value resolved for `field`, if present.
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(field))
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug)]
enum ResolverError {
    UnknownField(String),
    InvalidInput(String),
    Internal(String),
}

impl ResolverError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownField(_) => ErrorCode::UnknownField,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl Display for ResolverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "unknown field `{name}`"),
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::Internal(_) => write!(f, "{GENERIC_FAILURE_MESSAGE}"),
        }
    }
}

impl From<ServiceError> for ResolverError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::InvalidInput { .. } => Self::InvalidInput(value.to_string()),
            ServiceError::Storage(err) => Self::Internal(err.to_string()),
        }
    }
}

/// Field resolvers backed by a `VehicleService`.
pub struct VehicleResolver<R: VehicleRepository> {
    service: VehicleService<R>,
}

impl<R: VehicleRepository> VehicleResolver<R> {
    pub fn new(service: VehicleService<R>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &VehicleService<R> {
        &self.service
    }

    /// `vehicles(count)`: first `count` vehicles in store order.
    pub fn vehicles(&self, count: i64) -> ServiceResult<Vec<Vehicle>> {
        self.service.get_all_vehicles(count)
    }

    /// `vehicle(id)`: one vehicle or `None`.
    pub fn vehicle(&self, id: VehicleId) -> ServiceResult<Option<Vehicle>> {
        self.service.get_vehicle(id)
    }

    /// `createVehicle(type, modelCode, brandName, launchDate)`.
    pub fn create_vehicle(
        &self,
        kind: &str,
        model_code: &str,
        brand_name: &str,
        launch_date: &str,
    ) -> ServiceResult<Vehicle> {
        self.service
            .create_vehicle(kind, model_code, brand_name, launch_date)
    }

    /// Resolves one field request into a response envelope.
    pub fn execute(&self, request: &FieldRequest) -> FieldResponse {
        let outcome = validate_selection(request.selection.as_deref())
            .and_then(|()| self.resolve(request))
            .map(|value| project(value, request.selection.as_deref()));

        match outcome {
            Ok(value) => FieldResponse::success(&request.field, value),
            Err(err) => {
                if let ResolverError::Internal(detail) = &err {
                    error!(
                        "event=field_resolve module=api status=error field={} error={detail}",
                        request.field
                    );
                }
                FieldResponse::failure(&request.field, &err)
            }
        }
    }

    fn resolve(&self, request: &FieldRequest) -> Result<Value, ResolverError> {
        let args = &request.arguments;
        match request.field.as_str() {
            VEHICLES_FIELD => to_value(self.vehicles(int_argument(args, "count")?)?),
            VEHICLE_FIELD => to_value(self.vehicle(int_argument(args, "id")?)?),
            CREATE_VEHICLE_FIELD => to_value(self.create_vehicle(
                string_argument(args, "type")?,
                string_argument(args, "modelCode")?,
                string_argument(args, "brandName")?,
                string_argument(args, "launchDate")?,
            )?),
            other => Err(ResolverError::UnknownField(other.to_string())),
        }
    }
}

fn int_argument(args: &Map<String, Value>, name: &str) -> Result<i64, ResolverError> {
    match args.get(name) {
        Some(value) => value.as_i64().ok_or_else(|| {
            ResolverError::InvalidInput(format!("argument `{name}` must be an integer, got {value}"))
        }),
        None => Err(ResolverError::InvalidInput(format!(
            "missing required argument `{name}`"
        ))),
    }
}

fn string_argument<'a>(args: &'a Map<String, Value>, name: &str) -> Result<&'a str, ResolverError> {
    match args.get(name) {
        Some(value) => value.as_str().ok_or_else(|| {
            ResolverError::InvalidInput(format!("argument `{name}` must be a string, got {value}"))
        }),
        None => Err(ResolverError::InvalidInput(format!(
            "missing required argument `{name}`"
        ))),
    }
}

fn validate_selection(selection: Option<&[String]>) -> Result<(), ResolverError> {
    let unknown: Vec<&str> = selection
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .filter(|name| !VEHICLE_FIELDS.contains(name))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ResolverError::InvalidInput(format!(
            "unknown Vehicle field(s) in selection: {}",
            unknown.join(", ")
        )))
    }
}

fn to_value(value: impl Serialize) -> Result<Value, ResolverError> {
    serde_json::to_value(value).map_err(|err| ResolverError::Internal(err.to_string()))
}

fn project(value: Value, selection: Option<&[String]>) -> Value {
    let Some(selection) = selection else {
        return value;
    };
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| project(item, Some(selection)))
                .collect(),
        ),
        Value::Object(mut fields) => {
            fields.retain(|key, _| selection.iter().any(|wanted| wanted == key));
            Value::Object(fields)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{project, validate_selection};
    use serde_json::json;

    #[test]
    fn project_keeps_only_selected_keys_in_lists() {
        let value = json!([{"id": 1, "type": "car", "brandName": "Kia"}]);
        let selection = vec!["id".to_string(), "brandName".to_string()];
        assert_eq!(
            project(value, Some(selection.as_slice())),
            json!([{"id": 1, "brandName": "Kia"}])
        );
    }

    #[test]
    fn project_leaves_null_untouched() {
        let selection = vec!["id".to_string()];
        assert_eq!(project(json!(null), Some(selection.as_slice())), json!(null));
    }

    #[test]
    fn validate_selection_rejects_unknown_names() {
        assert!(validate_selection(None).is_ok());
        let selection = vec!["id".to_string(), "colour".to_string()];
        let err = validate_selection(Some(selection.as_slice())).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }
}
