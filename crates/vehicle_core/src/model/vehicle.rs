//! Vehicle entity.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one, and never changes afterwards.
//! - `launch_date` is always a valid calendar date; text parsing happens
//!   before a `Vehicle` is constructed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned integer identity of a vehicle row.
pub type VehicleId = i64;

/// The single entity exposed by the query surface.
///
/// Serializes with the external field names (`type`, `modelCode`,
/// `brandName`, `launchDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Option<VehicleId>,
    /// Free-form category label, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    pub model_code: String,
    pub brand_name: String,
    pub launch_date: NaiveDate,
}

impl Vehicle {
    /// Builds an unsaved vehicle; the store assigns `id` on save.
    pub fn new(
        kind: impl Into<String>,
        model_code: impl Into<String>,
        brand_name: impl Into<String>,
        launch_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            model_code: model_code.into(),
            brand_name: brand_name.into(),
            launch_date,
        }
    }

    /// Returns a copy carrying the given store identity.
    pub fn with_id(mut self, id: VehicleId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Vehicle;
    use chrono::NaiveDate;

    fn sample() -> Vehicle {
        Vehicle::new(
            "car",
            "A4",
            "Audi",
            NaiveDate::from_ymd_opt(2019, 4, 1).expect("valid date"),
        )
    }

    #[test]
    fn new_vehicle_has_no_id() {
        let vehicle = sample();
        assert_eq!(vehicle.id, None);
        assert!(!vehicle.is_persisted());
        assert!(vehicle.with_id(7).is_persisted());
    }

    #[test]
    fn serializes_with_external_field_names() {
        let json = serde_json::to_value(sample().with_id(3)).expect("serialize vehicle");
        assert_eq!(json["id"], 3);
        assert_eq!(json["type"], "car");
        assert_eq!(json["modelCode"], "A4");
        assert_eq!(json["brandName"], "Audi");
        assert_eq!(json["launchDate"], "2019-04-01");
    }
}
