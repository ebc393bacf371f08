//! Vehicle use-case service.
//!
//! # Responsibility
//! - Parse creation input into a `Vehicle` before touching the store.
//! - Wrap every store call in the matching transaction boundary.
//!
//! # Invariants
//! - Reads run in `TransactionMode::ReadOnly`, creation in `ReadWrite`.
//! - A rejected input never reaches the store.
//! - Listing truncates to `count` and preserves store order.

use crate::model::vehicle::{Vehicle, VehicleId};
use crate::repo::vehicle_repo::{RepoError, TransactionMode, VehicleRepository};
use chrono::NaiveDate;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISO_LOCAL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid iso date regex"));

const ISO_LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for vehicle use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller input could not be coerced; nothing was persisted.
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// Persistence-layer failure, passed through unhandled.
    Storage(RepoError),
}

impl ServiceError {
    fn invalid(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput {
                field,
                value,
                reason,
            } => write!(f, "invalid {field} `{value}`: {reason}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InvalidInput { .. } => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Accepted textual shape of a launch date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateInputFormat {
    /// Strict ISO-8601 calendar date, `YYYY-MM-DD`, zero padded.
    #[default]
    IsoLocalDate,
    /// Custom `chrono` strftime pattern, e.g. `%d/%m/%Y`.
    Pattern(String),
}

/// Parsing rules applied to `launchDate` on creation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchDateConfig {
    pub format: DateInputFormat,
    /// Strip surrounding whitespace before parsing. Off by default.
    pub trim_input: bool,
}

impl LaunchDateConfig {
    /// Parses `text` into a calendar date, or explains why it is not one.
    pub fn parse(&self, text: &str) -> Result<NaiveDate, String> {
        let candidate = if self.trim_input { text.trim() } else { text };

        match &self.format {
            DateInputFormat::IsoLocalDate => {
                if !ISO_LOCAL_DATE_RE.is_match(candidate) {
                    return Err("expected an ISO-8601 date (YYYY-MM-DD)".to_string());
                }
                NaiveDate::parse_from_str(candidate, ISO_LOCAL_DATE_FORMAT)
                    .map_err(|err| err.to_string())
            }
            DateInputFormat::Pattern(pattern) => NaiveDate::parse_from_str(candidate, pattern)
                .map_err(|err| format!("does not match `{pattern}`: {err}")),
        }
    }
}

/// Transactional use-case layer over a `VehicleRepository`.
pub struct VehicleService<R: VehicleRepository> {
    repo: R,
    date_config: LaunchDateConfig,
}

impl<R: VehicleRepository> VehicleService<R> {
    /// Creates a service with ISO launch-date parsing.
    pub fn new(repo: R) -> Self {
        Self::with_date_config(repo, LaunchDateConfig::default())
    }

    pub fn with_date_config(repo: R, date_config: LaunchDateConfig) -> Self {
        Self { repo, date_config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Parses the launch date, then saves a new vehicle in a read-write
    /// transaction.
    ///
    /// # Errors
    /// - `InvalidInput` when `launch_date` is not a date; the store is untouched.
    /// - `Storage` when the insert or commit fails; nothing is persisted.
    pub fn create_vehicle(
        &self,
        kind: impl Into<String>,
        model_code: impl Into<String>,
        brand_name: impl Into<String>,
        launch_date: &str,
    ) -> ServiceResult<Vehicle> {
        let parsed = self.date_config.parse(launch_date).map_err(|reason| {
            warn!("event=vehicle_create module=service status=error error_code=invalid_launch_date");
            ServiceError::invalid("launchDate", launch_date, reason)
        })?;

        let vehicle = Vehicle::new(kind, model_code, brand_name, parsed);
        let saved = self
            .repo
            .in_transaction(TransactionMode::ReadWrite, |repo| repo.save(&vehicle))?;

        info!(
            "event=vehicle_create module=service status=ok id={}",
            saved.id.unwrap_or_default()
        );
        Ok(saved)
    }

    /// Returns at most `count` vehicles in store order.
    ///
    /// # Errors
    /// - `InvalidInput` when `count` is negative.
    /// - `Storage` on read failure.
    pub fn get_all_vehicles(&self, count: i64) -> ServiceResult<Vec<Vehicle>> {
        let limit = usize::try_from(count)
            .map_err(|_| ServiceError::invalid("count", count.to_string(), "must be non-negative"))?;

        let mut vehicles = self
            .repo
            .in_transaction(TransactionMode::ReadOnly, |repo| repo.find_all())?;
        vehicles.truncate(limit);

        debug!(
            "event=vehicle_list module=service status=ok requested={count} returned={}",
            vehicles.len()
        );
        Ok(vehicles)
    }

    /// Looks up one vehicle; a missing id yields `Ok(None)`.
    pub fn get_vehicle(&self, id: VehicleId) -> ServiceResult<Option<Vehicle>> {
        let found = self
            .repo
            .in_transaction(TransactionMode::ReadOnly, |repo| repo.find_by_id(id))?;

        debug!(
            "event=vehicle_get module=service status=ok id={id} found={}",
            found.is_some()
        );
        Ok(found)
    }
}
