//! Environment-driven configuration for the query surface.
//!
//! Unset, empty, or whitespace-only variables fall back to defaults.

use std::path::PathBuf;
use vehicle_core::{default_log_level, DateInputFormat, LaunchDateConfig};

pub const DB_PATH_ENV: &str = "VEHICLE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "VEHICLE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "VEHICLE_LOG_DIR";
pub const LAUNCH_DATE_FORMAT_ENV: &str = "VEHICLE_LAUNCH_DATE_FORMAT";

const DEFAULT_DB_FILE_NAME: &str = "vehicle_service.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is enabled only when this is set.
    pub log_dir: Option<String>,
    pub launch_date: LaunchDateConfig,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let launch_date = match value(LAUNCH_DATE_FORMAT_ENV) {
            Some(pattern) => LaunchDateConfig {
                format: DateInputFormat::Pattern(pattern),
                ..LaunchDateConfig::default()
            },
            None => LaunchDateConfig::default(),
        };

        Self {
            db_path: value(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(LOG_DIR_ENV),
            launch_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ApiConfig::from_lookup(|_| None);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("vehicle_service.sqlite3")
        );
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
        assert_eq!(config.launch_date, LaunchDateConfig::default());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = ApiConfig::from_lookup(lookup_from(&[(DB_PATH_ENV, "  "), (LOG_DIR_ENV, "")]));
        assert!(config.db_path.ends_with(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_are_trimmed_and_used() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, " /var/lib/vehicles.db "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/vehicles"),
            (LAUNCH_DATE_FORMAT_ENV, "%d/%m/%Y"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/var/lib/vehicles.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/vehicles"));
        assert_eq!(
            config.launch_date.format,
            DateInputFormat::Pattern("%d/%m/%Y".to_string())
        );
    }
}
