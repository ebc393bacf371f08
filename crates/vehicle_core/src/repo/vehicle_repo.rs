//! Vehicle store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and load `Vehicle` rows from the `vehicle` table.
//! - Provide the transaction boundary used by the service layer.
//!
//! # Invariants
//! - `save` on an unsaved vehicle always yields a fresh, increasing id.
//! - Lookups by id report absence as `Ok(None)`, never as an error.
//! - Rows are listed in ascending id (insertion) order.
//! - Read-only transactions reject every write through `PRAGMA query_only`.

use crate::db::DbError;
use crate::model::vehicle::{Vehicle, VehicleId};
use chrono::NaiveDate;
use log::{debug, warn};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const VEHICLE_SELECT_SQL: &str = "SELECT
    id,
    type,
    model_code,
    brand_name,
    launch_date
FROM vehicle";

const LAUNCH_DATE_DB_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-layer failure for vehicle persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted vehicle data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Kind of transaction boundary wrapped around a unit of store work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    /// No writes may happen; the backend may skip write locking.
    ReadOnly,
    /// Writes are allowed and committed together, or not at all.
    ReadWrite,
}

impl TransactionMode {
    fn behavior(self) -> TransactionBehavior {
        match self {
            Self::ReadOnly => TransactionBehavior::Deferred,
            Self::ReadWrite => TransactionBehavior::Immediate,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::ReadWrite => "read_write",
        }
    }
}

/// Keyed storage contract for vehicles.
pub trait VehicleRepository {
    /// Persists `vehicle`, assigning an id when it has none.
    fn save(&self, vehicle: &Vehicle) -> RepoResult<Vehicle>;
    fn find_by_id(&self, id: VehicleId) -> RepoResult<Option<Vehicle>>;
    fn find_all(&self) -> RepoResult<Vec<Vehicle>>;
    fn count(&self) -> RepoResult<u64>;

    /// Runs `work` inside one transaction of the given mode.
    ///
    /// Commits when `work` returns `Ok`, rolls back otherwise. Transactions
    /// do not nest.
    fn in_transaction<T, E, F>(&self, mode: TransactionMode, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed vehicle store.
pub struct SqliteVehicleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVehicleRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl VehicleRepository for SqliteVehicleRepository<'_> {
    fn save(&self, vehicle: &Vehicle) -> RepoResult<Vehicle> {
        let launch_date = vehicle.launch_date.format(LAUNCH_DATE_DB_FORMAT).to_string();

        let id = match vehicle.id {
            None => {
                self.conn.execute(
                    "INSERT INTO vehicle (type, model_code, brand_name, launch_date)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        vehicle.kind.as_str(),
                        vehicle.model_code.as_str(),
                        vehicle.brand_name.as_str(),
                        launch_date,
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO vehicle (id, type, model_code, brand_name, launch_date)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                        type = excluded.type,
                        model_code = excluded.model_code,
                        brand_name = excluded.brand_name,
                        launch_date = excluded.launch_date;",
                    params![
                        id,
                        vehicle.kind.as_str(),
                        vehicle.model_code.as_str(),
                        vehicle.brand_name.as_str(),
                        launch_date,
                    ],
                )?;
                id
            }
        };

        debug!("event=vehicle_save module=repo status=ok id={id}");
        Ok(vehicle.clone().with_id(id))
    }

    fn find_by_id(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VEHICLE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_vehicle_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_all(&self) -> RepoResult<Vec<Vehicle>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VEHICLE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut vehicles = Vec::new();
        while let Some(row) = rows.next()? {
            vehicles.push(parse_vehicle_row(row)?);
        }
        Ok(vehicles)
    }

    fn count(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM vehicle;", [], |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{total}`")))
    }

    fn in_transaction<T, E, F>(&self, mode: TransactionMode, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        let read_only = mode == TransactionMode::ReadOnly;
        let tx = Transaction::new_unchecked(self.conn, mode.behavior()).map_err(RepoError::from)?;
        if read_only {
            tx.pragma_update(None, "query_only", true)
                .map_err(RepoError::from)?;
        }

        let outcome = work(self);

        if read_only {
            tx.pragma_update(None, "query_only", false)
                .map_err(RepoError::from)?;
        }

        match outcome {
            Ok(value) => {
                tx.commit().map_err(RepoError::from)?;
                debug!("event=tx_commit module=repo status=ok mode={}", mode.label());
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=tx_rollback module=repo status=error mode={} error={rollback_err}",
                        mode.label()
                    );
                } else {
                    debug!("event=tx_rollback module=repo status=ok mode={}", mode.label());
                }
                Err(err)
            }
        }
    }
}

fn parse_vehicle_row(row: &Row<'_>) -> RepoResult<Vehicle> {
    let id: VehicleId = row.get("id")?;
    let date_text: String = row.get("launch_date")?;
    let launch_date = NaiveDate::parse_from_str(&date_text, LAUNCH_DATE_DB_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid launch date `{date_text}` in vehicle.launch_date (id={id})"
        ))
    })?;

    Ok(Vehicle {
        id: Some(id),
        kind: row.get("type")?,
        model_code: row.get("model_code")?,
        brand_name: row.get("brand_name")?,
        launch_date,
    })
}
