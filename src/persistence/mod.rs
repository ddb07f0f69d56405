use crate::grid::{DayColumn, Grid};
use crate::grid_validation;
use std::fmt;
use std::io;

/// Slot holding the serialized weekly grid.
pub const GRID_SLOT_KEY: &str = "timetable-grid";

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(serde_json::Error),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    InvalidData(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Serialization(err) => Some(err),
            PersistenceError::Io(err) => Some(err),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => Some(err),
            PersistenceError::Csv(err) => Some(err),
            PersistenceError::InvalidData(_) => None,
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable string-keyed storage, one value per key.
pub trait SlotStore {
    fn read_slot(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn write_slot(&mut self, key: &str, value: &str) -> PersistenceResult<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for &mut S {
    fn read_slot(&self, key: &str) -> PersistenceResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        (**self).write_slot(key, value)
    }
}

impl<S: SlotStore + ?Sized> SlotStore for Box<S> {
    fn read_slot(&self, key: &str) -> PersistenceResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        (**self).write_slot(key, value)
    }
}

pub fn encode_grid(grid: &Grid) -> PersistenceResult<String> {
    Ok(serde_json::to_string(grid)?)
}

/// Parses a snapshot and checks it against the fixed 7×12 shape.
pub fn decode_grid(snapshot: &str) -> PersistenceResult<Grid> {
    let columns: Vec<DayColumn> = serde_json::from_str(snapshot)?;
    validate_columns(columns)
}

pub fn validate_columns(columns: Vec<DayColumn>) -> PersistenceResult<Grid> {
    grid_validation::validate_columns(columns)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{FileSlotStore, load_grid_from_csv, save_grid_to_csv};
pub use memory::MemorySlotStore;
