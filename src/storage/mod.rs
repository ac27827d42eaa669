//! Snapshot persistence: the storage seam and its JSON backend.

pub mod json_backend;

pub use json_backend::{
    export_to_path, import_from_path, import_from_str, JsonStorage, Snapshot, SNAPSHOT_VERSION,
};

use std::path::PathBuf;

use crate::domain::Workbook;
use crate::errors::EngineError;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Persistence seam for workbook snapshots.
pub trait SnapshotStore {
    /// Persists the workbook under `name`, returning the written path.
    fn save(&self, workbook: &Workbook, name: &str) -> Result<PathBuf>;
    /// Reconstitutes a workbook from the snapshot stored under `name`.
    fn load(&self, name: &str) -> Result<Workbook>;
}
