//! Personality snapshot persistence

use neural_unit_core::{NamedValueMap, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Trait name to value, in device order when taken and file order when loaded
pub type TraitSnapshot = NamedValueMap;

/// Somewhere a personality snapshot can be kept
pub trait SnapshotStore {
    /// Persist a snapshot, replacing any previous one
    fn save(&self, snapshot: &TraitSnapshot) -> Result<()>;

    /// Read the persisted snapshot
    fn load(&self) -> Result<TraitSnapshot>;
}

/// Pretty-printed JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn save(&self, snapshot: &TraitSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)?;
        Ok(())
    }

    fn load(&self) -> Result<TraitSnapshot> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
