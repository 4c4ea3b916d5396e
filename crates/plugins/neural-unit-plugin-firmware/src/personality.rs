//! Personality traits
//!
//! Traits are values in `[0, 1]` stored in the unit's flash. They drift slowly
//! with the events encoded into memory. Snapshots can be saved to and restored
//! from a JSON file for backup.

use crate::named::{NamedValueChannel, NamedValueProtocol};
use crate::snapshot::{JsonSnapshotStore, SnapshotStore, TraitSnapshot};
use neural_unit_core::codec::{round_to, TRAIT_NAME_WIDTH};
use neural_unit_core::{Command, HostMirror, Result, Transport, DESTRUCTIVE_SENTINEL};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Factory trait table, applied in this order by [`PersonalityEngine::load_defaults`]
pub const DEFAULT_TRAITS: [(&str, f64); 6] = [
    ("bold", 0.5),
    ("playful", 0.6),
    ("cautious", 0.5),
    ("affectionate", 0.6),
    ("vocal", 0.5),
    ("independent", 0.4),
];

/// Decimal places kept in snapshots
pub const SNAPSHOT_PRECISION: i32 = 4;

const TRAIT_PROTOCOL: NamedValueProtocol = NamedValueProtocol {
    kind: "trait",
    set: Command::TraitSet,
    get: Command::TraitGet,
    list: Command::TraitSnapshot,
    width: TRAIT_NAME_WIDTH,
};

/// Reads, writes and backs up personality traits on the unit
pub struct PersonalityEngine<T> {
    channel: NamedValueChannel<T>,
}

impl<T: Transport> PersonalityEngine<T> {
    /// Create an engine that mirrors nothing
    pub fn new(transport: T) -> Self {
        Self {
            channel: NamedValueChannel::new(transport, TRAIT_PROTOCOL),
        }
    }

    /// Record every successful round trip in `mirror`
    pub fn with_mirror(mut self, mirror: Arc<dyn HostMirror>) -> Self {
        self.channel.set_mirror(mirror);
        self
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        self.channel.transport()
    }

    /// Read one trait
    pub fn get(&self, name: &str) -> Result<f64> {
        self.channel.get(name)
    }

    /// Set one trait in `[0, 1]`
    pub fn set(&self, name: &str, value: f64) -> Result<()> {
        self.channel.set(name, value)?;
        debug!(trait_name = name, value, "personality.set");
        Ok(())
    }

    /// All traits in device order, rounded to four decimal places
    pub fn snapshot(&self) -> Result<TraitSnapshot> {
        let traits: TraitSnapshot = self
            .channel
            .list()?
            .into_iter()
            .map(|t| (t.name, round_to(t.value, SNAPSHOT_PRECISION)))
            .collect();
        self.channel.mirror_all(&traits);
        Ok(traits)
    }

    /// Take a snapshot and write it to `store`
    pub fn save_to(&self, store: &dyn SnapshotStore) -> Result<TraitSnapshot> {
        let snapshot = self.snapshot()?;
        store.save(&snapshot)?;
        Ok(snapshot)
    }

    /// Apply every entry of `store` with [`PersonalityEngine::set`], in stored order
    ///
    /// Not atomic: entries before a failing one stay applied. Returns the
    /// number of traits written.
    pub fn load_from(&self, store: &dyn SnapshotStore) -> Result<usize> {
        let snapshot = store.load()?;
        for (name, value) in &snapshot {
            self.set(name, *value)?;
        }
        Ok(snapshot.len())
    }

    /// Save a JSON snapshot at `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.save_to(&JsonSnapshotStore::new(path))?;
        info!(path = %path.display(), traits = snapshot.len(), "personality snapshot saved");
        Ok(())
    }

    /// Restore a JSON snapshot from `path`
    pub fn load(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let count = self.load_from(&JsonSnapshotStore::new(path))?;
        info!(path = %path.display(), traits = count, "personality snapshot loaded");
        Ok(())
    }

    /// Write [`DEFAULT_TRAITS`] one at a time; not atomic
    pub fn load_defaults(&self) -> Result<()> {
        for (name, value) in DEFAULT_TRAITS {
            self.set(name, value)?;
        }
        Ok(())
    }

    /// Reset every trait to firmware defaults. Destructive.
    ///
    /// Back up with [`PersonalityEngine::save`] first; no confirmation happens here.
    pub fn reset(&self) -> Result<()> {
        warn!("resetting personality to factory defaults");
        self.channel
            .transport()
            .send_command(Command::TraitReset, &DESTRUCTIVE_SENTINEL)?;
        Ok(())
    }
}
