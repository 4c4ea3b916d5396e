//! Neural Unit Firmware Plugin
//!
//! Issues firmware protocol v3 commands to the neural unit over a shared
//! transport and decodes the replies.
//!
//! # Features
//! - Drives: set/get/list and the built-in default table
//! - Memory: episodic encode/recall, subject trust, wipe
//! - Personality: traits get/set/snapshot/reset, JSON backup and restore
//! - Optional host mirrors of last-observed drive and trait values

use neural_unit_core::config::{
    DEFAULT_RECALL_LIMIT, DEFAULT_SNAPSHOT_PATH, ENV_LOG_LEVEL, ENV_MIRROR, ENV_RECALL_LIMIT,
    ENV_SNAPSHOT_PATH,
};
use neural_unit_core::{
    load_env, HostMirror, InMemoryMirror, Logger, Plugin, Result, Transport, UnitConfig,
};
use std::collections::HashMap;
use std::sync::Arc;

mod named;

pub mod drives;
pub use drives::{DriveRegistry, DEFAULT_DRIVES};

pub mod memory;
pub use memory::{is_known_event, MemoryStore, EVENT_NAMES};

pub mod personality;
pub use personality::{PersonalityEngine, DEFAULT_TRAITS};

pub mod snapshot;
pub use snapshot::{JsonSnapshotStore, SnapshotStore, TraitSnapshot};

// ============================================================================
// Settings Banner Rendering
// ============================================================================

/// Represents a configuration setting row for display
struct SettingRow {
    env_var: &'static str,
    value: String,
    is_default: bool,
}

impl SettingRow {
    fn from_env(env_var: &'static str, default: &str) -> Self {
        match std::env::var(env_var) {
            Ok(value) => Self {
                env_var,
                value,
                is_default: false,
            },
            Err(_) => Self {
                env_var,
                value: default.to_string(),
                is_default: true,
            },
        }
    }
}

/// Pad string to width, truncating if necessary
fn pad(s: &str, w: usize) -> String {
    let mut out: String = s.chars().take(w).collect();
    let len = out.chars().count();
    out.push_str(&" ".repeat(w - len));
    out
}

/// Render the firmware plugin settings table
fn render_settings_banner(rows: &[SettingRow]) -> String {
    let mut out = Vec::new();
    out.push(format!("+{}+", "=".repeat(70)));
    out.push(format!(
        "|{}|",
        pad("  NEURAL UNIT FIRMWARE  drives ^ memory ^ personality  (protocol v3)", 70)
    ));
    out.push(format!("+{}+", "-".repeat(70)));
    out.push(format!(
        "|{}|{}|{}|",
        pad(" ENV VARIABLE", 30),
        pad(" VALUE", 28),
        pad(" STATUS", 10)
    ));
    out.push(format!("+{}+", "-".repeat(70)));
    for row in rows {
        let status = if row.is_default { "default" } else { "custom" };
        let icon = if row.is_default { " " } else { "^" };
        out.push(format!(
            "|{}{}|{}|{}|",
            icon,
            pad(&format!(" {}", row.env_var), 29),
            pad(&format!(" {}", row.value), 28),
            pad(&format!(" {}", status), 10)
        ));
    }
    out.push(format!("+{}+", "=".repeat(70)));
    out.join("\n")
}

/// All three firmware domains wired to one transport
pub struct FirmwarePlugin<T> {
    config: UnitConfig,
    drives: DriveRegistry<Arc<T>>,
    memory: MemoryStore<Arc<T>>,
    personality: PersonalityEngine<Arc<T>>,
    drive_mirror: Option<Arc<InMemoryMirror>>,
    trait_mirror: Option<Arc<InMemoryMirror>>,
}

impl<T: Transport> FirmwarePlugin<T> {
    /// Create a new firmware plugin
    pub fn new(transport: T, config: UnitConfig) -> Self {
        let transport = Arc::new(transport);

        let mut drives = DriveRegistry::new(Arc::clone(&transport));
        let mut personality = PersonalityEngine::new(Arc::clone(&transport));
        let memory =
            MemoryStore::new(Arc::clone(&transport)).with_recall_limit(config.recall_limit);

        let (drive_mirror, trait_mirror) = if config.mirror_enabled {
            let drive_mirror = InMemoryMirror::shared();
            let trait_mirror = InMemoryMirror::shared();
            drives = drives.with_mirror(drive_mirror.clone() as Arc<dyn HostMirror>);
            personality = personality.with_mirror(trait_mirror.clone() as Arc<dyn HostMirror>);
            (Some(drive_mirror), Some(trait_mirror))
        } else {
            (None, None)
        };

        Self {
            config,
            drives,
            memory,
            personality,
            drive_mirror,
            trait_mirror,
        }
    }

    /// Create a plugin configured from `NEURAL_UNIT_*` environment variables,
    /// after merging any `.env` file
    pub fn from_env(transport: T) -> Result<Self> {
        load_env()?;
        Ok(Self::new(transport, UnitConfig::from_env()?))
    }

    /// Active configuration
    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// Drive registry
    pub fn drives(&self) -> &DriveRegistry<Arc<T>> {
        &self.drives
    }

    /// Memory store
    pub fn memory(&self) -> &MemoryStore<Arc<T>> {
        &self.memory
    }

    /// Personality engine
    pub fn personality(&self) -> &PersonalityEngine<Arc<T>> {
        &self.personality
    }

    /// Last-observed drive values, when mirroring is enabled
    pub fn drive_mirror(&self) -> Option<&InMemoryMirror> {
        self.drive_mirror.as_deref()
    }

    /// Last-observed trait values, when mirroring is enabled
    pub fn trait_mirror(&self) -> Option<&InMemoryMirror> {
        self.trait_mirror.as_deref()
    }

    /// Save a personality snapshot to the configured path
    pub fn backup_personality(&self) -> Result<()> {
        self.personality.save(&self.config.snapshot_path)
    }

    /// Restore the personality snapshot from the configured path
    pub fn restore_personality(&self) -> Result<()> {
        self.personality.load(&self.config.snapshot_path)
    }
}

impl<T: Transport> Plugin for FirmwarePlugin<T> {
    fn name(&self) -> &str {
        "firmware"
    }

    fn description(&self) -> &str {
        "Drive, memory and personality commands for the neural unit"
    }

    fn init(&self, _config: HashMap<String, String>) -> Result<()> {
        let recall_default = DEFAULT_RECALL_LIMIT.to_string();
        let rows = [
            SettingRow::from_env(ENV_SNAPSHOT_PATH, DEFAULT_SNAPSHOT_PATH),
            SettingRow::from_env(ENV_RECALL_LIMIT, &recall_default),
            SettingRow::from_env(ENV_MIRROR, "true"),
            SettingRow::from_env(ENV_LOG_LEVEL, "info"),
        ];
        eprintln!("{}", render_settings_banner(&rows));

        Logger::new(self.name()).info(&format!(
            "Firmware plugin initialized (recall limit {}, mirror {})",
            self.config.recall_limit,
            if self.config.mirror_enabled { "on" } else { "off" }
        ));

        Ok(())
    }
}
