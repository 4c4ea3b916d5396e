//! Behavioral drives
//!
//! Drive weights live in the unit's flash and feed its instinct model. Each
//! call here is an independent transaction over the transport.

use crate::named::{NamedValueChannel, NamedValueProtocol};
use neural_unit_core::codec::DRIVE_NAME_WIDTH;
use neural_unit_core::{Command, HostMirror, NamedValueMap, Result, Transport};
use std::sync::Arc;
use tracing::{debug, info};

/// Built-in drive table, applied in this order by [`DriveRegistry::load_defaults`]
pub const DEFAULT_DRIVES: [(&str, f64); 6] = [
    ("curiosity", 0.7),
    ("social", 0.85),
    ("rest", 0.4),
    ("hunger", 0.5),
    ("play", 0.75),
    ("self_preserve", 0.9),
];

const DRIVE_PROTOCOL: NamedValueProtocol = NamedValueProtocol {
    kind: "drive",
    set: Command::SetDrive,
    get: Command::GetDrive,
    list: Command::ListDrives,
    width: DRIVE_NAME_WIDTH,
};

/// Reads and writes drive weights on the unit
pub struct DriveRegistry<T> {
    channel: NamedValueChannel<T>,
}

impl<T: Transport> DriveRegistry<T> {
    /// Create a registry that mirrors nothing
    pub fn new(transport: T) -> Self {
        Self {
            channel: NamedValueChannel::new(transport, DRIVE_PROTOCOL),
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

    /// Set a drive weight in `[0, 1]`. Names longer than 16 bytes are truncated.
    pub fn set_drive(&self, name: &str, weight: f64) -> Result<()> {
        self.channel.set(name, weight)?;
        debug!(drive = name, weight, "set_drive");
        Ok(())
    }

    /// Read one drive weight from the first two bytes of the reply
    pub fn get_drive(&self, name: &str) -> Result<f64> {
        let weight = self.channel.get(name)?;
        debug!(drive = name, weight, "get_drive");
        Ok(weight)
    }

    /// Every drive the unit reports, in the order the unit listed them
    pub fn list_drives(&self) -> Result<NamedValueMap> {
        let drives: NamedValueMap = self
            .channel
            .list()?
            .into_iter()
            .map(|d| (d.name, d.value))
            .collect();
        self.channel.mirror_all(&drives);
        debug!(count = drives.len(), "list_drives");
        Ok(drives)
    }

    /// Write [`DEFAULT_DRIVES`] one at a time
    ///
    /// Not atomic: on failure, drives before the failing one stay set and the
    /// rest are untouched.
    pub fn load_defaults(&self) -> Result<()> {
        for (name, weight) in DEFAULT_DRIVES {
            self.set_drive(name, weight)?;
        }
        info!(count = DEFAULT_DRIVES.len(), "default drives loaded");
        Ok(())
    }
}
