//! Neural Unit Core
//!
//! Host-side building blocks for talking to the neural unit, the companion
//! device that keeps drives, memory and personality onboard. The host never
//! runs behavioral logic; it sends fixed-format commands and decodes
//! fixed-format replies. This crate provides:
//!
//! - The command registry shared by all domains
//! - The synchronous transport contract
//! - Quantization, name-field and record codecs
//! - The write-only host mirror
//! - Errors, configuration and logging
//!
//! # Example
//!
//! ```
//! use neural_unit_core::codec::{decode_named_value_array, encode_named_value, DRIVE_NAME_WIDTH};
//!
//! let record = encode_named_value("curiosity", DRIVE_NAME_WIDTH, 0.7).unwrap();
//! assert_eq!(record.len(), 18);
//!
//! let decoded = decode_named_value_array(&record, DRIVE_NAME_WIDTH).unwrap();
//! assert_eq!(decoded[0].name, "curiosity");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod mirror;
pub mod plugin;
pub mod transport;
pub mod utils;

pub use codec::{EpisodicRecord, NamedValue, NamedValueMap, SubjectHash};
pub use command::{Command, Domain, DESTRUCTIVE_SENTINEL};
pub use config::{get_env_bool, get_env_or, load_env, load_env_from_path, UnitConfig};
pub use error::{Result, UnitError};
pub use mirror::{HostMirror, InMemoryMirror, NullMirror};
pub use plugin::{validate_plugin, Plugin};
#[cfg(any(test, feature = "mock"))]
pub use transport::MockTransport;
pub use transport::{ExclusiveTransport, Link, Transport};
pub use utils::{init_logging, Logger};
