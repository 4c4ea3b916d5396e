//! Logging utilities

use crate::config::ENV_LOG_LEVEL;
use once_cell::sync::OnceCell;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Logger wrapper for component-scoped logging
#[derive(Clone)]
pub struct Logger {
    namespace: String,
}

impl Logger {
    /// Create a new logger with a namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Namespace prefixed to every message
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Log an info message
    pub fn info(&self, message: &str) {
        info!("[{}] {}", self.namespace, message);
    }

    /// Log a debug message
    pub fn debug(&self, message: &str) {
        debug!("[{}] {}", self.namespace, message);
    }

    /// Log a warning message
    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.namespace, message);
    }

    /// Log an error message
    pub fn error(&self, message: &str) {
        error!("[{}] {}", self.namespace, message);
    }
}

/// Initialize the global logging system
///
/// `RUST_LOG` wins over `NEURAL_UNIT_LOG_LEVEL`; both fall back to `info`.
/// Repeated calls are no-ops, and an already installed subscriber is left alone.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let level = std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string());
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    });
}
