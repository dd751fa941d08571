//! Logging setup.
//!
//! Libraries in this workspace only emit `tracing` events; installing a
//! subscriber is left to the binary.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::EdutaskResult;
use serde::{Deserialize, Serialize};

/// Log levels accepted by [`TelemetryConfig::log_level`].
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_output: bool,

    /// Include the event target (module path) in output.
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_with_target() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_output: false,
            with_target: default_with_target(),
        }
    }
}

impl TelemetryConfig {
    /// Returns the filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_directive(&self) -> String {
        format!("{level},edutask={level},mongodb=warn", level = self.log_level)
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over [`TelemetryConfig::log_level`] when present.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &TelemetryConfig) -> EdutaskResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_output {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(config.with_target))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(config.with_target))
            .try_init()
    };

    result.map_err(|e| crate::EdutaskError::Internal(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::debug!(
        log_level = %config.log_level,
        json_output = config.json_output,
        "Tracing initialized"
    );

    Ok(())
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &TelemetryConfig) -> EdutaskResult<()> {
    Ok(())
}
