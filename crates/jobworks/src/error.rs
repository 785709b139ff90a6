use thiserror::Error;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Failures surfaced while bootstrapping the service.
///
/// Request-level failures never reach this type; each area maps its own error
/// enum onto an HTTP response instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
