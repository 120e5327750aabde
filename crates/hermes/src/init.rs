//! Process startup.

use hermes_config::{ConfigError, HermesConfig};
use hermes_core::{LogSink, LoggingSinkError};
use hermes_telemetry::TelemetryError;
use std::sync::Arc;
use thiserror::Error;

/// Errors from process startup.
#[derive(Debug, Error)]
pub enum InitError {
    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging or metrics could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// The ambient log sink could not be installed.
    #[error(transparent)]
    Sink(#[from] LoggingSinkError),
}

/// Validates `config` and installs telemetry for the process.
///
/// Call once at startup. Functions then log through the default
/// [`TracingSink`](hermes_core::logging::TracingSink), which feeds the
/// installed subscriber.
///
/// # Errors
///
/// Returns `InitError` if validation fails or telemetry is already installed.
pub fn init(config: &HermesConfig) -> Result<(), InitError> {
    config.validate()?;
    hermes_telemetry::init_telemetry(&config.telemetry_config())?;
    tracing::info!(function = %config.function.name, "hermes initialized");
    Ok(())
}

/// Like [`init`], but also installs `sink` as the ambient log sink.
///
/// The sink is installed only after validation and telemetry succeed, so a
/// failed call leaves the ambient sink untouched.
///
/// # Errors
///
/// Returns `InitError::Sink` if an ambient sink was already installed or
/// already used.
pub fn init_with_sink(config: &HermesConfig, sink: Arc<dyn LogSink>) -> Result<(), InitError> {
    config.validate()?;
    hermes_telemetry::init_telemetry(&config.telemetry_config())?;
    hermes_core::logging::install_global_sink(sink)?;
    tracing::info!(function = %config.function.name, "hermes initialized");
    Ok(())
}
