//! Observability for the Hermes function invocation runtime.
//!
//! - **Logging**: process-wide `tracing` subscriber, JSON or pretty output
//! - **Metrics**: Prometheus-format invocation metrics via the `metrics` crate
//! - **Instrumentation**: [`Instrumented`] wraps a dispatchable function with
//!   a span, start/finish events and metrics
//!
//! Everything here is initialized once at process start. Function code never
//! touches this crate directly; it logs through the
//! [`Logger`](hermes_core::Logger) in its context.
//!
//! # Example
//!
//! ```rust,ignore
//! use hermes_telemetry::{TelemetryConfig, init_telemetry};
//!
//! let config = TelemetryConfig::builder()
//!     .service_name("reverse-fn")
//!     .environment("production")
//!     .build();
//!
//! init_telemetry(&config)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod instrument;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use instrument::Instrumented;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, render_metrics, MetricsConfig, Outcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if any subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;

    tracing::info!(
        service.name = %config.service_name,
        environment = %config.environment,
        "telemetry initialized"
    );
    Ok(())
}
