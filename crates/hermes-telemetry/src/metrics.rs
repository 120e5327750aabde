//! Prometheus metrics for Hermes.
//!
//! Metrics are recorded through the `metrics` facade. [`init_metrics`]
//! installs a Prometheus recorder whose output the host renders on demand with
//! [`render_metrics`]; no listener is opened here.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `hermes_invocations_total` | Counter | `function`, `outcome` | Finished invocations |
//! | `hermes_invocation_duration_seconds` | Histogram | `function` | Invocation latency |
//! | `hermes_in_flight_invocations` | Gauge | - | Invocations currently running |
//! | `hermes_log_records_dropped_total` | Counter | `function` | Records rejected by a log sink |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use hermes_core::{FailureKind, InvocationFailure};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Counter of finished invocations.
pub const INVOCATIONS_TOTAL: &str = "hermes_invocations_total";

/// Histogram of invocation latency.
pub const INVOCATION_DURATION_SECONDS: &str = "hermes_invocation_duration_seconds";

/// Gauge of running invocations.
pub const IN_FLIGHT_INVOCATIONS: &str = "hermes_in_flight_invocations";

/// Counter of log records a sink rejected.
pub const LOG_RECORDS_DROPPED_TOTAL: &str = "hermes_log_records_dropped_total";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Service name for metric labels.
    pub service_name: String,

    /// Histogram buckets for invocation duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: "hermes".to_string(),
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// How an invocation ended, as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The function returned an output.
    Success,
    /// The function body failed.
    ExecutionError,
    /// Decoding or encoding failed.
    SerializationError,
}

impl Outcome {
    /// Classifies a dispatch result.
    #[must_use]
    pub fn of<T>(result: &Result<T, InvocationFailure>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(failure) => match failure.kind {
                FailureKind::Execution => Self::ExecutionError,
                FailureKind::Serialization => Self::SerializationError,
            },
        }
    }

    /// Returns the label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ExecutionError => "execution_error",
            Self::SerializationError => "serialization_error",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initializes the metrics subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if the buckets are invalid or a
/// recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(INVOCATION_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::InvalidConfig(e.to_string()))?
        .add_global_label("service", config.service_name.clone())
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);

    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

/// Registers descriptions for all standard metrics.
pub fn register_metric_descriptions() {
    describe_counter!(INVOCATIONS_TOTAL, "Total number of finished invocations");
    describe_histogram!(
        INVOCATION_DURATION_SECONDS,
        "Invocation duration in seconds"
    );
    describe_gauge!(
        IN_FLIGHT_INVOCATIONS,
        "Number of invocations currently running"
    );
    describe_counter!(
        LOG_RECORDS_DROPPED_TOTAL,
        "Log records rejected by the log sink"
    );
}

/// Records a finished invocation.
pub fn record_invocation(function: &str, outcome: Outcome, duration: Duration) {
    counter!(
        INVOCATIONS_TOTAL,
        "function" => function.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(
        INVOCATION_DURATION_SECONDS,
        "function" => function.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records log records a sink rejected during one invocation.
pub fn record_dropped_log_records(function: &str, count: u64) {
    counter!(
        LOG_RECORDS_DROPPED_TOTAL,
        "function" => function.to_string()
    )
    .increment(count);
}

/// Guard that keeps the in-flight gauge raised while alive.
///
/// The gauge is lowered on drop, including during unwinding.
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_INVOCATIONS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_INVOCATIONS).decrement(1.0);
    }
}
