//! Configuration schema definitions.
//!
//! Every section rejects unknown fields and falls back to a default for each
//! field that is omitted.

use hermes_core::{DEFAULT_EVENT_SOURCE, DEFAULT_EVENT_TYPE};
use serde::{Deserialize, Serialize};

/// The function a host serves and how its events are stamped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FunctionConfig {
    /// Function name, used as the metrics label and span field.
    #[serde(default = "default_function_name")]
    pub name: String,

    /// `source` attribute of events built by the host.
    #[serde(default = "default_event_source")]
    pub event_source: String,

    /// `type` attribute of events built by the host.
    #[serde(default = "default_event_type")]
    pub event_type: String,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            name: default_function_name(),
            event_source: default_event_source(),
            event_type: default_event_type(),
        }
    }
}

fn default_function_name() -> String {
    "function".to_string()
}

fn default_event_source() -> String {
    DEFAULT_EVENT_SOURCE.to_string()
}

fn default_event_type() -> String {
    DEFAULT_EVENT_TYPE.to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logs.
    #[default]
    Json,
    /// Human-readable output.
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable the log subscriber.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info", "hermes::function=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Emit an event when each invocation span closes.
    #[serde(default)]
    pub span_events: bool,

    /// Include file and line in log output.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            span_events: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Histogram buckets for invocation duration, in seconds.
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: default_duration_buckets(),
        }
    }
}

fn default_duration_buckets() -> Vec<f64> {
    hermes_telemetry::MetricsConfig::default().duration_buckets
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Service name for telemetry identification.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Deployment environment (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_service_name() -> String {
    "hermes".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_true() -> bool {
    true
}
