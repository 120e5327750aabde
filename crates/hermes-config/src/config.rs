//! Root configuration structure.

use crate::{ConfigError, FunctionConfig, LogFormat, TelemetryConfigSection};
use hermes_telemetry::{LogConfig, TelemetryConfig};
use serde::{Deserialize, Serialize};

/// Root configuration for a Hermes function host.
///
/// # Example
///
/// ```
/// use hermes_config::HermesConfig;
///
/// let config = HermesConfig::default();
/// assert_eq!(config.telemetry.service_name, "hermes");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct HermesConfig {
    /// The function served and the metadata stamped on its events.
    #[serde(default)]
    pub function: FunctionConfig,

    /// Logging and metrics.
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,
}

impl HermesConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HermesConfigBuilder {
        HermesConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("function.name", &self.function.name)?;
        require_non_empty("function.event_source", &self.function.event_source)?;
        require_non_empty("function.event_type", &self.function.event_type)?;
        require_non_empty("telemetry.service_name", &self.telemetry.service_name)?;

        let logging = &self.telemetry.logging;
        if logging.enabled {
            hermes_telemetry::logging::create_env_filter(&logging.level)
                .map_err(|e| ConfigError::invalid_value("telemetry.logging.level", e.to_string()))?;
        }

        let buckets = &self.telemetry.metrics.duration_buckets;
        if buckets.is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.duration_buckets",
                "must contain at least one bucket",
            ));
        }
        if buckets.iter().any(|bucket| !bucket.is_finite()) {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.duration_buckets",
                "buckets must be finite numbers",
            ));
        }
        if buckets.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.duration_buckets",
                "must be strictly increasing",
            ));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs with locations and span events.
    ///
    /// # Example
    ///
    /// ```
    /// use hermes_config::HermesConfig;
    ///
    /// let config = HermesConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.include_location = true;
        config.telemetry.logging.span_events = true;
        config.telemetry.environment = "development".to_string();

        config
    }

    /// Production preset: JSON logs at info level.
    ///
    /// # Example
    ///
    /// ```
    /// use hermes_config::{HermesConfig, LogFormat};
    ///
    /// let config = HermesConfig::production();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.include_location = false;
        config.telemetry.environment = "production".to_string();

        config
    }

    /// Converts the telemetry section into the settings consumed by
    /// [`hermes_telemetry::init_telemetry`].
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        let section = &self.telemetry;
        let logging = LogConfig {
            enabled: section.logging.enabled,
            level: section.logging.level.clone(),
            json_format: section.logging.format == LogFormat::Json,
            span_events: section.logging.span_events,
            file_line_info: section.logging.include_location,
            ..LogConfig::default()
        };
        let metrics = hermes_telemetry::MetricsConfig {
            enabled: section.metrics.enabled,
            duration_buckets: section.metrics.duration_buckets.clone(),
            ..hermes_telemetry::MetricsConfig::default()
        };

        TelemetryConfig::builder()
            .service_name(&section.service_name)
            .environment(&section.environment)
            .logging(logging)
            .metrics(metrics)
            .build()
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid_value(field, "must not be empty"));
    }
    Ok(())
}

/// Builder for [`HermesConfig`].
#[derive(Debug, Default)]
pub struct HermesConfigBuilder {
    function: Option<FunctionConfig>,
    telemetry: Option<TelemetryConfigSection>,
}

impl HermesConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the function configuration.
    #[must_use]
    pub fn function(mut self, function: FunctionConfig) -> Self {
        self.function = Some(function);
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> HermesConfig {
        HermesConfig {
            function: self.function.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<HermesConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
