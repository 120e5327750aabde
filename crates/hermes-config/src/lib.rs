//! Typed configuration for Hermes function hosts.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! Configuration is read once at startup. There is no reload: the ambient log
//! sink and telemetry it drives are installed once per process.
//!
//! # Example
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hermes_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("hermes.toml")?
//!     .with_env_prefix("HERMES")
//!     .load()?;
//!
//! println!("Serving {}", config.function.name);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [function]
//! name = "reverse"
//! event_source = "urn:hermes:local"
//! event_type = "com.hermes.function.invoke"
//!
//! [telemetry]
//! service_name = "reverse-fn"
//! environment = "production"
//!
//! [telemetry.metrics]
//! enabled = true
//! duration_buckets = [0.001, 0.01, 0.1, 1.0]
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables of the form `PREFIX__SECTION__KEY`:
//!
//! - `HERMES__FUNCTION__NAME=reverse`
//! - `HERMES__TELEMETRY__LOGGING__LEVEL=debug`
//! - `HERMES__TELEMETRY__METRICS__DURATION_BUCKETS=0.01,0.1,1`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{HermesConfig, HermesConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{FunctionConfig, LogFormat, LoggingConfig, MetricsConfig, TelemetryConfigSection};
