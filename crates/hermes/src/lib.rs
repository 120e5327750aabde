//! # Hermes
//!
//! **A typed function invocation contract with an explicit logging facade.**
//!
//! User logic implements [`Function`]: one `apply` taking a decoded
//! [`InvocationEvent`] and a borrowed [`Context`], returning an owned output
//! or an [`ExecutionError`]. Everything the function logs goes through the
//! context's logger, on a leveled channel or a raw one.
//!
//! - [`core`] - the contract, events, context, logging facade, JSON dispatch
//! - [`telemetry`] - `tracing` subscriber, Prometheus metrics, instrumentation
//! - [`config`] - typed, layered configuration
//! - [`functions`] - reference functions
//! - [`LocalHost`] - in-process dispatch driven by configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hermes::prelude::*;
//! use hermes::functions::ReverseFunction;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("hermes.toml")?
//!         .with_env_prefix("HERMES")
//!         .load()?;
//!     hermes::init(&config)?;
//!
//!     let host = LocalHost::new(&config);
//!     let function = host.instrument(JsonFunction::new(ReverseFunction));
//!     let output = host.invoke(&function, br#""hello""#)?;
//!     assert_eq!(output, br#""olleh""#);
//!     Ok(())
//! }
//! ```
//!
//! ## Invocation Flow
//!
//! ```text
//! payload → EventMetadata + decode → apply(event, &context) → encode → bytes
//!                                          │
//!                                          └→ Logger → LogSink (leveled | raw)
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod host;
mod init;

pub use host::{LocalHost, JSON_CONTENT_TYPE};
pub use init::{init, init_with_sink, InitError};

// Re-export member crates
pub use hermes_config as config;
pub use hermes_core as core;
pub use hermes_functions as functions;
pub use hermes_telemetry as telemetry;

pub use hermes_config::{ConfigError, ConfigLoader, HermesConfig};
pub use hermes_core::{
    Context, ErasedFunction, EventId, EventMetadata, ExecutionError, FailureKind, FnFunction,
    Function, InvocationEvent, InvocationFailure, JsonFunction, Level, LogSink, Logger,
    LoggingSinkError, Organization, SerializationError,
};
pub use hermes_telemetry::{Instrumented, TelemetryError};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use crate::LocalHost;

    pub use hermes_core::{
        Context, ErasedFunction, EventId, EventMetadata, ExecutionError, FnFunction, Function,
        InvocationEvent, InvocationFailure, JsonFunction, Level, Organization,
    };

    pub use hermes_config::{ConfigLoader, HermesConfig};

    pub use hermes_telemetry::Instrumented;
}
