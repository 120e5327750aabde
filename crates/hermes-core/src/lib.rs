//! # Hermes Core
//!
//! Core types and traits for the Hermes function invocation runtime.
//!
//! A host runtime calls user code through a single typed boundary. This crate
//! defines that boundary and the data it carries:
//!
//! - [`InvocationEvent`] - One unit of typed input plus per-call metadata
//! - [`EventId`] - UUID v7 invocation identifier
//! - [`Context`] - Per-call logger and caller identifiers
//! - [`Function`] - The contract user logic implements
//! - [`Logger`] / [`LogSink`] - Leveled and raw logging facade
//! - [`ExecutionError`] / [`InvocationFailure`] - Failure taxonomy
//! - [`ErasedFunction`] / [`JsonFunction`] - JSON dispatch for hosts
//!
//! # Example
//!
//! ```
//! use hermes_core::{Context, ExecutionError, Function, InvocationEvent};
//!
//! struct Upper;
//!
//! impl Function<String, String> for Upper {
//!     fn apply(
//!         &self,
//!         event: InvocationEvent<String>,
//!         context: &Context,
//!     ) -> Result<String, ExecutionError> {
//!         context.logger().info("uppercasing");
//!         Ok(event.data().to_uppercase())
//!     }
//! }
//!
//! let event = InvocationEvent::new("hi".to_string());
//! let context = Context::mock();
//! assert_eq!(Upper.apply(event, &context).unwrap(), "HI");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
pub mod dispatch;
mod error;
mod event;
mod function;
pub mod logging;

pub use context::{Context, ContextBuilder, Organization};
pub use dispatch::{invoke_json, ErasedFunction, JsonFunction};
pub use error::{
    ExecutionError, ExecutionResult, FailureKind, InvocationFailure, SerializationError,
};
pub use event::{
    EventId, EventMetadata, InvocationEvent, InvocationEventBuilder, DEFAULT_EVENT_SOURCE,
    DEFAULT_EVENT_TYPE,
};
pub use function::{FnFunction, Function};
pub use logging::{Channel, Level, LogRecord, LogSink, Logger, LoggingSinkError};
