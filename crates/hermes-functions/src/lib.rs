//! Reference functions for the Hermes invocation runtime.
//!
//! - [`ReverseFunction`] - `String -> String`, reverses its input
//! - [`DebugLogsFunction`] - `FunctionInput -> FunctionOutput`, writes on both
//!   logging channels and returns no accounts
//!
//! Both are plain [`Function`](hermes_core::Function) implementations; wrap
//! them in [`JsonFunction`](hermes_core::JsonFunction) to dispatch JSON.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod debug_logs;
mod reverse;

pub use debug_logs::{Account, DebugLogsFunction, FunctionInput, FunctionOutput};
pub use reverse::ReverseFunction;
