//! # Hermes Test
//!
//! Test utilities for Hermes functions: invoke a function in-process, capture
//! everything it logs, and assert on the result.
//!
//! ## Key Features
//!
//! - **No host**: events and contexts are built per call
//! - **Captured logs**: leveled and raw records land in a [`CaptureSink`]
//! - **Failure injection**: a failing sink proves logging never changes output
//! - **JSON dispatch**: [`TestClient::invoke_json`] goes through the same
//!   decode/apply/encode path a host uses
//!
//! ## Example
//!
//! ```
//! use hermes_core::{Context, ExecutionError, FnFunction, InvocationEvent, Level};
//! use hermes_test::TestClient;
//!
//! let client = TestClient::new(FnFunction::new(
//!     |event: InvocationEvent<String>, ctx: &Context| -> Result<String, ExecutionError> {
//!         ctx.logger().write_raw("starting");
//!         ctx.logger().debug("uppercasing");
//!         Ok(event.into_data().to_uppercase())
//!     },
//! ));
//!
//! let outcome = client.invoke("abc".to_string());
//! outcome
//!     .assert_output(&"ABC".to_string())
//!     .assert_raw("starting")
//!     .assert_logged(Level::Debug, "uppercasing");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod outcome;
mod sink;

pub use client::TestClient;
pub use error::TestError;
pub use outcome::TestOutcome;
pub use sink::CaptureSink;
