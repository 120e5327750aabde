//! Error types for Hermes.
//!
//! Three failure kinds exist at the invocation boundary:
//!
//! | Error | Raised by | Reaches the host as |
//! |---|---|---|
//! | [`ExecutionError`] | the function body | [`FailureKind::Execution`] |
//! | [`SerializationError`] | payload or output (de)coding | [`FailureKind::Serialization`] |
//! | [`LoggingSinkError`](crate::LoggingSinkError) | the log transport | never (absorbed) |
//!
//! Hosts receive every failure as an [`InvocationFailure`]: a serializable
//! kind, code and message.

use crate::event::EventId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using [`ExecutionError`].
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Failure raised by a function body during `apply`.
///
/// Function code that works with arbitrary error types can use `?` on
/// `anyhow::Error`, which converts into [`ExecutionError::Failed`].
///
/// # Example
///
/// ```
/// use hermes_core::ExecutionError;
///
/// fn parse_quantity(raw: &str) -> Result<u32, ExecutionError> {
///     raw.parse()
///         .map_err(|_| ExecutionError::invalid_input(format!("not a quantity: {raw}")))
/// }
///
/// assert!(parse_quantity("12").is_ok());
/// assert!(parse_quantity("twelve").is_err());
/// ```
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The payload decoded fine but is not acceptable to the function.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable error message.
        message: String,
    },

    /// The function body hit an unhandled condition.
    #[error("Function failed: {message}")]
    Failed {
        /// Human-readable error message.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The function body panicked.
    #[error("Function panicked: {message}")]
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl ExecutionError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a failure without an underlying cause.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a failure wrapping an underlying error.
    pub fn failed_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a panic failure.
    #[must_use]
    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked {
            message: message.into(),
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Failed { .. } => "FUNCTION_ERROR",
            Self::Panicked { .. } => "FUNCTION_PANICKED",
        }
    }

    /// Converts this error into the host-facing failure description.
    #[must_use]
    pub fn to_failure(&self, invocation_id: EventId) -> InvocationFailure {
        InvocationFailure {
            kind: FailureKind::Execution,
            code: self.code().to_string(),
            message: self.to_string(),
            invocation_id: Some(invocation_id),
        }
    }
}

impl From<anyhow::Error> for ExecutionError {
    fn from(error: anyhow::Error) -> Self {
        Self::Failed {
            message: format!("{error:#}"),
            source: Some(error),
        }
    }
}

/// Failure to decode a payload or encode an output.
///
/// `Decode` and `Encode` happen on the function side of the boundary.
/// `RequestEncode` and `ResponseDecode` are raised by a host converting its
/// own typed values to and from the payload bytes.
#[derive(Error, Debug)]
pub enum SerializationError {
    /// The inbound payload does not match the function's input type.
    #[error("Failed to decode function input: {0}")]
    Decode(#[source] serde_json::Error),

    /// The function's output could not be encoded.
    #[error("Failed to encode function output: {0}")]
    Encode(#[source] serde_json::Error),

    /// The host could not encode its request value as a payload.
    #[error("Failed to encode request payload: {0}")]
    RequestEncode(#[source] serde_json::Error),

    /// The function's output does not match the type the host asked for.
    #[error("Failed to decode function response: {0}")]
    ResponseDecode(#[source] serde_json::Error),
}

impl SerializationError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "INPUT_DECODE_ERROR",
            Self::Encode(_) => "OUTPUT_ENCODE_ERROR",
            Self::RequestEncode(_) => "REQUEST_ENCODE_ERROR",
            Self::ResponseDecode(_) => "RESPONSE_DECODE_ERROR",
        }
    }

    /// Converts this error into the host-facing failure description.
    #[must_use]
    pub fn to_failure(&self, invocation_id: EventId) -> InvocationFailure {
        InvocationFailure {
            kind: FailureKind::Serialization,
            code: self.code().to_string(),
            message: self.to_string(),
            invocation_id: Some(invocation_id),
        }
    }
}

/// Which side of the boundary a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The function body failed.
    Execution,
    /// Decoding the input or encoding the output failed.
    Serialization,
}

impl FailureKind {
    /// Returns the `snake_case` name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Execution => "execution",
            Self::Serialization => "serialization",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured description of a failed invocation, as reported to the host.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind} failure [{code}]: {message}")]
pub struct InvocationFailure {
    /// Where the failure came from.
    pub kind: FailureKind,
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// The failed invocation, for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<EventId>,
}

impl From<ExecutionError> for InvocationFailure {
    fn from(error: ExecutionError) -> Self {
        Self {
            kind: FailureKind::Execution,
            code: error.code().to_string(),
            message: error.to_string(),
            invocation_id: None,
        }
    }
}

impl From<SerializationError> for InvocationFailure {
    fn from(error: SerializationError) -> Self {
        Self {
            kind: FailureKind::Serialization,
            code: error.code().to_string(),
            message: error.to_string(),
            invocation_id: None,
        }
    }
}
