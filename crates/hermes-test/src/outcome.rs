//! Result of one test invocation.

use crate::error::TestError;
use hermes_core::{EventId, ExecutionError, Level, LogRecord};
use serde::de::DeserializeOwned;
use std::fmt;

/// What one invocation produced: its result and the records it logged.
///
/// `E` is [`ExecutionError`] for typed calls and
/// [`InvocationFailure`](hermes_core::InvocationFailure) for JSON calls.
#[must_use]
pub struct TestOutcome<T, E = ExecutionError> {
    invocation_id: EventId,
    result: Result<T, E>,
    records: Vec<LogRecord>,
}

impl<T, E: fmt::Display> TestOutcome<T, E> {
    pub(crate) fn new(
        invocation_id: EventId,
        result: Result<T, E>,
        records: Vec<LogRecord>,
    ) -> Self {
        Self {
            invocation_id,
            result,
            records,
        }
    }

    /// Returns the id the invocation ran under.
    pub const fn invocation_id(&self) -> EventId {
        self.invocation_id
    }

    /// Returns the raw result.
    pub const fn result(&self) -> &Result<T, E> {
        &self.result
    }

    /// Consumes the outcome, returning the raw result.
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }

    /// Returns `true` if the function produced an output.
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the output, if any.
    pub fn output(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// Returns the error, if any.
    pub fn error(&self) -> Option<&E> {
        self.result.as_ref().err()
    }

    /// Consumes the outcome, returning the output.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Failed` if the invocation failed.
    pub fn into_output(self) -> Result<T, TestError> {
        self.result.map_err(|e| TestError::Failed(e.to_string()))
    }

    /// Returns the records this invocation logged, in order.
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Returns the messages logged at exactly `level`.
    pub fn leveled(&self, level: Level) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| record.level() == Some(level))
            .map(|record| record.message.as_str())
            .collect()
    }

    /// Returns the text of every raw write.
    pub fn raw(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| record.is_raw())
            .map(|record| record.message.as_str())
            .collect()
    }

    /// Returns every message regardless of channel.
    pub fn messages(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.message.as_str())
            .collect()
    }

    // Assertion methods

    /// Asserts that the invocation succeeded.
    ///
    /// # Panics
    ///
    /// Panics with the error message if the invocation failed.
    pub fn assert_success(&self) -> &Self {
        if let Err(e) = &self.result {
            panic!("Expected success, got error: {e}");
        }
        self
    }

    /// Asserts that the invocation failed.
    ///
    /// # Panics
    ///
    /// Panics if the invocation produced an output.
    pub fn assert_failure(&self) -> &Self {
        assert!(self.result.is_err(), "Expected failure, got an output");
        self
    }

    /// Asserts that the invocation failed with a message containing `needle`.
    ///
    /// # Panics
    ///
    /// Panics if the invocation succeeded or the message does not match.
    pub fn assert_error_contains(&self, needle: &str) -> &Self {
        match &self.result {
            Ok(_) => panic!("Expected error containing '{needle}', got an output"),
            Err(e) => {
                let message = e.to_string();
                assert!(
                    message.contains(needle),
                    "Expected error containing '{needle}', got '{message}'"
                );
            }
        }
        self
    }

    /// Asserts that `message` was logged at `level`.
    ///
    /// # Panics
    ///
    /// Panics if no matching record exists.
    pub fn assert_logged(&self, level: Level, message: &str) -> &Self {
        assert!(
            self.leveled(level).contains(&message),
            "Expected {level} record '{message}', got {:?}",
            self.messages()
        );
        self
    }

    /// Asserts that `text` was written on the raw channel.
    ///
    /// # Panics
    ///
    /// Panics if no matching raw record exists.
    pub fn assert_raw(&self, text: &str) -> &Self {
        assert!(
            self.raw().contains(&text),
            "Expected raw write '{text}', got {:?}",
            self.raw()
        );
        self
    }

    /// Asserts the exact sequence of messages across both channels.
    ///
    /// # Panics
    ///
    /// Panics if the sequence differs.
    pub fn assert_messages(&self, expected: &[&str]) -> &Self {
        assert_eq!(self.messages(), expected, "Logged messages differ");
        self
    }
}

impl<T: PartialEq + fmt::Debug, E: fmt::Display> TestOutcome<T, E> {
    /// Asserts that the output equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the invocation failed or the output differs.
    pub fn assert_output(&self, expected: &T) -> &Self {
        match &self.result {
            Ok(output) => assert_eq!(output, expected, "Output differs"),
            Err(e) => panic!("Expected output {expected:?}, got error: {e}"),
        }
        self
    }
}

impl<E: fmt::Display> TestOutcome<Vec<u8>, E> {
    /// Decodes a JSON output.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Failed` if the invocation failed, or
    /// `TestError::Json` if the bytes are not a valid `D`.
    pub fn json<D: DeserializeOwned>(&self) -> Result<D, TestError> {
        match &self.result {
            Ok(bytes) => Ok(serde_json::from_slice(bytes)?),
            Err(e) => Err(TestError::Failed(e.to_string())),
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for TestOutcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestOutcome")
            .field("invocation_id", &self.invocation_id)
            .field("result", &self.result)
            .field("records", &self.records.len())
            .finish()
    }
}
