//! Logging facade for function bodies.
//!
//! Functions log through the [`Logger`] handed to them in the
//! [`Context`](crate::Context). The logger tags every record with the
//! invocation ID and forwards it to a [`LogSink`]. Two channels exist:
//!
//! - **Leveled**: `debug`, `info`, `warn`, `error` diagnostics
//! - **Raw**: unleveled text written straight to the process output
//!
//! The channels are independent and best-effort. Records issued on one
//! logger reach its sink in issue order; nothing is promised across channels
//! beyond what the sink itself provides.
//!
//! Logging never fails an invocation. When a sink rejects a record the logger
//! counts it (see [`Logger::dropped_records`]) and reports it through
//! `tracing` instead of returning an error.
//!
//! # Ambient sink
//!
//! Hosts that want one process-wide sink install it once at startup with
//! [`install_global_sink`]. The first call to [`global_sink`] freezes the
//! choice; there is no reconfiguration afterwards.

use crate::event::EventId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Severity of a leveled log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Verbose diagnostics.
    Debug,
    /// Normal operational messages.
    Info,
    /// Something unexpected that the function recovered from.
    Warn,
    /// A failure worth attention.
    Error,
}

impl Level {
    /// All levels, least severe first.
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    /// Returns the lowercase name of the level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Level`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// The channel a record was issued on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// A leveled diagnostic.
    Leveled(Level),
    /// Unleveled text written directly to the output stream.
    Raw,
}

/// One record handed to a [`LogSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// The invocation that issued the record.
    pub invocation_id: EventId,
    /// Leveled or raw.
    pub channel: Channel,
    /// The message text.
    pub message: String,
}

impl LogRecord {
    /// Returns the level, or `None` for raw writes.
    #[must_use]
    pub const fn level(&self) -> Option<Level> {
        match self.channel {
            Channel::Leveled(level) => Some(level),
            Channel::Raw => None,
        }
    }

    /// Returns `true` if the record came from [`Logger::write_raw`].
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self.channel, Channel::Raw)
    }
}

/// Failure of the underlying log transport.
///
/// Sinks return this from [`LogSink::record`]; the [`Logger`] absorbs it.
#[derive(Debug, Error)]
pub enum LoggingSinkError {
    /// Writing to the output stream failed.
    #[error("log sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink cannot accept records right now.
    #[error("log sink unavailable: {0}")]
    Unavailable(String),

    /// A process-wide sink was already installed or already in use.
    #[error("a global log sink is already installed")]
    AlreadyInstalled,
}

/// Destination for log records.
///
/// Implementations must be safe to call from many invocations at once and
/// must preserve the order of records received from a single thread.
pub trait LogSink: Send + Sync + 'static {
    /// Accepts one record.
    fn record(&self, record: LogRecord) -> Result<(), LoggingSinkError>;
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn record(&self, _record: LogRecord) -> Result<(), LoggingSinkError> {
        Ok(())
    }
}

/// The default sink.
///
/// Leveled records become `tracing` events under the `hermes::function`
/// target with an `invocation_id` field, so they flow through whatever
/// subscriber the process installed. Raw records go to stdout, one line each.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, record: LogRecord) -> Result<(), LoggingSinkError> {
        let LogRecord {
            invocation_id,
            channel,
            message,
        } = record;

        match channel {
            Channel::Leveled(Level::Debug) => {
                tracing::debug!(
                    target: "hermes::function",
                    invocation_id = %invocation_id,
                    "{message}"
                );
            }
            Channel::Leveled(Level::Info) => {
                tracing::info!(
                    target: "hermes::function",
                    invocation_id = %invocation_id,
                    "{message}"
                );
            }
            Channel::Leveled(Level::Warn) => {
                tracing::warn!(
                    target: "hermes::function",
                    invocation_id = %invocation_id,
                    "{message}"
                );
            }
            Channel::Leveled(Level::Error) => {
                tracing::error!(
                    target: "hermes::function",
                    invocation_id = %invocation_id,
                    "{message}"
                );
            }
            Channel::Raw => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{message}")?;
            }
        }

        Ok(())
    }
}

static GLOBAL_SINK: OnceLock<Arc<dyn LogSink>> = OnceLock::new();

/// Installs the process-wide sink.
///
/// Must be called at most once, before any invocation asks for the ambient
/// sink. Returns [`LoggingSinkError::AlreadyInstalled`] otherwise.
pub fn install_global_sink(sink: Arc<dyn LogSink>) -> Result<(), LoggingSinkError> {
    GLOBAL_SINK
        .set(sink)
        .map_err(|_| LoggingSinkError::AlreadyInstalled)
}

/// Returns the process-wide sink, freezing it to [`TracingSink`] if none was
/// installed yet.
pub fn global_sink() -> Arc<dyn LogSink> {
    Arc::clone(GLOBAL_SINK.get_or_init(|| Arc::new(TracingSink)))
}

/// Per-invocation logging handle.
///
/// Cloning is cheap; clones share the sink and the dropped-record counter.
#[derive(Clone)]
pub struct Logger {
    invocation_id: EventId,
    sink: Arc<dyn LogSink>,
    dropped: Arc<AtomicU64>,
}

impl Logger {
    /// Creates a logger that attributes records to `invocation_id`.
    #[must_use]
    pub fn new(invocation_id: EventId, sink: Arc<dyn LogSink>) -> Self {
        Self {
            invocation_id,
            sink,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a logger that discards everything.
    #[must_use]
    pub fn null(invocation_id: EventId) -> Self {
        Self::new(invocation_id, Arc::new(NullSink))
    }

    /// Returns the invocation this logger belongs to.
    #[must_use]
    pub const fn invocation_id(&self) -> EventId {
        self.invocation_id
    }

    /// Emits a leveled record.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.emit(Channel::Leveled(level), message.into());
    }

    /// Emits a debug record.
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    /// Emits an info record.
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    /// Emits a warn record.
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    /// Emits an error record.
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    /// Writes unleveled text to the raw channel.
    pub fn write_raw(&self, text: impl Into<String>) {
        self.emit(Channel::Raw, text.into());
    }

    /// Number of records the sink rejected so far.
    #[must_use]
    pub fn dropped_records(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn emit(&self, channel: Channel, message: String) {
        let record = LogRecord {
            invocation_id: self.invocation_id,
            channel,
            message,
        };

        if let Err(error) = self.sink.record(record) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                target: "hermes::logging",
                invocation_id = %self.invocation_id,
                error = %error,
                "log sink rejected record"
            );
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("invocation_id", &self.invocation_id)
            .field("dropped", &self.dropped_records())
            .finish_non_exhaustive()
    }
}
