//! In-memory log sink.

use hermes_core::logging::{LogRecord, LogSink, LoggingSinkError};
use hermes_core::{EventId, Level};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A [`LogSink`] that keeps every record in memory, in arrival order.
///
/// Clones share the same buffer, so a test can hand one clone to a
/// [`Context`](hermes_core::Context) and inspect another.
///
/// # Example
///
/// ```
/// use hermes_core::{Context, EventId, Level};
/// use hermes_test::CaptureSink;
/// use std::sync::Arc;
///
/// let sink = CaptureSink::new();
/// let context = Context::builder(EventId::new())
///     .sink(Arc::new(sink.clone()))
///     .build();
///
/// context.logger().info("hello");
/// assert_eq!(sink.leveled(Level::Info), vec!["hello"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Mutex<Vec<LogRecord>>,
    failing: AtomicBool,
}

impl CaptureSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that rejects every record with
    /// [`LoggingSinkError::Unavailable`].
    #[must_use]
    pub fn failing() -> Self {
        let sink = Self::new();
        sink.set_failing(true);
        sink
    }

    /// Turns failure injection on or off. Rejected records are not stored.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a copy of every stored record.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.inner.records.lock().clone()
    }

    /// Returns the records issued by one invocation.
    #[must_use]
    pub fn records_for(&self, invocation_id: EventId) -> Vec<LogRecord> {
        self.inner
            .records
            .lock()
            .iter()
            .filter(|record| record.invocation_id == invocation_id)
            .cloned()
            .collect()
    }

    /// Returns the messages logged at exactly `level`.
    #[must_use]
    pub fn leveled(&self, level: Level) -> Vec<String> {
        self.messages_where(|record| record.level() == Some(level))
    }

    /// Returns the text of every raw write.
    #[must_use]
    pub fn raw(&self) -> Vec<String> {
        self.messages_where(LogRecord::is_raw)
    }

    /// Returns every message regardless of channel.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages_where(|_| true)
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.records.lock().len()
    }

    /// Returns `true` if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards every stored record.
    pub fn clear(&self) {
        self.inner.records.lock().clear();
    }

    fn messages_where(&self, keep: impl Fn(&LogRecord) -> bool) -> Vec<String> {
        self.inner
            .records
            .lock()
            .iter()
            .filter(|record| keep(record))
            .map(|record| record.message.clone())
            .collect()
    }
}

impl LogSink for CaptureSink {
    fn record(&self, record: LogRecord) -> Result<(), LoggingSinkError> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(LoggingSinkError::Unavailable(
                "capture sink is failing".to_string(),
            ));
        }
        self.inner.records.lock().push(record);
        Ok(())
    }
}
