//! Instrumented dispatch.
//!
//! [`Instrumented`] wraps any [`ErasedFunction`] with a tracing span,
//! start/finish log events and the standard invocation metrics.

use crate::metrics::{record_dropped_log_records, record_invocation, InFlightGuard, Outcome};
use hermes_core::{Context, ErasedFunction, EventMetadata, InvocationFailure};
use std::time::Instant;

/// An [`ErasedFunction`] that reports what happens to each invocation.
///
/// # Example
///
/// ```rust,ignore
/// use hermes_core::JsonFunction;
/// use hermes_telemetry::Instrumented;
///
/// let function = Instrumented::new("reverse", JsonFunction::new(ReverseFunction));
/// let output = function.invoke_raw(metadata, b"\"hello\"", &context)?;
/// ```
pub struct Instrumented<F> {
    name: String,
    inner: F,
}

impl<F: ErasedFunction> Instrumented<F> {
    /// Wraps `inner`, labelling its telemetry with `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, inner: F) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Returns the function name used in labels.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wrapped function.
    #[must_use]
    pub const fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: ErasedFunction> ErasedFunction for Instrumented<F> {
    fn invoke_raw(
        &self,
        metadata: EventMetadata,
        payload: &[u8],
        context: &Context,
    ) -> Result<Vec<u8>, InvocationFailure> {
        let invocation_id = metadata.id();
        let span = tracing::info_span!(
            "invocation",
            function = %self.name,
            invocation_id = %invocation_id,
        );
        let _entered = span.enter();

        crate::log_invocation_start!(invocation_id, self.name, metadata.event_type());

        let dropped_before = context.logger().dropped_records();
        let started = Instant::now();
        let result = {
            let _in_flight = InFlightGuard::new();
            self.inner.invoke_raw(metadata, payload, context)
        };
        let elapsed = started.elapsed();

        let outcome = Outcome::of(&result);
        record_invocation(&self.name, outcome, elapsed);

        let dropped = context
            .logger()
            .dropped_records()
            .saturating_sub(dropped_before);
        if dropped > 0 {
            record_dropped_log_records(&self.name, dropped);
        }

        match &result {
            Ok(_) => {
                let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                crate::log_invocation_complete!(invocation_id, duration_ms);
            }
            Err(failure) => {
                crate::log_invocation_error!(invocation_id, outcome, failure);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::logging::{LogRecord, LogSink, LoggingSinkError};
    use hermes_core::{ExecutionError, FailureKind, FnFunction, InvocationEvent, JsonFunction};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::Arc;

    struct RejectingSink;

    impl LogSink for RejectingSink {
        fn record(&self, _record: LogRecord) -> Result<(), LoggingSinkError> {
            Err(LoggingSinkError::Unavailable("down".to_string()))
        }
    }

    fn echo() -> impl ErasedFunction {
        JsonFunction::new(FnFunction::new(
            |event: InvocationEvent<String>, ctx: &Context| -> Result<String, ExecutionError> {
                ctx.logger().info("echoing");
                Ok(event.into_data())
            },
        ))
    }

    #[test]
    fn test_result_passes_through() {
        let function = Instrumented::new("echo", echo());
        let metadata = EventMetadata::new();
        let ctx = Context::builder(metadata.id())
            .sink(Arc::new(hermes_core::logging::NullSink))
            .build();

        let out = function.invoke_raw(metadata, br#""abc""#, &ctx).unwrap();
        assert_eq!(out, br#""abc""#);
        assert_eq!(function.name(), "echo");
    }

    #[test]
    fn test_failure_passes_through() {
        let function = Instrumented::new("echo", echo());
        let metadata = EventMetadata::new();
        let ctx = Context::builder(metadata.id())
            .sink(Arc::new(hermes_core::logging::NullSink))
            .build();

        let failure = function.invoke_raw(metadata, b"not json", &ctx).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Serialization);
    }

    #[test]
    fn test_metrics_are_recorded() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let function = Instrumented::new("echo", echo());

        metrics::with_local_recorder(&recorder, || {
            let metadata = EventMetadata::new();
            let ctx = Context::builder(metadata.id())
                .sink(Arc::new(RejectingSink))
                .build();
            function
                .invoke_raw(metadata, br#""x""#, &ctx)
                .expect("a rejecting sink must not fail the invocation");
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"function="echo""#));
        assert!(rendered.contains(r#"outcome="success""#));
        assert!(rendered.contains(crate::metrics::LOG_RECORDS_DROPPED_TOTAL));
    }
}
