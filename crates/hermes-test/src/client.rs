//! Test client for in-process function invocation.

use crate::error::TestError;
use crate::outcome::TestOutcome;
use crate::sink::CaptureSink;
use hermes_core::{
    invoke_json, Context, EventId, EventMetadata, Function, InvocationEvent, InvocationFailure,
    Organization,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// A test client that invokes a function without a host.
///
/// Every call gets a fresh event id and a fresh [`Context`] whose logger
/// writes into the client's [`CaptureSink`]. The returned [`TestOutcome`]
/// carries only the records of that call.
///
/// # Example
///
/// ```
/// use hermes_core::{Context, ExecutionError, FnFunction, InvocationEvent, Level};
/// use hermes_test::TestClient;
///
/// let client = TestClient::new(FnFunction::new(
///     |event: InvocationEvent<String>, ctx: &Context| -> Result<usize, ExecutionError> {
///         ctx.logger().info("counting");
///         Ok(event.data().len())
///     },
/// ));
///
/// client
///     .invoke("four".to_string())
///     .assert_output(&4)
///     .assert_logged(Level::Info, "counting");
/// ```
#[must_use]
pub struct TestClient<F, In, Out> {
    function: F,
    sink: CaptureSink,
    organization: Option<Organization>,
    event_type: Option<String>,
    source: Option<String>,
    _types: PhantomData<fn(In) -> Out>,
}

impl<F, In, Out> TestClient<F, In, Out>
where
    F: Function<In, Out>,
    In: DeserializeOwned + Send + 'static,
    Out: Serialize + Send + 'static,
{
    /// Creates a client with an empty capture sink.
    pub fn new(function: F) -> Self {
        Self {
            function,
            sink: CaptureSink::new(),
            organization: None,
            event_type: None,
            source: None,
            _types: PhantomData,
        }
    }

    /// Uses `sink` instead of a fresh one, e.g. a failing sink.
    pub fn with_sink(mut self, sink: CaptureSink) -> Self {
        self.sink = sink;
        self
    }

    /// Attaches an organization to every context.
    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organization = Some(organization);
        self
    }

    /// Sets the `type` attribute of every event.
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Sets the `source` attribute of every event.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the sink shared by every call.
    #[must_use]
    pub const fn sink(&self) -> &CaptureSink {
        &self.sink
    }

    /// Returns the function under test.
    #[must_use]
    pub const fn function(&self) -> &F {
        &self.function
    }

    /// Invokes the function with `data` wrapped in a fresh event.
    pub fn invoke(&self, data: In) -> TestOutcome<Out> {
        self.invoke_event(self.metadata().with_data(data))
    }

    /// Invokes the function with a caller-built event.
    pub fn invoke_event(&self, event: InvocationEvent<In>) -> TestOutcome<Out> {
        let invocation_id = event.id();
        let context = self.context(invocation_id);
        let result = self.function.apply(event, &context);
        TestOutcome::new(invocation_id, result, self.sink.records_for(invocation_id))
    }

    /// Invokes the function through JSON dispatch, as a host would.
    ///
    /// Decode and encode failures surface as
    /// [`FailureKind::Serialization`](hermes_core::FailureKind::Serialization).
    pub fn invoke_json(&self, payload: &[u8]) -> TestOutcome<Vec<u8>, InvocationFailure> {
        let metadata = self.metadata();
        let invocation_id = metadata.id();
        let context = self.context(invocation_id);
        let result = invoke_json(&self.function, metadata, payload, &context);
        TestOutcome::new(invocation_id, result, self.sink.records_for(invocation_id))
    }

    /// Serializes `value` and invokes the function through JSON dispatch.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Json` if `value` cannot be serialized.
    pub fn invoke_value<V: Serialize>(
        &self,
        value: &V,
    ) -> Result<TestOutcome<Vec<u8>, InvocationFailure>, TestError> {
        let payload = serde_json::to_vec(value)?;
        Ok(self.invoke_json(&payload))
    }

    fn metadata(&self) -> EventMetadata {
        let mut metadata = EventMetadata::new();
        if let Some(event_type) = &self.event_type {
            metadata = metadata.with_event_type(event_type.clone());
        }
        if let Some(source) = &self.source {
            metadata = metadata.with_source(source.clone());
        }
        metadata.with_data_content_type("application/json")
    }

    fn context(&self, invocation_id: EventId) -> Context {
        let mut builder = Context::builder(invocation_id).sink(Arc::new(self.sink.clone()));
        if let Some(organization) = &self.organization {
            builder = builder.organization(organization.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::{ExecutionError, FailureKind, FnFunction, Level};

    type Echo = fn(InvocationEvent<String>, &Context) -> Result<String, ExecutionError>;

    fn echo(event: InvocationEvent<String>, ctx: &Context) -> Result<String, ExecutionError> {
        ctx.logger().info(format!("type={}", event.event_type()));
        if let Some(org) = ctx.organization() {
            ctx.logger().info(format!("org={}", org.id()));
        }
        Ok(event.into_data())
    }

    fn client() -> TestClient<FnFunction<Echo, String, String>, String, String> {
        TestClient::new(FnFunction::new(echo as Echo))
    }

    #[test]
    fn test_invoke_fresh_ids() {
        let client = client();
        let first = client.invoke("a".to_string());
        let second = client.invoke("b".to_string());

        assert_ne!(first.invocation_id(), second.invocation_id());
        assert_eq!(first.records().len(), 1);
        assert_eq!(second.records().len(), 1);
        assert_eq!(client.sink().len(), 2);
    }

    #[test]
    fn test_invoke_applies_settings() {
        let client = client()
            .with_event_type("com.example.echo")
            .with_source("urn:test")
            .with_organization(Organization::new("00Dxx0000001gPL"));

        client
            .invoke("x".to_string())
            .assert_output(&"x".to_string())
            .assert_messages(&["type=com.example.echo", "org=00Dxx0000001gPL"]);
    }

    #[test]
    fn test_invoke_event_keeps_id() {
        let client = client();
        let id = EventId::new();
        let event = InvocationEvent::builder("x".to_string()).id(id).build();

        let outcome = client.invoke_event(event);
        assert_eq!(outcome.invocation_id(), id);
        assert_eq!(outcome.records()[0].invocation_id, id);
    }

    #[test]
    fn test_invoke_json() {
        let client = client();
        let outcome = client.invoke_json(br#""hello""#);
        let output: String = outcome.json().unwrap();
        assert_eq!(output, "hello");
        outcome.assert_logged(Level::Info, &format!("type={}", hermes_core::DEFAULT_EVENT_TYPE));
    }

    #[test]
    fn test_invoke_json_decode_failure() {
        let outcome = client().invoke_json(b"42");
        let failure = outcome.error().unwrap();
        assert_eq!(failure.kind, FailureKind::Serialization);
        assert_eq!(failure.invocation_id, Some(outcome.invocation_id()));
        assert!(outcome.records().is_empty());
    }

    #[test]
    fn test_invoke_value() {
        let outcome = client().invoke_value(&"abc").unwrap();
        assert_eq!(outcome.json::<String>().unwrap(), "abc");
    }

    #[test]
    fn test_failing_sink_does_not_change_output() {
        let client = client().with_sink(CaptureSink::failing());
        client.invoke("same".to_string()).assert_output(&"same".to_string());
        assert!(client.sink().is_empty());
    }
}
