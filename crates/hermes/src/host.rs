//! In-process host.
//!
//! [`LocalHost`] does what a function runtime does for each call, minus the
//! network: it stamps event metadata from configuration, builds a fresh
//! [`Context`], dispatches the JSON payload and reports the result.

use chrono::Utc;
use hermes_config::{FunctionConfig, HermesConfig};
use hermes_core::{
    Context, ErasedFunction, EventMetadata, InvocationFailure, LogSink, Organization,
    SerializationError,
};
use hermes_telemetry::Instrumented;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Content type stamped on every event built by [`LocalHost`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Invokes functions in the current process using configured metadata.
///
/// # Example
///
/// ```
/// use hermes::{HermesConfig, JsonFunction, LocalHost};
/// use hermes::functions::ReverseFunction;
///
/// let host = LocalHost::new(&HermesConfig::default());
/// let function = JsonFunction::new(ReverseFunction);
///
/// let output = host.invoke(&function, br#""hello""#).unwrap();
/// assert_eq!(output, br#""olleh""#);
/// ```
pub struct LocalHost {
    function: FunctionConfig,
    sink: Option<Arc<dyn LogSink>>,
    organization: Option<Organization>,
}

impl LocalHost {
    /// Creates a host that logs to the ambient sink.
    #[must_use]
    pub fn new(config: &HermesConfig) -> Self {
        Self {
            function: config.function.clone(),
            sink: None,
            organization: None,
        }
    }

    /// Routes every invocation's logs to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Attaches an organization to every context.
    #[must_use]
    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organization = Some(organization);
        self
    }

    /// Returns the configured function name.
    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function.name
    }

    /// Builds metadata for a new event: a fresh id, the configured source and
    /// type, the current time and a JSON content type.
    #[must_use]
    pub fn event_metadata(&self) -> EventMetadata {
        EventMetadata::new()
            .with_source(self.function.event_source.clone())
            .with_event_type(self.function.event_type.clone())
            .with_time(Utc::now())
            .with_data_content_type(JSON_CONTENT_TYPE)
    }

    /// Wraps `function` so its invocations are traced and measured under the
    /// configured function name.
    pub fn instrument<F: ErasedFunction>(&self, function: F) -> Instrumented<F> {
        Instrumented::new(self.function.name.clone(), function)
    }

    /// Dispatches `payload` to `function` with fresh metadata and context.
    ///
    /// # Errors
    ///
    /// Returns the function's [`InvocationFailure`] unchanged.
    pub fn invoke(
        &self,
        function: &dyn ErasedFunction,
        payload: &[u8],
    ) -> Result<Vec<u8>, InvocationFailure> {
        let metadata = self.event_metadata();
        let context = self.context_for(&metadata);

        tracing::debug!(
            invocation_id = %metadata.id(),
            function = %self.function.name,
            payload_bytes = payload.len(),
            "dispatching invocation"
        );

        function.invoke_raw(metadata, payload, &context)
    }

    /// Serializes `input`, dispatches it, and decodes the output as `Out`.
    ///
    /// # Errors
    ///
    /// Returns `REQUEST_ENCODE_ERROR` if `input` cannot be encoded,
    /// `RESPONSE_DECODE_ERROR` if the output cannot be decoded as `Out`,
    /// otherwise the function's failure unchanged.
    pub fn invoke_value<In, Out>(
        &self,
        function: &dyn ErasedFunction,
        input: &In,
    ) -> Result<Out, InvocationFailure>
    where
        In: Serialize + ?Sized,
        Out: DeserializeOwned,
    {
        let metadata = self.event_metadata();
        let invocation_id = metadata.id();
        let payload = serde_json::to_vec(input)
            .map_err(|e| SerializationError::RequestEncode(e).to_failure(invocation_id))?;

        let context = self.context_for(&metadata);
        let output = function.invoke_raw(metadata, &payload, &context)?;

        serde_json::from_slice(&output)
            .map_err(|e| SerializationError::ResponseDecode(e).to_failure(invocation_id))
    }

    fn context_for(&self, metadata: &EventMetadata) -> Context {
        let mut builder = Context::builder(metadata.id());
        if let Some(sink) = &self.sink {
            builder = builder.sink(Arc::clone(sink));
        }
        if let Some(organization) = &self.organization {
            builder = builder.organization(organization.clone());
        }
        builder.build()
    }
}

impl std::fmt::Debug for LocalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalHost")
            .field("function", &self.function)
            .field("organization", &self.organization)
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}
