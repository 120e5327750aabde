//! JSON dispatch for hosts.
//!
//! Hosts receive encoded payloads and must hand back encoded results.
//! [`ErasedFunction`] is the byte-level view of a [`Function`] that lets a
//! host keep functions of different input/output types behind one object
//! type. [`JsonFunction`] provides it for any typed function using JSON.
//!
//! Panics raised by a function body are caught here and reported as
//! [`ExecutionError::Panicked`].

use crate::error::{ExecutionError, InvocationFailure, SerializationError};
use crate::event::EventMetadata;
use crate::{Context, Function};
use serde::{de::DeserializeOwned, Serialize};
use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

/// A function invoked with encoded bytes.
///
/// This trait is object safe, so hosts can store `Box<dyn ErasedFunction>`.
pub trait ErasedFunction: Send + Sync + 'static {
    /// Decodes `payload`, runs the function, and encodes its output.
    ///
    /// # Errors
    ///
    /// Returns an [`InvocationFailure`] of kind
    /// [`Serialization`](crate::FailureKind::Serialization) if the payload or
    /// output cannot be converted, or of kind
    /// [`Execution`](crate::FailureKind::Execution) if the function fails.
    fn invoke_raw(
        &self,
        metadata: EventMetadata,
        payload: &[u8],
        context: &Context,
    ) -> Result<Vec<u8>, InvocationFailure>;
}

/// Adapts a typed [`Function`] to [`ErasedFunction`] using JSON.
///
/// # Example
///
/// ```
/// use hermes_core::{
///     Context, ErasedFunction, EventMetadata, FnFunction, InvocationEvent, JsonFunction,
/// };
///
/// let double = JsonFunction::new(FnFunction::new(|event: InvocationEvent<i64>, _ctx: &Context| {
///     Ok(event.into_data() * 2)
/// }));
///
/// let metadata = EventMetadata::new();
/// let ctx = Context::builder(metadata.id()).build();
/// let out = double.invoke_raw(metadata, b"21", &ctx).unwrap();
/// assert_eq!(out, b"42");
/// ```
pub struct JsonFunction<F, In, Out> {
    function: F,
    _phantom: PhantomData<fn(In) -> Out>,
}

impl<F, In, Out> JsonFunction<F, In, Out>
where
    F: Function<In, Out>,
    In: DeserializeOwned + Send + 'static,
    Out: Serialize + Send + 'static,
{
    /// Wraps a typed function.
    #[must_use]
    pub const fn new(function: F) -> Self {
        Self {
            function,
            _phantom: PhantomData,
        }
    }

    /// Returns the wrapped function.
    #[must_use]
    pub const fn inner(&self) -> &F {
        &self.function
    }
}

impl<F, In, Out> ErasedFunction for JsonFunction<F, In, Out>
where
    F: Function<In, Out>,
    In: DeserializeOwned + Send + 'static,
    Out: Serialize + Send + 'static,
{
    fn invoke_raw(
        &self,
        metadata: EventMetadata,
        payload: &[u8],
        context: &Context,
    ) -> Result<Vec<u8>, InvocationFailure> {
        invoke_json(&self.function, metadata, payload, context)
    }
}

/// Runs a typed function against a JSON payload.
///
/// This is the body of [`JsonFunction::invoke_raw`], exposed for callers that
/// only hold a reference to the function.
pub fn invoke_json<F, In, Out>(
    function: &F,
    metadata: EventMetadata,
    payload: &[u8],
    context: &Context,
) -> Result<Vec<u8>, InvocationFailure>
where
    F: Function<In, Out>,
    In: DeserializeOwned + Send + 'static,
    Out: Serialize + Send + 'static,
{
    let invocation_id = metadata.id();

    let data: In = serde_json::from_slice(payload).map_err(|e| {
        tracing::debug!(invocation_id = %invocation_id, error = %e, "payload decode failed");
        SerializationError::Decode(e).to_failure(invocation_id)
    })?;

    let event = metadata.with_data(data);
    let output = panic::catch_unwind(AssertUnwindSafe(|| function.apply(event, context)))
        .unwrap_or_else(|payload| Err(ExecutionError::panicked(panic_message(&*payload))))
        .map_err(|e| {
            tracing::debug!(invocation_id = %invocation_id, error = %e, "function failed");
            e.to_failure(invocation_id)
        })?;

    serde_json::to_vec(&output)
        .map_err(|e| SerializationError::Encode(e).to_failure(invocation_id))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "function panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, FnFunction, InvocationEvent};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Input {
        n: u32,
    }

    #[derive(Debug, Serialize)]
    struct Output {
        squared: u32,
    }

    fn square() -> JsonFunction<impl Function<Input, Output>, Input, Output> {
        JsonFunction::new(FnFunction::new(|event: InvocationEvent<Input>, _ctx: &Context| {
            let n = event.data().n;
            Ok(Output { squared: n * n })
        }))
    }

    fn invoke(function: &dyn ErasedFunction, payload: &[u8]) -> Result<Vec<u8>, InvocationFailure> {
        let metadata = EventMetadata::new();
        let ctx = Context::builder(metadata.id())
            .sink(std::sync::Arc::new(crate::logging::NullSink))
            .build();
        function.invoke_raw(metadata, payload, &ctx)
    }

    #[test]
    fn test_round_trip() {
        let out = invoke(&square(), br#"{"n": 7}"#).expect("invocation should succeed");
        assert_eq!(out, br#"{"squared":49}"#);
    }

    #[test]
    fn test_decode_failure_is_serialization_kind() {
        let failure = invoke(&square(), b"{\"n\": \"seven\"}").unwrap_err();
        assert_eq!(failure.kind, FailureKind::Serialization);
        assert_eq!(failure.code, "INPUT_DECODE_ERROR");
        assert!(failure.invocation_id.is_some());
    }

    #[test]
    fn test_execution_failure_is_execution_kind() {
        let failing = JsonFunction::new(FnFunction::new(
            |_event: InvocationEvent<String>, _ctx: &Context| {
                Err::<String, _>(ExecutionError::invalid_input("nope"))
            },
        ));

        let failure = invoke(&failing, br#""x""#).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Execution);
        assert_eq!(failure.code, "INVALID_INPUT");
    }

    #[test]
    fn test_panic_is_caught() {
        let panicking = JsonFunction::new(FnFunction::new(
            |_event: InvocationEvent<String>, _ctx: &Context| -> Result<String, ExecutionError> {
                panic!("unhandled condition mid-execution")
            },
        ));

        let failure = invoke(&panicking, br#""x""#).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Execution);
        assert_eq!(failure.code, "FUNCTION_PANICKED");
        assert!(failure.message.contains("unhandled condition mid-execution"));
    }

    #[test]
    fn test_erased_functions_share_a_collection() {
        let functions: Vec<Box<dyn ErasedFunction>> = vec![
            Box::new(square()),
            Box::new(JsonFunction::new(FnFunction::new(
                |event: InvocationEvent<String>, _ctx: &Context| -> Result<usize, ExecutionError> {
                    Ok(event.into_data().len())
                },
            ))),
        ];

        assert_eq!(invoke(functions[0].as_ref(), br#"{"n":3}"#).unwrap(), b"{\"squared\":9}");
        assert_eq!(invoke(functions[1].as_ref(), br#""abcd""#).unwrap(), b"4");
    }
}
