//! The function contract.
//!
//! The [`Function`] trait is the single entry point a host calls.

use crate::{Context, ExecutionError, InvocationEvent};
use serde::{de::DeserializeOwned, Serialize};

/// A unit of user logic callable by a host runtime.
///
/// A host constructs the implementation once and may call `apply`
/// repeatedly, including from several threads at once, so implementations
/// must be `Send + Sync`. Any state kept outside the event and context is the
/// implementor's responsibility to synchronize.
///
/// # Type Parameters
///
/// - `In`: The decoded payload type (must implement `DeserializeOwned`)
/// - `Out`: The result type (must implement `Serialize`)
///
/// # Example
///
/// ```
/// use hermes_core::{Context, ExecutionError, Function, InvocationEvent};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize)]
/// struct Order {
///     quantity: u32,
///     unit_price_cents: u64,
/// }
///
/// #[derive(Serialize)]
/// struct Quote {
///     total_cents: u64,
/// }
///
/// struct QuoteFunction;
///
/// impl Function<Order, Quote> for QuoteFunction {
///     fn apply(
///         &self,
///         event: InvocationEvent<Order>,
///         ctx: &Context,
///     ) -> Result<Quote, ExecutionError> {
///         let order = event.into_data();
///         if order.quantity == 0 {
///             return Err(ExecutionError::invalid_input("quantity must be positive"));
///         }
///         ctx.logger().debug(format!("quoting {} units", order.quantity));
///         Ok(Quote {
///             total_cents: u64::from(order.quantity) * order.unit_price_cents,
///         })
///     }
/// }
/// ```
pub trait Function<In, Out>: Send + Sync + 'static
where
    In: DeserializeOwned + Send + 'static,
    Out: Serialize + Send + 'static,
{
    /// Runs the function for one invocation.
    ///
    /// # Arguments
    ///
    /// * `event` - The decoded payload and its metadata, owned by this call
    /// * `context` - Logger and identifiers, valid only for this call
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the function body cannot produce an
    /// output. No partial output is returned alongside an error.
    fn apply(&self, event: InvocationEvent<In>, context: &Context) -> Result<Out, ExecutionError>;
}

/// A closure-based function wrapper.
///
/// # Example
///
/// ```
/// use hermes_core::{Context, FnFunction, Function, InvocationEvent};
///
/// let shout = FnFunction::new(|event: InvocationEvent<String>, _ctx: &Context| {
///     Ok(format!("{}!", event.data()))
/// });
///
/// let out = shout.apply(InvocationEvent::new("hey".to_string()), &Context::mock());
/// assert_eq!(out.unwrap(), "hey!");
/// ```
pub struct FnFunction<F, In, Out> {
    func: F,
    _phantom: std::marker::PhantomData<fn(In) -> Out>,
}

impl<F, In, Out> FnFunction<F, In, Out>
where
    F: Fn(InvocationEvent<In>, &Context) -> Result<Out, ExecutionError> + Send + Sync + 'static,
{
    /// Creates a new closure-based function.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self {
            func,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, In, Out> Function<In, Out> for FnFunction<F, In, Out>
where
    F: Fn(InvocationEvent<In>, &Context) -> Result<Out, ExecutionError> + Send + Sync + 'static,
    In: DeserializeOwned + Send + 'static,
    Out: Serialize + Send + 'static,
{
    fn apply(&self, event: InvocationEvent<In>, context: &Context) -> Result<Out, ExecutionError> {
        (self.func)(event, context)
    }
}
