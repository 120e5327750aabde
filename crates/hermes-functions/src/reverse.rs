//! String reversal.

use hermes_core::{Context, ExecutionError, Function, InvocationEvent};

/// Returns its input with the characters in reverse order.
///
/// Reversal is by Unicode scalar value, so the output always has as many
/// characters and bytes as the input. Logs one info record per call.
///
/// # Example
///
/// ```
/// use hermes_core::{Context, Function, InvocationEvent};
/// use hermes_functions::ReverseFunction;
///
/// let out = ReverseFunction
///     .apply(InvocationEvent::new("hello".to_string()), &Context::mock())
///     .unwrap();
/// assert_eq!(out, "olleh");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseFunction;

impl Function<String, String> for ReverseFunction {
    fn apply(
        &self,
        event: InvocationEvent<String>,
        context: &Context,
    ) -> Result<String, ExecutionError> {
        context.logger().info("logging info 1");
        Ok(event.data().chars().rev().collect())
    }
}
