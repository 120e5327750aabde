//! A function that exercises every logging channel.

use hermes_core::{Context, ExecutionError, Function, InvocationEvent};
use serde::{Deserialize, Serialize};

/// Input accepted by [`DebugLogsFunction`]. Every field is optional, so `{}`
/// is a valid payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunctionInput {
    /// Restrict the lookup to accounts with this name.
    pub account_name: Option<String>,
    /// Maximum number of accounts to return.
    pub limit: Option<u32>,
}

/// An account record in the shape the platform serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    /// Record id.
    pub id: String,
    /// Account name.
    pub name: String,
}

impl Account {
    /// Creates an account record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Output of [`DebugLogsFunction`]: an ordered, possibly empty list of
/// accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOutput {
    /// The accounts found.
    pub accounts: Vec<Account>,
}

impl FunctionOutput {
    /// Wraps a list of accounts.
    #[must_use]
    pub const fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }
}

/// Writes one raw line, three info records and one debug record, then
/// returns an empty [`FunctionOutput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugLogsFunction;

impl Function<FunctionInput, FunctionOutput> for DebugLogsFunction {
    fn apply(
        &self,
        _event: InvocationEvent<FunctionInput>,
        context: &Context,
    ) -> Result<FunctionOutput, ExecutionError> {
        let logger = context.logger();

        logger.write_raw("println works");
        logger.info("logging info 1");
        logger.info("logging info 2");
        logger.info("logging info 3");
        logger.debug("logging debug 1");

        Ok(FunctionOutput::new(Vec::new()))
    }
}
