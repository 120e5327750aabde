//! Invocation context types.
//!
//! The [`Context`] carries the cross-cutting facilities of one call: the
//! logger bound to the invocation and the identifiers of whoever triggered it.
//! It never carries the payload.

use crate::event::{EventId, InvocationEvent};
use crate::logging::{self, LogSink, Logger, NullSink};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Identifiers of the organization on whose behalf a function runs.
///
/// All fields are opaque to the runtime; they are passed through from the
/// host so function code can address the calling org's APIs.
///
/// # Example
///
/// ```
/// use hermes_core::Organization;
///
/// let org = Organization::new("00Dxx0000001gEREAY")
///     .with_user_id("005xx000001X8UzAAK")
///     .with_api_version("59.0");
///
/// assert_eq!(org.id(), "00Dxx0000001gEREAY");
/// assert_eq!(org.api_version(), Some("59.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Organization {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_version: Option<String>,
}

impl Organization {
    /// Creates an organization with the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Returns the organization ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the invoking user's ID, if known.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the organization's domain URL, if known.
    #[must_use]
    pub fn domain_url(&self) -> Option<&str> {
        self.domain_url.as_deref()
    }

    /// Returns the API version the caller speaks, if known.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Sets the invoking user's ID.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the domain URL.
    #[must_use]
    pub fn with_domain_url(mut self, domain_url: impl Into<String>) -> Self {
        self.domain_url = Some(domain_url.into());
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }
}

/// Per-call context handed to [`Function::apply`](crate::Function::apply).
///
/// A host builds a fresh `Context` for every invocation. It is not `Clone`:
/// one context serves exactly one call.
///
/// # Example
///
/// ```
/// use hermes_core::{Context, InvocationEvent};
///
/// let event = InvocationEvent::new("payload".to_string());
/// let ctx = Context::for_event(&event);
///
/// assert_eq!(ctx.invocation_id(), event.id());
/// ctx.logger().info("processing");
/// ```
#[derive(Debug)]
pub struct Context {
    invocation_id: EventId,
    request_id: Option<String>,
    organization: Option<Organization>,
    logger: Logger,
    started_at: Instant,
}

impl Context {
    /// Creates a context for `invocation_id` that logs to the ambient sink.
    #[must_use]
    pub fn new(invocation_id: EventId) -> Self {
        Self::builder(invocation_id).build()
    }

    /// Creates a context matching an event, logging to the ambient sink.
    #[must_use]
    pub fn for_event<T>(event: &InvocationEvent<T>) -> Self {
        Self::new(event.id())
    }

    /// Starts building a context.
    #[must_use]
    pub fn builder(invocation_id: EventId) -> ContextBuilder {
        ContextBuilder {
            invocation_id,
            request_id: None,
            organization: None,
            sink: None,
        }
    }

    /// Creates a context for tests that discards all log output.
    #[must_use]
    pub fn mock() -> Self {
        Self::builder(EventId::new())
            .sink(Arc::new(NullSink))
            .build()
    }

    /// Returns the invocation this context belongs to.
    #[must_use]
    pub const fn invocation_id(&self) -> EventId {
        self.invocation_id
    }

    /// Returns the host's request identifier, if it supplied one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the calling organization, if known.
    #[must_use]
    pub const fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    /// Returns the logger for this invocation.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Returns the time elapsed since the context was built.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Builder for [`Context`].
pub struct ContextBuilder {
    invocation_id: EventId,
    request_id: Option<String>,
    organization: Option<Organization>,
    sink: Option<Arc<dyn LogSink>>,
}

impl ContextBuilder {
    /// Sets the host's request identifier.
    #[must_use]
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Sets the calling organization.
    #[must_use]
    pub fn organization(mut self, organization: Organization) -> Self {
        self.organization = Some(organization);
        self
    }

    /// Routes this invocation's logs to `sink` instead of the ambient sink.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> Context {
        let sink = self.sink.unwrap_or_else(logging::global_sink);
        Context {
            invocation_id: self.invocation_id,
            request_id: self.request_id,
            organization: self.organization,
            logger: Logger::new(self.invocation_id, sink),
            started_at: Instant::now(),
        }
    }
}

impl std::fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("invocation_id", &self.invocation_id)
            .field("request_id", &self.request_id)
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}
