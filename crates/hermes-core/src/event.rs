//! Invocation event types.
//!
//! An [`InvocationEvent`] pairs the typed payload of one call with the
//! CloudEvents-style metadata the host attached to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Event type stamped on events that do not name one.
pub const DEFAULT_EVENT_TYPE: &str = "com.hermes.function.invoke";

/// Event source stamped on events that do not name one.
pub const DEFAULT_EVENT_SOURCE: &str = "urn:hermes:local";

/// A unique identifier for each invocation, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines from one host sortable by
/// the invocation that produced them.
///
/// # Example
///
/// ```
/// use hermes_core::EventId;
///
/// let id = EventId::new();
/// println!("Invocation: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new unique event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an existing UUID, e.g. one received from an upstream event bus.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-call metadata of an invocation, without the payload.
///
/// Hosts build the metadata first and attach the payload once it has been
/// decoded into the function's input type (see [`EventMetadata::with_data`]).
/// Field names follow the CloudEvents JSON attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    id: EventId,

    #[serde(rename = "type")]
    event_type: String,

    source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<DateTime<Utc>>,

    #[serde(
        default,
        rename = "datacontenttype",
        skip_serializing_if = "Option::is_none"
    )]
    data_content_type: Option<String>,
}

impl EventMetadata {
    /// Creates metadata with a fresh ID and the default type and source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(EventId::new())
    }

    /// Creates metadata for a known event ID.
    #[must_use]
    pub fn with_id(id: EventId) -> Self {
        Self {
            id,
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            source: DEFAULT_EVENT_SOURCE.to_string(),
            time: None,
            data_content_type: None,
        }
    }

    /// Returns the event ID.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Returns the logical event type.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the origin of the event.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns when the event was produced, if the host recorded it.
    #[must_use]
    pub const fn time(&self) -> Option<&DateTime<Utc>> {
        self.time.as_ref()
    }

    /// Returns the media type of the encoded payload, if known.
    #[must_use]
    pub fn data_content_type(&self) -> Option<&str> {
        self.data_content_type.as_deref()
    }

    /// Sets the event type.
    #[must_use]
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Sets the event source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the event time.
    #[must_use]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Sets the payload media type.
    #[must_use]
    pub fn with_data_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.data_content_type = Some(content_type.into());
        self
    }

    /// Attaches a decoded payload, producing the event handed to a function.
    #[must_use]
    pub fn with_data<T>(self, data: T) -> InvocationEvent<T> {
        InvocationEvent {
            metadata: self,
            data,
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// One unit of typed input plus its per-call metadata.
///
/// The event is moved into [`Function::apply`](crate::Function::apply), so the
/// payload cannot be mutated or reused once the call has started.
///
/// Serializes to the CloudEvents JSON shape:
///
/// ```
/// use hermes_core::InvocationEvent;
///
/// let json = r#"{
///     "id": "0190b7a2-7a4e-7cc2-9d6a-7b1d3f7f0a11",
///     "type": "com.example.reverse",
///     "source": "urn:event:from:salesforce",
///     "data": "hello"
/// }"#;
///
/// let event: InvocationEvent<String> = serde_json::from_str(json).unwrap();
/// assert_eq!(event.data(), "hello");
/// assert_eq!(event.event_type(), "com.example.reverse");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationEvent<T> {
    #[serde(flatten)]
    metadata: EventMetadata,
    data: T,
}

impl<T> InvocationEvent<T> {
    /// Creates an event with a fresh ID and default metadata.
    #[must_use]
    pub fn new(data: T) -> Self {
        EventMetadata::new().with_data(data)
    }

    /// Reassembles an event from metadata and payload.
    #[must_use]
    pub fn from_parts(metadata: EventMetadata, data: T) -> Self {
        metadata.with_data(data)
    }

    /// Starts building an event around `data`.
    #[must_use]
    pub fn builder(data: T) -> InvocationEventBuilder<T> {
        InvocationEventBuilder {
            metadata: EventMetadata::new(),
            data,
        }
    }

    /// Returns the payload.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the event, returning the payload.
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }

    /// Splits the event into metadata and payload.
    #[must_use]
    pub fn into_parts(self) -> (EventMetadata, T) {
        (self.metadata, self.data)
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    /// Returns the event ID.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.metadata.id
    }

    /// Returns the logical event type.
    #[must_use]
    pub fn event_type(&self) -> &str {
        self.metadata.event_type()
    }

    /// Returns the origin of the event.
    #[must_use]
    pub fn source(&self) -> &str {
        self.metadata.source()
    }

    /// Returns when the event was produced, if known.
    #[must_use]
    pub const fn time(&self) -> Option<&DateTime<Utc>> {
        self.metadata.time()
    }

    /// Returns the payload media type, if known.
    #[must_use]
    pub fn data_content_type(&self) -> Option<&str> {
        self.metadata.data_content_type()
    }
}

/// Builder for [`InvocationEvent`].
#[derive(Debug)]
pub struct InvocationEventBuilder<T> {
    metadata: EventMetadata,
    data: T,
}

impl<T> InvocationEventBuilder<T> {
    /// Uses a specific event ID instead of a generated one.
    #[must_use]
    pub fn id(mut self, id: EventId) -> Self {
        self.metadata.id = id;
        self
    }

    /// Sets the event type.
    #[must_use]
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_event_type(event_type);
        self
    }

    /// Sets the event source.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_source(source);
        self
    }

    /// Sets the event time.
    #[must_use]
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.metadata = self.metadata.with_time(time);
        self
    }

    /// Sets the payload media type.
    #[must_use]
    pub fn data_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_data_content_type(content_type);
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> InvocationEvent<T> {
        self.metadata.with_data(self.data)
    }
}
