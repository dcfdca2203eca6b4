//! Payload wrapper carried across the per-room SSE channels.

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized JSON data field.
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already serialised data payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }
}
