use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// Per-room SSE hubs carved out from [`super::AppState`].
///
/// A hub is created lazily on the first subscription and dropped together
/// with its room, so abandoned host streams do not accumulate.
pub struct RoomSseHubs {
    hubs: DashMap<String, SseHub>,
    capacity: usize,
}

impl RoomSseHubs {
    /// Build the hub registry with a per-channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            hubs: DashMap::new(),
            capacity,
        }
    }

    /// Register a subscriber on the room's hub, creating the hub on demand.
    pub fn subscribe(&self, room_code: &str) -> broadcast::Receiver<ServerEvent> {
        self.hubs
            .entry(room_code.to_string())
            .or_insert_with(|| SseHub::new(self.capacity))
            .subscribe()
    }

    /// Mirror an event onto the room's hub, if any host stream ever opened it.
    pub fn broadcast(&self, room_code: &str, event: ServerEvent) {
        if let Some(hub) = self.hubs.get(room_code) {
            hub.broadcast(event);
        }
    }

    /// Drop the hub for an evicted room.
    pub fn remove(&self, room_code: &str) {
        self.hubs.remove(room_code);
    }
}

/// Simple broadcast hub wrapper used by the SSE services.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}
