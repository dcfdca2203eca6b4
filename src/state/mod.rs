//! Shared application state: room registry, connection routing, SSE hubs.

pub mod room;
mod sse;
pub mod state_machine;

use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::{config::AppConfig, dao::quiz_store::QuizStore, state::room::Room};

pub use self::sse::{RoomSseHubs, SseHub};

/// Cheaply clonable handle on the process-wide [`AppState`].
pub type SharedState = Arc<AppState>;

#[derive(Clone)]
/// Handle used to push messages to a connected player's WebSocket.
pub struct PlayerConnection {
    /// Player the connection is bound to.
    pub id: Uuid,
    /// Writer half of the player's socket.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Central application state storing rooms, connections, and the quiz store.
///
/// Connection handles are kept in their own routing table, consulted only at
/// the moment of directed delivery; room and player state stays
/// transport-agnostic.
pub struct AppState {
    config: AppConfig,
    quiz_store: Arc<dyn QuizStore>,
    rooms: DashMap<String, Arc<Mutex<Room>>>,
    connections: DashMap<Uuid, PlayerConnection>,
    sse: RoomSseHubs,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, quiz_store: Arc<dyn QuizStore>) -> SharedState {
        let sse = RoomSseHubs::new(config.sse_capacity());
        Arc::new(Self {
            config,
            quiz_store,
            rooms: DashMap::new(),
            connections: DashMap::new(),
            sse,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle on the quiz persistence collaborator.
    pub fn quiz_store(&self) -> Arc<dyn QuizStore> {
        self.quiz_store.clone()
    }

    /// Registry of live rooms keyed by their code.
    pub fn rooms(&self) -> &DashMap<String, Arc<Mutex<Room>>> {
        &self.rooms
    }

    /// Look up an existing room.
    pub fn room(&self, room_code: &str) -> Option<Arc<Mutex<Room>>> {
        self.rooms.get(room_code).map(|entry| entry.value().clone())
    }

    /// Look up a room, creating an empty lobby on first join.
    pub fn room_or_create(&self, room_code: &str) -> Arc<Mutex<Room>> {
        self.rooms
            .entry(room_code.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Room::new())))
            .value()
            .clone()
    }

    /// Evict a room and drop its SSE hub.
    pub fn remove_room(&self, room_code: &str) {
        self.rooms.remove(room_code);
        self.sse.remove(room_code);
    }

    /// Routing table of active player sockets keyed by player id.
    pub fn connections(&self) -> &DashMap<Uuid, PlayerConnection> {
        &self.connections
    }

    /// Per-room SSE hubs feeding host/projector streams.
    pub fn room_sse(&self) -> &RoomSseHubs {
        &self.sse
    }
}
