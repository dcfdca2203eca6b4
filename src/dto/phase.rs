use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::RoomPhase;

/// Publicly visible room phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum VisibleRoomPhase {
    /// Players gather, no quiz started.
    Lobby,
    /// Start countdown running.
    Starting,
    /// Questions being dispatched and answered.
    InProgress,
    /// Final standings published.
    Finished,
}

impl From<&RoomPhase> for VisibleRoomPhase {
    fn from(value: &RoomPhase) -> Self {
        match value {
            RoomPhase::Lobby => VisibleRoomPhase::Lobby,
            RoomPhase::Starting => VisibleRoomPhase::Starting,
            RoomPhase::InProgress => VisibleRoomPhase::InProgress,
            RoomPhase::Finished => VisibleRoomPhase::Finished,
        }
    }
}
