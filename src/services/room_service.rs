//! Room registry operations: join, leave, kick, disconnect.

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    services::events,
    state::{SharedState, room::PlayerSession},
};

/// Add a player to a room, creating the room on first join.
///
/// Joining is idempotent: a player id already present leaves the room
/// untouched (reconnect-safe), but the current list is still broadcast so the
/// rejoining client resyncs its lobby view.
pub async fn join(state: &SharedState, room_code: &str, player_id: Uuid, display_name: String) {
    let room = state.room_or_create(room_code);
    let mut room = room.lock().await;

    if !room.players.contains_key(&player_id) {
        info!(room = %room_code, player = %player_id, "player joined room");
        room.players
            .insert(player_id, PlayerSession::new(player_id, display_name));
    }
    room.touch();

    events::broadcast_student_list(state, room_code, &room);
}

/// Remove a player from a specific room.
///
/// The updated list is broadcast only when a removal actually occurred, to
/// avoid spurious broadcasts.
pub async fn remove(state: &SharedState, room_code: &str, player_id: Uuid) -> bool {
    let Some(room) = state.room(room_code) else {
        return false;
    };
    let mut room = room.lock().await;

    if room.players.shift_remove(&player_id).is_none() {
        return false;
    }

    info!(room = %room_code, player = %player_id, "player removed from room");
    room.ready.remove(&player_id);
    // The departed player may have been the last missing ready ack.
    room.refresh_all_ready();
    room.touch();

    events::broadcast_student_list(state, room_code, &room);
    true
}

/// Evict a player on admin request, notifying them directly.
///
/// Kicking a player who already left is a no-op with no broadcast.
pub async fn kick(state: &SharedState, room_code: &str, target_id: Uuid) {
    if remove(state, room_code, target_id).await {
        events::send_you_were_kicked(state, target_id);
    } else {
        debug!(room = %room_code, player = %target_id, "kick ignored: player not in room");
    }
}

/// Remove a disconnected player from every room they appear in.
pub async fn disconnect(state: &SharedState, player_id: Uuid) {
    let room_codes: Vec<String> = state
        .rooms()
        .iter()
        .map(|entry| entry.key().clone())
        .collect();

    for room_code in room_codes {
        remove(state, &room_code, player_id).await;
    }
}
