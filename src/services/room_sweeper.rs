//! Background eviction of abandoned rooms.
//!
//! Rooms are created implicitly on first join and would otherwise live until
//! process restart. The sweeper periodically evicts rooms that have been
//! empty or finished for longer than the configured idle timeout, dropping
//! their SSE hub with them.

use tokio::time::sleep;
use tracing::info;

use crate::state::{SharedState, state_machine::RoomPhase};

/// Run the eviction loop forever; spawned once at startup.
pub async fn run(state: SharedState) {
    let interval = state.config().sweep_interval();

    loop {
        sleep(interval).await;
        sweep(&state).await;
    }
}

/// Evict every room that is currently evictable.
pub(crate) async fn sweep(state: &SharedState) {
    let idle_timeout = state.config().room_idle_timeout();

    let room_codes: Vec<String> = state
        .rooms()
        .iter()
        .map(|entry| entry.key().clone())
        .collect();

    for room_code in room_codes {
        let Some(room_arc) = state.room(&room_code) else {
            continue;
        };

        let evictable = {
            let room = room_arc.lock().await;
            let idle = room.last_activity().elapsed() >= idle_timeout;
            idle && (room.players.is_empty() || room.phase() == RoomPhase::Finished)
        };

        if evictable {
            info!(room = %room_code, "evicting idle room");
            state.remove_room(&room_code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::quiz_store::memory::MemoryQuizStore,
        services::room_service,
        state::AppState,
    };

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(MemoryQuizStore::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn empty_room_is_evicted_after_the_idle_timeout() {
        let state = test_state();
        let player = Uuid::new_v4();
        room_service::join(&state, "AB12CD", player, "Ada".into()).await;
        room_service::disconnect(&state, player).await;

        sweep(&state).await;
        assert!(state.room("AB12CD").is_some(), "room still within idle grace");

        tokio::time::advance(state.config().room_idle_timeout() + Duration::from_secs(1)).await;
        sweep(&state).await;
        assert!(state.room("AB12CD").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn occupied_lobby_survives_the_sweep() {
        let state = test_state();
        room_service::join(&state, "AB12CD", Uuid::new_v4(), "Ada".into()).await;

        tokio::time::advance(state.config().room_idle_timeout() + Duration::from_secs(1)).await;
        sweep(&state).await;

        assert!(state.room("AB12CD").is_some());
    }
}
