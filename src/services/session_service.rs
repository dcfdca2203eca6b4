//! Session lifecycle: start sequencing, ready handshake, quiz delivery.

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::quiz_store::QuizStore,
    services::{dispatch_service, events},
    state::{
        SharedState,
        room::QuizSnapshot,
        state_machine::{RoomEvent, RoomPhase},
    },
};

/// Start the quiz for a room.
///
/// No-ops silently when the room is unknown, no quiz with at least one
/// question exists under the room's code, or a session is already running;
/// these events have no response channel.
///
/// On success every current player is reset and dealt a fresh independent
/// permutation, the snapshot is frozen onto the room, `quiz_starting` is
/// broadcast, and a countdown task is spawned that delivers the quiz once
/// every player acknowledged readiness or the configured deadline passed,
/// whichever comes first.
pub async fn start(state: &SharedState, room_code: &str) {
    let Some(room_arc) = state.room(room_code) else {
        debug!(room = %room_code, "start ignored: unknown room");
        return;
    };

    let quiz = match state.quiz_store().find_quiz(room_code).await {
        Ok(Some(quiz)) if !quiz.questions.is_empty() => quiz,
        Ok(_) => {
            warn!(room = %room_code, "start ignored: no quiz with questions under this code");
            return;
        }
        Err(err) => {
            warn!(room = %room_code, error = %err, "start ignored: quiz store lookup failed");
            return;
        }
    };

    let watcher = {
        let mut room = room_arc.lock().await;
        if let Err(err) = room.apply(RoomEvent::StartQuiz) {
            debug!(room = %room_code, %err, "start ignored");
            return;
        }

        let snapshot = QuizSnapshot::from(quiz);
        let question_count = snapshot.questions.len();
        for player in room.players.values_mut() {
            player.reset_for_start(question_count);
        }
        room.quiz = Some(snapshot);
        room.reset_ready();
        room.touch();

        info!(room = %room_code, players = room.players.len(), "quiz starting");
        events::broadcast_quiz_starting(state, room_code, &room);

        room.ready_watcher()
    };

    let state = state.clone();
    let room_code = room_code.to_string();
    tokio::spawn(run_countdown(state, room_code, watcher));
}

/// Record a player's ready acknowledgment during the countdown.
pub async fn mark_ready(state: &SharedState, room_code: &str, player_id: Uuid) {
    let Some(room_arc) = state.room(room_code) else {
        return;
    };
    let mut room = room_arc.lock().await;

    if room.phase() == RoomPhase::Starting {
        room.mark_ready(player_id);
        room.touch();
    }
}

/// Wait out the starting countdown, cut short once every player is ready.
async fn run_countdown(state: SharedState, room_code: String, mut watcher: watch::Receiver<bool>) {
    let deadline = state.config().start_countdown();

    tokio::select! {
        _ = tokio::time::sleep(deadline) => {
            debug!(room = %room_code, "countdown deadline reached");
        }
        _ = watcher.wait_for(|ready| *ready) => {
            debug!(room = %room_code, "all players ready before deadline");
        }
    }

    deliver_quiz(&state, &room_code).await;
}

/// Broadcast the quiz payload and dispatch the first question to everyone.
///
/// Absorbed harmlessly when the room disappeared or was restarted while the
/// countdown was pending.
pub(crate) async fn deliver_quiz(state: &SharedState, room_code: &str) {
    let Some(room_arc) = state.room(room_code) else {
        return;
    };
    let mut room = room_arc.lock().await;

    if let Err(err) = room.apply(RoomEvent::QuizDelivered) {
        debug!(room = %room_code, %err, "quiz delivery skipped");
        return;
    }
    room.touch();

    events::broadcast_quiz_started(state, room_code, &room);

    let player_ids: Vec<Uuid> = room.players.keys().copied().collect();
    for player_id in player_ids {
        dispatch_service::dispatch_next(state, room_code, &mut room, player_id);
    }
}
