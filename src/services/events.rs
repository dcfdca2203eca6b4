//! Directed and broadcast event delivery for room sessions.
//!
//! Broadcast events are fanned out to every connected player of a room over
//! their WebSocket and mirrored onto the room's SSE hub so host screens can
//! follow along. Directed events go to a single player's socket. Delivery is
//! fire-and-forget: a missing or closed connection is logged and skipped.

use axum::extract::ws::Message;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dto::{
        room::{self, QuestionView, QuizSnapshotView},
        sse::ServerEvent,
        ws::ServerMessage,
    },
    state::{SharedState, room::Room},
};

/// Broadcast the room's current player list.
pub fn broadcast_student_list(state: &SharedState, room_code: &str, room: &Room) {
    let message = ServerMessage::UpdateStudentList {
        players: room::player_summaries(room),
    };
    broadcast_to_room(state, room_code, room, &message);
}

/// Broadcast that a start was requested and the countdown began.
pub fn broadcast_quiz_starting(state: &SharedState, room_code: &str, room: &Room) {
    broadcast_to_room(state, room_code, room, &ServerMessage::QuizStarting);
}

/// Broadcast the quiz payload, stripped of answer keys.
pub fn broadcast_quiz_started(state: &SharedState, room_code: &str, room: &Room) {
    let Some(quiz) = room.quiz.as_ref() else {
        warn!(room = %room_code, "quiz_started broadcast requested without a snapshot");
        return;
    };
    let message = ServerMessage::QuizStarted {
        quiz: QuizSnapshotView::from(quiz),
    };
    broadcast_to_room(state, room_code, room, &message);
}

/// Broadcast standings after a processed submission.
pub fn broadcast_leaderboard(state: &SharedState, room_code: &str, room: &Room) {
    let message = ServerMessage::UpdateLeaderboard {
        players: room::player_summaries(room),
    };
    broadcast_to_room(state, room_code, room, &message);
}

/// Broadcast the final standings once every participant finished.
pub fn broadcast_quiz_finished(state: &SharedState, room_code: &str, room: &Room) {
    let message = ServerMessage::QuizFinished {
        players: room::player_summaries(room),
    };
    broadcast_to_room(state, room_code, room, &message);
}

/// Send a player their next question.
pub fn send_new_question(
    state: &SharedState,
    player_id: Uuid,
    question: QuestionView,
    question_number: usize,
    total_questions: usize,
    question_index: usize,
) {
    let message = ServerMessage::NewQuestion {
        question,
        question_number,
        total_questions,
        question_index,
    };
    send_to_player(state, player_id, &message);
}

/// Tell a player they answered their last question.
pub fn send_player_finished(state: &SharedState, player_id: Uuid) {
    send_to_player(state, player_id, &ServerMessage::PlayerFinished);
}

/// Tell a player they were evicted by the admin.
pub fn send_you_were_kicked(state: &SharedState, player_id: Uuid) {
    send_to_player(state, player_id, &ServerMessage::YouWereKicked);
}

/// Serialize once, push to every room member's socket, mirror onto SSE.
fn broadcast_to_room(state: &SharedState, room_code: &str, room: &Room, message: &ServerMessage) {
    let payload = match serde_json::to_string(message) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(event = message.event_name(), error = %err, "failed to serialize broadcast payload");
            return;
        }
    };

    for player_id in room.players.keys() {
        if let Some(connection) = state.connections().get(player_id) {
            let _ = connection.tx.send(Message::Text(payload.clone().into()));
        } else {
            debug!(room = %room_code, player = %player_id, "skipping broadcast to player without connection");
        }
    }

    state.room_sse().broadcast(
        room_code,
        ServerEvent::new(Some(message.event_name().to_string()), payload),
    );
}

/// Serialize and push a directed message to a single player's socket.
fn send_to_player(state: &SharedState, player_id: Uuid, message: &ServerMessage) {
    let Some(connection) = state.connections().get(&player_id) else {
        debug!(player = %player_id, event = message.event_name(), "directed event dropped: player not connected");
        return;
    };

    let payload = match serde_json::to_string(message) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(event = message.event_name(), error = %err, "failed to serialize directed payload");
            return;
        }
    };

    if connection.tx.send(Message::Text(payload.into())).is_err() {
        let player_id = connection.id;
        drop(connection);
        warn!(player = %player_id, "writer closed, removing player connection");
        state.connections().remove(&player_id);
    }
}
