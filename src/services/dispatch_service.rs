//! Question dispatching: one question in flight per player at a time.

use tracing::debug;
use uuid::Uuid;

use crate::{
    dto::room::QuestionView,
    services::events,
    state::{SharedState, room::Room, state_machine::RoomEvent},
};

/// Emit the next question for one player, or finalize their progress.
///
/// Invoked only at quiz delivery and after one of the player's answers has
/// been processed, which is what keeps exactly one question in flight per
/// player. Callers hold the room lock.
pub(crate) fn dispatch_next(
    state: &SharedState,
    room_code: &str,
    room: &mut Room,
    player_id: Uuid,
) {
    let total_questions = match room.quiz.as_ref() {
        Some(quiz) => quiz.questions.len(),
        None => return,
    };

    let Some(player) = room.players.get_mut(&player_id) else {
        return;
    };
    if !player.is_participant() {
        // Joined mid-session; they spectate until the next start.
        return;
    }

    if player.is_finished() {
        events::send_player_finished(state, player_id);

        // Global barrier: the room finishes only when its slowest participant
        // does, and the transition guard keeps the broadcast to once.
        if room.participants_all_finished() && room.apply(RoomEvent::AllFinished).is_ok() {
            debug!(room = %room_code, "all participants finished");
            events::broadcast_quiz_finished(state, room_code, room);
        }
        return;
    }

    let question_index = player.sequence[player.cursor];
    let question_number = player.cursor + 1;
    player.answered_current = false;

    let Some(question) = room
        .quiz
        .as_ref()
        .and_then(|quiz| quiz.questions.get(question_index))
    else {
        return;
    };

    events::send_new_question(
        state,
        player_id,
        QuestionView::from(question),
        question_number,
        total_questions,
        question_index,
    );
}
