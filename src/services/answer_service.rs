//! Answer processing: exactly-once scoring and per-player advancement.

use tracing::debug;
use uuid::Uuid;

use crate::{
    services::{dispatch_service, events},
    state::SharedState,
};

/// Sentinel submitted by clients when the per-question timer elapsed.
pub const NO_ANSWER: i64 = -1;

/// Process one answer submission.
///
/// Missing room, quiz, question, or player, a held answer lock, or an index
/// that is not the player's current question are all discarded silently;
/// duplicates and late retries therefore have no effect. Any selected option
/// other than the question's correct index (including the `-1` timeout
/// sentinel and out-of-range values) simply scores zero.
///
/// Standings are broadcast to the whole room after every submission so
/// leaderboards stay live regardless of whose answer advanced.
pub async fn submit(
    state: &SharedState,
    room_code: &str,
    player_id: Uuid,
    question_index: usize,
    selected_option_index: i64,
) {
    let Some(room_arc) = state.room(room_code) else {
        debug!(room = %room_code, "submission ignored: unknown room");
        return;
    };
    let mut room = room_arc.lock().await;

    let (points, correct_answer_index) = {
        let Some(quiz) = room.quiz.as_ref() else {
            debug!(room = %room_code, "submission ignored: no quiz snapshot");
            return;
        };
        let Some(question) = quiz.questions.get(question_index) else {
            events::broadcast_leaderboard(state, room_code, &room);
            return;
        };
        (
            quiz.settings.points_per_question,
            question.correct_answer_index,
        )
    };

    let mut advanced = false;
    if let Some(player) = room.players.get_mut(&player_id) {
        let expected = player.sequence.get(player.cursor).copied();
        if !player.answered_current && expected == Some(question_index) {
            if selected_option_index != NO_ANSWER
                && usize::try_from(selected_option_index) == Ok(correct_answer_index)
            {
                player.score += points;
            }
            player.answered_current = true;
            player.cursor += 1;
            advanced = true;
        } else {
            debug!(
                room = %room_code,
                player = %player_id,
                question_index,
                "submission ignored: duplicate or stale"
            );
        }
    }

    if advanced {
        room.touch();
        dispatch_service::dispatch_next(state, room_code, &mut room, player_id);
    }

    events::broadcast_leaderboard(state, room_code, &room);
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::models::{QuestionEntity, QuizEntity, QuizSettingsEntity},
        dao::quiz_store::{QuizStore, memory::MemoryQuizStore},
        services::{room_service, session_service},
        state::{AppState, state_machine::RoomPhase},
    };

    const CODE: &str = "AB12CD";

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(MemoryQuizStore::new()))
    }

    fn sample_quiz(questions: usize, points: u32) -> QuizEntity {
        QuizEntity {
            quiz_code: CODE.to_string(),
            title: "Sample".into(),
            description: None,
            settings: QuizSettingsEntity {
                num_questions: questions,
                time_per_question: 30,
                points_per_question: points,
            },
            questions: (0..questions)
                .map(|index| QuestionEntity {
                    text: format!("Question {index}"),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer_index: index % 4,
                })
                .collect(),
        }
    }

    /// Join the players, store the quiz, start it, and wait out the countdown.
    async fn started_room(state: &SharedState, quiz: QuizEntity, players: &[Uuid]) {
        state.quiz_store().save_quiz(quiz).await.unwrap();
        for (index, id) in players.iter().enumerate() {
            room_service::join(state, CODE, *id, format!("P{index}")).await;
        }
        session_service::start(state, CODE).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    /// The player's current expected question index and its correct answer.
    async fn current_question(state: &SharedState, player_id: Uuid) -> (usize, usize) {
        let room = state.room(CODE).unwrap();
        let room = room.lock().await;
        let player = &room.players[&player_id];
        let question_index = player.sequence[player.cursor];
        let correct = room.quiz.as_ref().unwrap().questions[question_index].correct_answer_index;
        (question_index, correct)
    }

    async fn score_and_cursor(state: &SharedState, player_id: Uuid) -> (u32, usize) {
        let room = state.room(CODE).unwrap();
        let room = room.lock().await;
        let player = &room.players[&player_id];
        (player.score, player.cursor)
    }

    #[tokio::test(start_paused = true)]
    async fn correct_wrong_and_timeout_walk_the_full_sequence() {
        let state = test_state();
        let player = Uuid::new_v4();
        started_room(&state, sample_quiz(3, 1), &[player]).await;

        // Correct answer on the first question of the player's private order.
        let (question_index, correct) = current_question(&state, player).await;
        submit(&state, CODE, player, question_index, correct as i64).await;

        // Wrong answer on the second.
        let (question_index, correct) = current_question(&state, player).await;
        let wrong = ((correct + 1) % 4) as i64;
        submit(&state, CODE, player, question_index, wrong).await;

        // Timeout on the third.
        let (question_index, _) = current_question(&state, player).await;
        submit(&state, CODE, player, question_index, NO_ANSWER).await;

        let (score, cursor) = score_and_cursor(&state, player).await;
        assert_eq!(score, 1);
        assert_eq!(cursor, 3);

        let room = state.room(CODE).unwrap();
        let room = room.lock().await;
        assert_eq!(room.phase(), RoomPhase::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_submission_is_a_noop() {
        let state = test_state();
        let player = Uuid::new_v4();
        started_room(&state, sample_quiz(3, 1), &[player]).await;

        let (question_index, correct) = current_question(&state, player).await;
        submit(&state, CODE, player, question_index, correct as i64).await;
        // Simulated network retry for the already-answered question.
        submit(&state, CODE, player, question_index, correct as i64).await;

        let (score, cursor) = score_and_cursor(&state, player).await;
        assert_eq!(score, 1);
        assert_eq!(cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_option_scores_zero_but_advances() {
        let state = test_state();
        let player = Uuid::new_v4();
        started_room(&state, sample_quiz(2, 3), &[player]).await;

        let (question_index, _) = current_question(&state, player).await;
        submit(&state, CODE, player, question_index, 99).await;

        let (score, cursor) = score_and_cursor(&state, player).await;
        assert_eq!(score, 0);
        assert_eq!(cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn room_finishes_only_when_the_slowest_player_does() {
        let state = test_state();
        let fast = Uuid::new_v4();
        let slow = Uuid::new_v4();
        started_room(&state, sample_quiz(2, 1), &[fast, slow]).await;

        for _ in 0..2 {
            let (question_index, correct) = current_question(&state, fast).await;
            submit(&state, CODE, fast, question_index, correct as i64).await;
        }

        {
            let room = state.room(CODE).unwrap();
            let room = room.lock().await;
            assert!(room.players[&fast].is_finished());
            assert_eq!(room.phase(), RoomPhase::InProgress);
        }

        for _ in 0..2 {
            let (question_index, _) = current_question(&state, slow).await;
            submit(&state, CODE, slow, question_index, NO_ANSWER).await;
        }

        let room = state.room(CODE).unwrap();
        let room = room.lock().await;
        assert_eq!(room.phase(), RoomPhase::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_before_start_excludes_the_player() {
        let state = test_state();
        let staying = Uuid::new_v4();
        let leaving = Uuid::new_v4();
        state.quiz_store().save_quiz(sample_quiz(2, 1)).await.unwrap();
        room_service::join(&state, CODE, staying, "P0".into()).await;
        room_service::join(&state, CODE, leaving, "P1".into()).await;

        room_service::disconnect(&state, leaving).await;
        session_service::start(&state, CODE).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        {
            let room = state.room(CODE).unwrap();
            let room = room.lock().await;
            assert_eq!(room.players.len(), 1);
            assert!(room.players[&staying].is_participant());
        }

        for _ in 0..2 {
            let (question_index, correct) = current_question(&state, staying).await;
            submit(&state, CODE, staying, question_index, correct as i64).await;
        }

        let room = state.room(CODE).unwrap();
        let room = room.lock().await;
        assert_eq!(room.phase(), RoomPhase::Finished);
        assert_eq!(room.players[&staying].score, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn late_joiner_cannot_score_or_block_completion() {
        let state = test_state();
        let participant = Uuid::new_v4();
        started_room(&state, sample_quiz(1, 1), &[participant]).await;

        let latecomer = Uuid::new_v4();
        room_service::join(&state, CODE, latecomer, "Late".into()).await;
        submit(&state, CODE, latecomer, 0, 0).await;

        {
            let room = state.room(CODE).unwrap();
            let room = room.lock().await;
            assert_eq!(room.players[&latecomer].score, 0);
            assert_eq!(room.players[&latecomer].cursor, 0);
        }

        let (question_index, correct) = current_question(&state, participant).await;
        submit(&state, CODE, participant, question_index, correct as i64).await;

        let room = state.room(CODE).unwrap();
        let room = room.lock().await;
        assert_eq!(room.phase(), RoomPhase::Finished);
    }

    #[tokio::test]
    async fn submission_to_unknown_room_is_absorbed() {
        let state = test_state();
        submit(&state, "ZZ99ZZ", Uuid::new_v4(), 0, 0).await;
    }
}
