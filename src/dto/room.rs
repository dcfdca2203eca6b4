//! Projections of room and player state exposed over WS, SSE, and REST.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{format_system_time, phase::VisibleRoomPhase},
    state::room::{PlayerSession, Question, QuizSnapshot, Room},
};

/// Public projection of a player exposed in lobby and leaderboard lists.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Stable player identifier.
    pub id: Uuid,
    /// Name shown to the room.
    pub display_name: String,
    /// Current score.
    pub score: u32,
}

impl From<&PlayerSession> for PlayerSummary {
    fn from(player: &PlayerSession) -> Self {
        Self {
            id: player.id,
            display_name: player.display_name.clone(),
            score: player.score,
        }
    }
}

/// A question as players see it: the answer key never crosses this boundary.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct QuestionView {
    /// Question text.
    pub text: String,
    /// Candidate answers.
    pub options: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            text: question.text.clone(),
            options: question.options.clone(),
        }
    }
}

/// Quiz snapshot broadcast to the room when the session begins.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct QuizSnapshotView {
    /// Display title of the quiz.
    pub title: String,
    /// Number of questions each participant will receive.
    pub total_questions: usize,
    /// Seconds allotted per question.
    pub time_per_question: u32,
    /// Points awarded per correct answer.
    pub points_per_question: u32,
    /// Questions in authoring order, stripped of their answer keys.
    pub questions: Vec<QuestionView>,
}

impl From<&QuizSnapshot> for QuizSnapshotView {
    fn from(quiz: &QuizSnapshot) -> Self {
        Self {
            title: quiz.title.clone(),
            total_questions: quiz.questions.len(),
            time_per_question: quiz.settings.time_per_question,
            points_per_question: quiz.settings.points_per_question,
            questions: quiz.questions.iter().map(Into::into).collect(),
        }
    }
}

/// Room overview returned by the REST surface for host tooling.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomSummary {
    /// Code identifying the room.
    pub room_code: String,
    /// Current lifecycle phase.
    pub phase: VisibleRoomPhase,
    /// Players currently in the room.
    pub players: Vec<PlayerSummary>,
    /// Title of the running quiz, if one was started.
    pub quiz_title: Option<String>,
    /// RFC3339 creation timestamp.
    pub created_at: String,
}

impl RoomSummary {
    /// Project a locked room into its REST summary.
    pub fn from_room(room_code: &str, room: &Room) -> Self {
        Self {
            room_code: room_code.to_string(),
            phase: (&room.phase()).into(),
            players: room.players.values().map(Into::into).collect(),
            quiz_title: room.quiz.as_ref().map(|quiz| quiz.title.clone()),
            created_at: format_system_time(room.created_at()),
        }
    }
}

/// Collect the summaries for every player of a room, in join order.
pub fn player_summaries(room: &Room) -> Vec<PlayerSummary> {
    room.players.values().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::room::QuizSettings;

    #[test]
    fn snapshot_view_strips_answer_keys() {
        let quiz = QuizSnapshot {
            title: "Capitals".into(),
            settings: QuizSettings {
                time_per_question: 20,
                points_per_question: 2,
            },
            questions: vec![Question {
                text: "Capital of France?".into(),
                options: vec!["Paris".into(), "Lyon".into(), "Nice".into(), "Lille".into()],
                correct_answer_index: 0,
            }],
        };

        let view = QuizSnapshotView::from(&quiz);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(view.total_questions, 1);
        assert!(
            json["questions"][0].get("correct_answer_index").is_none(),
            "broadcast payload must not carry the answer key"
        );
    }
}
