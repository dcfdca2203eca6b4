//! Tagged WebSocket messages exchanged with players and the room admin.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{
    room::{PlayerSummary, QuestionView, QuizSnapshotView},
    validation::validate_room_code,
};

/// Error raised while parsing or validating an inbound client message.
#[derive(Debug, Error)]
pub enum ClientMessageError {
    /// The frame was not valid JSON for the tagged union.
    #[error("malformed message: {0}")]
    Parse(#[from] serde_json::Error),
    /// The frame parsed but carried invalid fields.
    #[error("invalid message: {0}")]
    Invalid(String),
}

/// Messages accepted from player WebSocket clients.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Bind this connection to a room; must be the first frame.
    JoinRoom {
        /// Code of the room to join.
        room_code: String,
        /// Identity of the joining player.
        player: PlayerInput,
    },
    /// Acknowledge the `quiz_starting` countdown.
    Ready {
        /// Code of the room being acknowledged.
        room_code: String,
    },
    /// Admin request to start the quiz for a room.
    StartQuiz {
        /// Code of the room to start.
        room_code: String,
    },
    /// Admin request to evict a player from the room.
    KickStudent {
        /// Code of the room.
        room_code: String,
        /// Player to evict.
        target_id: Uuid,
    },
    /// Answer submission for the player's current question.
    SubmitAnswer {
        /// Code of the room.
        room_code: String,
        /// Submitting player; must match the connection's bound id.
        player_id: Uuid,
        /// Real (authoring-order) index of the answered question.
        question_index: usize,
        /// Selected option, or `-1` when the question timed out unanswered.
        selected_option_index: i64,
    },
    /// Catch-all for unrecognised message types.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Parse a text frame and validate its boundary invariants.
    pub fn from_json_str(payload: &str) -> Result<Self, ClientMessageError> {
        let message: Self = serde_json::from_str(payload)?;
        message.validate()?;
        Ok(message)
    }

    /// The room code carried by the message, if any.
    pub fn room_code(&self) -> Option<&str> {
        match self {
            Self::JoinRoom { room_code, .. }
            | Self::Ready { room_code }
            | Self::StartQuiz { room_code }
            | Self::KickStudent { room_code, .. }
            | Self::SubmitAnswer { room_code, .. } => Some(room_code),
            Self::Unknown => None,
        }
    }

    fn validate(&self) -> Result<(), ClientMessageError> {
        if let Some(code) = self.room_code() {
            validate_room_code(code)
                .map_err(|err| ClientMessageError::Invalid(err.to_string()))?;
        }

        if let Self::JoinRoom { player, .. } = self {
            if player.display_name.trim().is_empty() {
                return Err(ClientMessageError::Invalid(
                    "display name must not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Identity supplied by a player when joining a room.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlayerInput {
    /// Stable player identifier.
    pub id: Uuid,
    /// Name shown to the room.
    pub display_name: String,
}

/// Messages pushed to player WebSocket clients.
///
/// Broadcast variants are fanned out to every connection of a room and
/// mirrored onto the room's SSE hub; directed variants go to one player only.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Broadcast: the room's player list changed.
    UpdateStudentList {
        /// Current players, in join order.
        players: Vec<PlayerSummary>,
    },
    /// Directed: the receiving player was evicted by the admin.
    YouWereKicked,
    /// Broadcast: a start was requested, countdown UI should begin.
    QuizStarting,
    /// Broadcast: the quiz payload, answer keys stripped.
    QuizStarted {
        /// Snapshot of the started quiz.
        quiz: QuizSnapshotView,
    },
    /// Directed: the player's next question.
    NewQuestion {
        /// The question, without its answer key.
        question: QuestionView,
        /// 1-based display position in the player's private order.
        question_number: usize,
        /// Total number of questions in the session.
        total_questions: usize,
        /// Real authoring-order index, echoed back on submission.
        question_index: usize,
    },
    /// Directed: the receiving player answered their last question.
    PlayerFinished,
    /// Broadcast: standings after a processed submission.
    UpdateLeaderboard {
        /// Current players with scores.
        players: Vec<PlayerSummary>,
    },
    /// Broadcast: every participant finished; final standings.
    QuizFinished {
        /// Final players with scores.
        players: Vec<PlayerSummary>,
    },
}

impl ServerMessage {
    /// Event name used when the message is mirrored onto an SSE stream.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::UpdateStudentList { .. } => "update_student_list",
            Self::YouWereKicked => "you_were_kicked",
            Self::QuizStarting => "quiz_starting",
            Self::QuizStarted { .. } => "quiz_started",
            Self::NewQuestion { .. } => "new_question",
            Self::PlayerFinished => "player_finished",
            Self::UpdateLeaderboard { .. } => "update_leaderboard",
            Self::QuizFinished { .. } => "quiz_finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_room_parses_with_snake_case_tag() {
        let raw = r#"{
            "type": "join_room",
            "room_code": "AB12CD",
            "player": {"id": "8f9f12da-2a44-4c65-a848-8c2c3d1bd0a5", "display_name": "Ada"}
        }"#;

        match ClientMessage::from_json_str(raw).unwrap() {
            ClientMessage::JoinRoom { room_code, player } => {
                assert_eq!(room_code, "AB12CD");
                assert_eq!(player.display_name, "Ada");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn submit_answer_accepts_timeout_sentinel() {
        let raw = r#"{
            "type": "submit_answer",
            "room_code": "AB12CD",
            "player_id": "8f9f12da-2a44-4c65-a848-8c2c3d1bd0a5",
            "question_index": 2,
            "selected_option_index": -1
        }"#;

        match ClientMessage::from_json_str(raw).unwrap() {
            ClientMessage::SubmitAnswer {
                selected_option_index,
                ..
            } => assert_eq!(selected_option_index, -1),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn malformed_room_code_is_rejected_at_the_boundary() {
        let raw = r#"{"type": "ready", "room_code": "nope"}"#;
        assert!(matches!(
            ClientMessage::from_json_str(raw),
            Err(ClientMessageError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_type_falls_back_to_unknown_variant() {
        let raw = r#"{"type": "emote", "room_code": "AB12CD"}"#;
        assert!(matches!(
            ClientMessage::from_json_str(raw).unwrap(),
            ClientMessage::Unknown
        ));
    }
}
