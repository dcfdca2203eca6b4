//! Persisted representation of authored quizzes.

use serde::{Deserialize, Serialize};

/// Stored quiz definition, keyed by its room code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizEntity {
    /// Short alphanumeric code players use to join the session.
    pub quiz_code: String,
    /// Display title of the quiz.
    pub title: String,
    /// Optional free-form description shown in authoring tools.
    pub description: Option<String>,
    /// Session settings chosen by the quiz author.
    pub settings: QuizSettingsEntity,
    /// Ordered list of questions in authoring order.
    pub questions: Vec<QuestionEntity>,
}

/// Author-chosen settings applied to every session of a quiz.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuizSettingsEntity {
    /// Advertised number of questions.
    pub num_questions: usize,
    /// Seconds each player gets per question before the client auto-submits.
    pub time_per_question: u32,
    /// Points awarded for each correct answer.
    pub points_per_question: u32,
}

/// A single stored question with its answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionEntity {
    /// Question text shown to players.
    pub text: String,
    /// Candidate answers, four or more.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer_index: usize,
}
