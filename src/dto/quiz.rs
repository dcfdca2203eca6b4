//! Authoring DTOs for the quiz store ingestion surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{QuestionEntity, QuizEntity, QuizSettingsEntity},
    dto::validation::validate_room_code,
};

/// Minimum number of answer options per question.
const MIN_OPTIONS: usize = 4;

/// Payload used to store or replace a quiz definition.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpsertQuizRequest {
    /// Code players will use to join sessions of this quiz.
    #[validate(custom(function = validate_room_code))]
    pub quiz_code: String,
    /// Display title.
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    /// Optional description for authoring tools.
    #[serde(default)]
    pub description: Option<String>,
    /// Session settings.
    #[validate(nested)]
    pub settings: QuizSettingsInput,
    /// Questions in authoring order; at least one.
    #[validate(length(min = 1, message = "quiz requires at least one question"))]
    #[validate(nested)]
    pub questions: Vec<QuestionInput>,
}

/// Session settings supplied by the quiz author.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct QuizSettingsInput {
    /// Advertised number of questions.
    #[validate(range(min = 1))]
    pub num_questions: usize,
    /// Seconds per question.
    #[validate(range(min = 1))]
    pub time_per_question: u32,
    /// Points per correct answer.
    #[validate(range(min = 1))]
    pub points_per_question: u32,
}

/// A single authored question.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionInput {
    /// Question text.
    pub text: String,
    /// Candidate answers; four or more.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer_index: usize,
}

impl Validate for QuestionInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.text.trim().is_empty() {
            let mut err = ValidationError::new("question_text");
            err.message = Some("question text must not be empty".into());
            errors.add("text", err);
        }

        if self.options.len() < MIN_OPTIONS {
            let mut err = ValidationError::new("question_options");
            err.message = Some(
                format!(
                    "question requires at least {} options (got {})",
                    MIN_OPTIONS,
                    self.options.len()
                )
                .into(),
            );
            errors.add("options", err);
        }

        if self.correct_answer_index >= self.options.len() {
            let mut err = ValidationError::new("correct_answer_index");
            err.message = Some(
                format!(
                    "correct answer index {} is out of range for {} options",
                    self.correct_answer_index,
                    self.options.len()
                )
                .into(),
            );
            errors.add("correct_answer_index", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Quiz definition returned to authoring tools.
///
/// This is the admin-facing view and keeps the answer keys; only broadcast
/// payloads strip them.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuizSummary {
    /// Join code of the quiz.
    pub quiz_code: String,
    /// Display title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Session settings.
    pub settings: QuizSettingsSummary,
    /// Questions with their answer keys.
    pub questions: Vec<QuestionSummary>,
}

/// Stored session settings.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuizSettingsSummary {
    /// Advertised number of questions.
    pub num_questions: usize,
    /// Seconds per question.
    pub time_per_question: u32,
    /// Points per correct answer.
    pub points_per_question: u32,
}

/// Stored question including its answer key.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionSummary {
    /// Question text.
    pub text: String,
    /// Candidate answers.
    pub options: Vec<String>,
    /// Index of the correct answer.
    pub correct_answer_index: usize,
}

impl From<UpsertQuizRequest> for QuizEntity {
    fn from(value: UpsertQuizRequest) -> Self {
        Self {
            quiz_code: value.quiz_code,
            title: value.title,
            description: value.description,
            settings: QuizSettingsEntity {
                num_questions: value.settings.num_questions,
                time_per_question: value.settings.time_per_question,
                points_per_question: value.settings.points_per_question,
            },
            questions: value
                .questions
                .into_iter()
                .map(|question| QuestionEntity {
                    text: question.text,
                    options: question.options,
                    correct_answer_index: question.correct_answer_index,
                })
                .collect(),
        }
    }
}

impl From<QuizEntity> for QuizSummary {
    fn from(value: QuizEntity) -> Self {
        Self {
            quiz_code: value.quiz_code,
            title: value.title,
            description: value.description,
            settings: QuizSettingsSummary {
                num_questions: value.settings.num_questions,
                time_per_question: value.settings.time_per_question,
                points_per_question: value.settings.points_per_question,
            },
            questions: value
                .questions
                .into_iter()
                .map(|question| QuestionSummary {
                    text: question.text,
                    options: question.options,
                    correct_answer_index: question.correct_answer_index,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct: usize) -> QuestionInput {
        QuestionInput {
            text: "Q".into(),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            correct_answer_index: correct,
        }
    }

    #[test]
    fn question_with_enough_options_validates() {
        assert!(question(4, 3).validate().is_ok());
    }

    #[test]
    fn question_with_too_few_options_is_rejected() {
        assert!(question(3, 0).validate().is_err());
    }

    #[test]
    fn out_of_range_answer_key_is_rejected() {
        assert!(question(4, 4).validate().is_err());
    }
}
