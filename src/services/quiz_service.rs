//! Authoring glue in front of the quiz store collaborator.

use crate::{
    dao::{models::QuizEntity, quiz_store::QuizStore},
    dto::quiz::{QuizSummary, UpsertQuizRequest},
    error::ServiceError,
    state::SharedState,
};

/// Store or replace a quiz definition under its code.
///
/// Field-level validation happens at the route boundary; this only adds the
/// cross-field check the derive cannot express.
pub async fn upsert_quiz(
    state: &SharedState,
    request: UpsertQuizRequest,
) -> Result<QuizSummary, ServiceError> {
    if request.settings.num_questions > request.questions.len() {
        return Err(ServiceError::InvalidInput(format!(
            "settings advertise {} questions but only {} were provided",
            request.settings.num_questions,
            request.questions.len()
        )));
    }

    let entity: QuizEntity = request.into();
    let summary: QuizSummary = entity.clone().into();
    state.quiz_store().save_quiz(entity).await?;
    Ok(summary)
}

/// Fetch a stored quiz definition.
pub async fn fetch_quiz(state: &SharedState, code: &str) -> Result<QuizSummary, ServiceError> {
    let Some(quiz) = state.quiz_store().find_quiz(code).await? else {
        return Err(ServiceError::NotFound(format!("quiz `{code}` not found")));
    };
    Ok(quiz.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::quiz_store::memory::MemoryQuizStore,
        dto::quiz::{QuestionInput, QuizSettingsInput},
        state::AppState,
    };

    fn request() -> UpsertQuizRequest {
        UpsertQuizRequest {
            quiz_code: "AB12CD".into(),
            title: "Capitals".into(),
            description: None,
            settings: QuizSettingsInput {
                num_questions: 1,
                time_per_question: 20,
                points_per_question: 2,
            },
            questions: vec![QuestionInput {
                text: "Capital of France?".into(),
                options: vec!["Paris".into(), "Lyon".into(), "Nice".into(), "Lille".into()],
                correct_answer_index: 0,
            }],
        }
    }

    #[tokio::test]
    async fn upsert_then_fetch_round_trips() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryQuizStore::new()));

        let stored = upsert_quiz(&state, request()).await.unwrap();
        assert_eq!(stored.quiz_code, "AB12CD");

        let fetched = fetch_quiz(&state, "AB12CD").await.unwrap();
        assert_eq!(fetched.title, "Capitals");
        assert_eq!(fetched.questions.len(), 1);
    }

    #[tokio::test]
    async fn advertised_count_cannot_exceed_the_question_pool() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryQuizStore::new()));

        let mut oversold = request();
        oversold.settings.num_questions = 5;

        assert!(matches!(
            upsert_quiz(&state, oversold).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn fetch_unknown_quiz_is_not_found() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryQuizStore::new()));
        assert!(matches!(
            fetch_quiz(&state, "ZZ99ZZ").await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
