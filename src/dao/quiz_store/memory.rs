//! In-process quiz store used when no external authoring backend is wired in.

use dashmap::DashMap;
use futures::future::BoxFuture;
use std::sync::Arc;

use crate::dao::{models::QuizEntity, quiz_store::QuizStore, storage::StorageResult};

/// Quiz store backed by a process-local map.
#[derive(Default)]
pub struct MemoryQuizStore {
    quizzes: Arc<DashMap<String, QuizEntity>>,
}

impl MemoryQuizStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuizStore for MemoryQuizStore {
    fn save_quiz(&self, quiz: QuizEntity) -> BoxFuture<'static, StorageResult<()>> {
        let quizzes = self.quizzes.clone();
        Box::pin(async move {
            quizzes.insert(quiz.quiz_code.clone(), quiz);
            Ok(())
        })
    }

    fn find_quiz(&self, code: &str) -> BoxFuture<'static, StorageResult<Option<QuizEntity>>> {
        let quizzes = self.quizzes.clone();
        let code = code.to_string();
        Box::pin(async move { Ok(quizzes.get(&code).map(|entry| entry.value().clone())) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::QuizSettingsEntity;

    fn sample_quiz(code: &str) -> QuizEntity {
        QuizEntity {
            quiz_code: code.to_string(),
            title: "Sample".into(),
            description: None,
            settings: QuizSettingsEntity {
                num_questions: 0,
                time_per_question: 30,
                points_per_question: 1,
            },
            questions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let store = MemoryQuizStore::new();
        store.save_quiz(sample_quiz("AB12CD")).await.unwrap();

        let found = store.find_quiz("AB12CD").await.unwrap();
        assert_eq!(found.map(|q| q.title), Some("Sample".to_string()));
    }

    #[tokio::test]
    async fn find_unknown_code_returns_none() {
        let store = MemoryQuizStore::new();
        assert!(store.find_quiz("ZZ99ZZ").await.unwrap().is_none());
    }
}
