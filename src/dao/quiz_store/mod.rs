//! Object-safe abstraction over the quiz persistence backend.

pub mod memory;

use futures::future::BoxFuture;

use crate::dao::{models::QuizEntity, storage::StorageResult};

/// Abstraction over the persistence layer for authored quizzes.
///
/// The session engine only ever calls [`QuizStore::find_quiz`] when a quiz is
/// started; everything else is authoring glue.
pub trait QuizStore: Send + Sync {
    /// Insert or replace the quiz stored under its code.
    fn save_quiz(&self, quiz: QuizEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch the quiz stored under `code`, if any.
    fn find_quiz(&self, code: &str) -> BoxFuture<'static, StorageResult<Option<QuizEntity>>>;
    /// Cheap probe used by the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
