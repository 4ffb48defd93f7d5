//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AttemptError, AttemptId, QuestionId, QuizError, QuizId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizStore` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("no active attempt")]
    NoActiveAttempt,
    #[error("attempt {0} is already completed")]
    AttemptCompleted(AttemptId),
    #[error("quiz {0} has no questions")]
    EmptyQuiz(QuizId),
    #[error("question {0} is not part of the current quiz")]
    UnknownQuestion(QuestionId),
    /// The store was reset or restarted while the call was in flight.
    #[error("attempt {0} was replaced while the call was in flight")]
    Superseded(AttemptId),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizCatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
