use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use quiz_core::model::{AttemptScore, FileId, Question, Quiz, QuizId};
use storage::repository::{AttemptRepository, QuizRepository};

use crate::error::CatalogError;

/// How many past attempts are scanned for the last completed one.
const RECENT_ATTEMPTS: u32 = 20;

/// Row of the quiz list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizListItem {
    pub quiz: Quiz,
    pub last_score: Option<AttemptScore>,
    pub last_completed_at: Option<DateTime<Utc>>,
}

/// Read/write access to the quizzes of a study file.
#[derive(Clone)]
pub struct QuizCatalogService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl QuizCatalogService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>, attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { quizzes, attempts }
    }

    /// List quizzes for a file, each with its most recent completed score.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if repository queries fail.
    pub async fn list_quizzes(
        &self,
        file_id: &FileId,
        limit: u32,
    ) -> Result<Vec<QuizListItem>, CatalogError> {
        let quizzes = self.quizzes.list_quizzes(file_id, limit).await?;
        let mut items = Vec::with_capacity(quizzes.len());
        for quiz in quizzes {
            let attempts = self.attempts.list_attempts(quiz.id(), RECENT_ATTEMPTS).await?;
            let last = attempts.into_iter().find(|a| a.is_completed());
            items.push(QuizListItem {
                last_score: last.as_ref().and_then(|a| a.score()),
                last_completed_at: last.as_ref().and_then(|a| a.completed_at()),
                quiz,
            });
        }
        Ok(items)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the quiz is missing or the query fails.
    pub async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, CatalogError> {
        Ok(self.quizzes.get_quiz(id).await?)
    }

    /// Store a quiz together with its questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if a question is missing or the write fails.
    pub async fn create_quiz(&self, quiz: &Quiz, questions: &[Question]) -> Result<(), CatalogError> {
        self.quizzes.upsert_quiz(quiz, questions).await?;
        info!(quiz_id = %quiz.id(), file_id = %quiz.file_id(), "quiz saved");
        Ok(())
    }
}
