use async_trait::async_trait;
use quiz_core::model::{
    Attempt, AttemptId, FileId, Question, QuestionId, Quiz, QuizId, Response, Responses,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Question bank access: quizzes and their ordered questions.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist a quiz together with its questions, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a question id is missing from `questions`,
    /// or other storage errors.
    async fn upsert_quiz(&self, quiz: &Quiz, questions: &[Question]) -> Result<(), StorageError>;

    /// Fetch a quiz by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError>;

    /// Fetch the questions of a quiz in quiz order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the quiz or any question is missing.
    async fn get_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, StorageError>;

    /// List quizzes generated from a study file, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_quizzes(&self, file_id: &FileId, limit: u32) -> Result<Vec<Quiz>, StorageError>;
}

#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Insert a freshly started attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is already taken.
    async fn insert_attempt(&self, attempt: &Attempt) -> Result<(), StorageError>;

    /// Overwrite an existing attempt (status, completion time, score).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the attempt was never inserted.
    async fn save_attempt(&self, attempt: &Attempt) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_attempt(&self, id: &AttemptId) -> Result<Attempt, StorageError>;

    /// Most recent attempts for a quiz, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_attempts(&self, quiz_id: &QuizId, limit: u32)
    -> Result<Vec<Attempt>, StorageError>;
}

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Store a response, replacing any earlier one for the same question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the attempt does not exist.
    async fn upsert_response(
        &self,
        attempt_id: &AttemptId,
        response: &Response,
    ) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_responses(&self, attempt_id: &AttemptId) -> Result<Responses, StorageError>;
}

#[derive(Default)]
struct MemoryState {
    quizzes: HashMap<QuizId, Quiz>,
    questions: HashMap<QuestionId, Question>,
    attempts: HashMap<AttemptId, Attempt>,
    responses: HashMap<AttemptId, Responses>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &Quiz, questions: &[Question]) -> Result<(), StorageError> {
        if quiz
            .question_ids()
            .iter()
            .any(|id| !questions.iter().any(|q| q.id() == id))
        {
            return Err(StorageError::Conflict);
        }
        let mut guard = self.lock()?;
        for question in questions {
            guard.questions.insert(question.id().clone(), question.clone());
        }
        guard.quizzes.insert(quiz.id().clone(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let guard = self.lock()?;
        guard.quizzes.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn get_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, StorageError> {
        let guard = self.lock()?;
        let quiz = guard.quizzes.get(quiz_id).ok_or(StorageError::NotFound)?;
        quiz.question_ids()
            .iter()
            .map(|id| guard.questions.get(id).cloned().ok_or(StorageError::NotFound))
            .collect()
    }

    async fn list_quizzes(&self, file_id: &FileId, limit: u32) -> Result<Vec<Quiz>, StorageError> {
        let guard = self.lock()?;
        let mut quizzes: Vec<Quiz> = guard
            .quizzes
            .values()
            .filter(|quiz| quiz.file_id() == file_id)
            .cloned()
            .collect();
        quizzes.sort_by(|a, b| a.title().cmp(b.title()).then_with(|| a.id().cmp(b.id())));
        quizzes.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(quizzes)
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn insert_attempt(&self, attempt: &Attempt) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.quizzes.contains_key(attempt.quiz_id()) {
            return Err(StorageError::NotFound);
        }
        if guard.attempts.contains_key(attempt.id()) {
            return Err(StorageError::Conflict);
        }
        guard.attempts.insert(attempt.id().clone(), attempt.clone());
        Ok(())
    }

    async fn save_attempt(&self, attempt: &Attempt) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let slot = guard
            .attempts
            .get_mut(attempt.id())
            .ok_or(StorageError::NotFound)?;
        *slot = attempt.clone();
        Ok(())
    }

    async fn get_attempt(&self, id: &AttemptId) -> Result<Attempt, StorageError> {
        let guard = self.lock()?;
        guard.attempts.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_attempts(
        &self,
        quiz_id: &QuizId,
        limit: u32,
    ) -> Result<Vec<Attempt>, StorageError> {
        let guard = self.lock()?;
        let mut attempts: Vec<Attempt> = guard
            .attempts
            .values()
            .filter(|a| a.quiz_id() == quiz_id)
            .cloned()
            .collect();
        attempts.sort_by(|a, b| {
            b.started_at()
                .cmp(&a.started_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        attempts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(attempts)
    }
}

#[async_trait]
impl ResponseRepository for InMemoryRepository {
    async fn upsert_response(
        &self,
        attempt_id: &AttemptId,
        response: &Response,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.attempts.contains_key(attempt_id) {
            return Err(StorageError::NotFound);
        }
        guard
            .responses
            .entry(attempt_id.clone())
            .or_default()
            .record(response.clone());
        Ok(())
    }

    async fn list_responses(&self, attempt_id: &AttemptId) -> Result<Responses, StorageError> {
        let guard = self.lock()?;
        Ok(guard.responses.get(attempt_id).cloned().unwrap_or_default())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub responses: Arc<dyn ResponseRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptRepository> = Arc::new(repo.clone());
        let responses: Arc<dyn ResponseRepository> = Arc::new(repo);
        Self {
            quizzes,
            attempts,
            responses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{AnswerFormat, AttemptScore};
    use quiz_core::time::fixed_now;

    fn qid(raw: &str) -> QuestionId {
        QuestionId::new(raw).unwrap()
    }

    fn build_quiz(id: &str, title: &str, question_ids: &[&str]) -> (Quiz, Vec<Question>) {
        let questions: Vec<Question> = question_ids
            .iter()
            .map(|raw| {
                Question::new(qid(raw), format!("Prompt {raw}"), AnswerFormat::ShortAnswer, "x", None)
                    .unwrap()
            })
            .collect();
        let quiz = Quiz::new(
            QuizId::new(id).unwrap(),
            FileId::new("f1").unwrap(),
            title,
            None,
            questions.iter().map(|q| q.id().clone()).collect(),
        )
        .unwrap();
        (quiz, questions)
    }

    #[tokio::test]
    async fn questions_come_back_in_quiz_order() {
        let repo = InMemoryRepository::new();
        let (quiz, mut questions) = build_quiz("q1", "Quiz", &["b", "a", "c"]);
        questions.reverse();
        repo.upsert_quiz(&quiz, &questions).await.unwrap();

        let fetched = repo.get_questions(quiz.id()).await.unwrap();
        let ids: Vec<_> = fetched.iter().map(|q| q.id().as_str().to_string()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn upsert_quiz_requires_every_question() {
        let repo = InMemoryRepository::new();
        let (quiz, questions) = build_quiz("q1", "Quiz", &["a", "b"]);
        let err = repo.upsert_quiz(&quiz, &questions[..1]).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn list_quizzes_filters_by_file_and_sorts_by_title() {
        let repo = InMemoryRepository::new();
        let (zeta, zq) = build_quiz("q2", "Zeta", &["z1"]);
        let (alpha, aq) = build_quiz("q1", "Alpha", &["a1"]);
        repo.upsert_quiz(&zeta, &zq).await.unwrap();
        repo.upsert_quiz(&alpha, &aq).await.unwrap();

        let listed = repo.list_quizzes(&FileId::new("f1").unwrap(), 10).await.unwrap();
        let titles: Vec<_> = listed.iter().map(Quiz::title).collect();
        assert_eq!(titles, vec!["Alpha", "Zeta"]);

        let other = repo.list_quizzes(&FileId::new("f2").unwrap(), 10).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn attempts_insert_once_and_save_updates() {
        let repo = InMemoryRepository::new();
        let (quiz, questions) = build_quiz("q1", "Quiz", &["a"]);
        repo.upsert_quiz(&quiz, &questions).await.unwrap();

        let attempt = Attempt::start(AttemptId::new("a1").unwrap(), quiz.id().clone(), fixed_now());
        repo.insert_attempt(&attempt).await.unwrap();
        assert!(matches!(
            repo.insert_attempt(&attempt).await.unwrap_err(),
            StorageError::Conflict
        ));

        let done = attempt
            .completed(fixed_now() + Duration::minutes(1), AttemptScore::new(1, 1).unwrap())
            .unwrap();
        repo.save_attempt(&done).await.unwrap();
        let fetched = repo.get_attempt(attempt.id()).await.unwrap();
        assert!(fetched.is_completed());
    }

    #[tokio::test]
    async fn responses_upsert_per_question() {
        let repo = InMemoryRepository::new();
        let (quiz, questions) = build_quiz("q1", "Quiz", &["a"]);
        repo.upsert_quiz(&quiz, &questions).await.unwrap();
        let attempt_id = AttemptId::new("a1").unwrap();
        repo.insert_attempt(&Attempt::start(attempt_id.clone(), quiz.id().clone(), fixed_now()))
            .await
            .unwrap();

        repo.upsert_response(&attempt_id, &Response::new(qid("a"), "first", 3, false))
            .await
            .unwrap();
        repo.upsert_response(&attempt_id, &Response::new(qid("a"), "x", 8, true))
            .await
            .unwrap();

        let responses = repo.list_responses(&attempt_id).await.unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses.get(&qid("a")).unwrap().answer, "x");
    }

    #[tokio::test]
    async fn response_for_unknown_attempt_is_rejected() {
        let repo = InMemoryRepository::new();
        let err = repo
            .upsert_response(
                &AttemptId::new("ghost").unwrap(),
                &Response::new(qid("a"), "x", 1, true),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
