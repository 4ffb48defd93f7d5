use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use quiz_core::model::{Attempt, AttemptId, AttemptScore, QuestionId, QuizId, Response, Responses};
use storage::repository::{AttemptRepository, QuizRepository, ResponseRepository};

use super::state::AttemptState;
use crate::Clock;
use crate::error::StoreError;

/// Stateful holder of the attempt being taken.
///
/// Async operations resolve once their repository work is done. On failure
/// the quiz, attempt, questions and responses are left as they were and the
/// error message is recorded in [`AttemptState::error`].
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Clone of the current state.
    fn snapshot(&self) -> AttemptState;

    /// Load the quiz and open a fresh attempt for it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the quiz cannot be loaded, has no questions, or
    /// the attempt cannot be persisted.
    async fn start_quiz(&self, quiz_id: &QuizId) -> Result<Attempt, StoreError>;

    /// Grade and record an answer for a question of the active attempt.
    /// Submitting twice for the same question keeps the last answer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when there is no active attempt, the question is
    /// foreign to the quiz, or persistence fails.
    async fn submit_response(
        &self,
        question_id: &QuestionId,
        answer: &str,
        elapsed_secs: u32,
    ) -> Result<(), StoreError>;

    /// Score and close the active attempt.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when there is no active attempt or persistence
    /// fails, and `StoreError::Superseded` when the attempt was reset or
    /// replaced before the completion was stored.
    async fn complete_quiz(&self) -> Result<Attempt, StoreError>;

    /// Drop everything back to the empty state.
    fn reset(&self);

    /// Move the cursor forward. Returns false when already at the end.
    fn advance_question(&self) -> bool;

    /// Move the cursor back. Returns false when already at the start.
    fn previous_question(&self) -> bool;
}

/// Repository-backed [`QuizStore`]. Clones share the same state.
#[derive(Clone)]
pub struct AttemptStore {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
    responses: Arc<dyn ResponseRepository>,
    shuffle_questions: bool,
    state: Arc<Mutex<AttemptState>>,
}

impl AttemptStore {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
        responses: Arc<dyn ResponseRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            attempts,
            responses,
            shuffle_questions: false,
            state: Arc::new(Mutex::new(AttemptState::default())),
        }
    }

    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle_questions: bool) -> Self {
        self.shuffle_questions = shuffle_questions;
        self
    }

    fn lock(&self) -> MutexGuard<'_, AttemptState> {
        // State is replaced wholesale, so a poisoned guard still holds a
        // consistent value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut state = self.lock();
        state.is_loading = true;
        state.error = None;
    }

    fn finish<T>(&self, op: &'static str, result: Result<T, StoreError>) -> Result<T, StoreError> {
        // The state belongs to whatever replaced the attempt; leave it alone.
        if let Err(err @ StoreError::Superseded(_)) = &result {
            debug!(op, error = %err, "stale result dropped");
            return result;
        }
        let mut state = self.lock();
        state.is_loading = false;
        if let Err(err) = &result {
            warn!(op, error = %err, "quiz store operation failed");
            state.error = Some(err.to_string());
        }
        result
    }

    async fn open_attempt(&self, quiz_id: &QuizId) -> Result<Attempt, StoreError> {
        let quiz = self.quizzes.get_quiz(quiz_id).await?;
        let mut questions = self.quizzes.get_questions(quiz_id).await?;
        if questions.is_empty() {
            return Err(StoreError::EmptyQuiz(quiz_id.clone()));
        }
        if self.shuffle_questions {
            questions.shuffle(&mut rand::rng());
        }

        let attempt = Attempt::start(AttemptId::generate(), quiz_id.clone(), self.clock.now());
        self.attempts.insert_attempt(&attempt).await?;

        *self.lock() = AttemptState {
            current_quiz: Some(quiz),
            current_attempt: Some(attempt.clone()),
            questions,
            responses: Responses::new(),
            current_question_index: 0,
            is_loading: true,
            error: None,
        };
        info!(quiz_id = %quiz_id, attempt_id = %attempt.id(), "attempt started");
        Ok(attempt)
    }

    async fn record_response(
        &self,
        question_id: &QuestionId,
        answer: &str,
        elapsed_secs: u32,
    ) -> Result<(), StoreError> {
        let (attempt_id, response) = {
            let state = self.lock();
            let attempt = active_attempt(&state)?;
            let question = state
                .questions
                .iter()
                .find(|q| q.id() == question_id)
                .ok_or_else(|| StoreError::UnknownQuestion(question_id.clone()))?;
            let response = Response::new(
                question_id.clone(),
                answer,
                elapsed_secs,
                question.is_correct(answer),
            );
            (attempt.id().clone(), response)
        };

        self.responses
            .upsert_response(&attempt_id, &response)
            .await?;

        let mut state = self.lock();
        // A reset or restart while the write was in flight makes it stale.
        if state
            .current_attempt
            .as_ref()
            .is_some_and(|a| a.id() == &attempt_id)
        {
            debug!(
                attempt_id = %attempt_id,
                question_id = %question_id,
                correct = response.is_correct,
                "response recorded"
            );
            state.responses.record(response);
        }
        Ok(())
    }

    async fn close_attempt(&self) -> Result<Attempt, StoreError> {
        let (attempt, score) = {
            let state = self.lock();
            let attempt = active_attempt(&state)?.clone();
            let total = u32::try_from(state.questions.len()).unwrap_or(u32::MAX);
            let correct = u32::try_from(
                state
                    .questions
                    .iter()
                    .filter(|q| state.responses.get(q.id()).is_some_and(|r| r.is_correct))
                    .count(),
            )
            .unwrap_or(u32::MAX);
            (attempt, AttemptScore::clamped(correct, total))
        };

        let completed = attempt.completed(self.clock.now(), score)?;
        self.attempts.save_attempt(&completed).await?;

        let mut state = self.lock();
        if !state
            .current_attempt
            .as_ref()
            .is_some_and(|a| a.id() == completed.id())
        {
            return Err(StoreError::Superseded(completed.id().clone()));
        }
        state.current_attempt = Some(completed.clone());
        info!(
            attempt_id = %completed.id(),
            correct = score.correct(),
            total = score.total(),
            "attempt completed"
        );
        Ok(completed)
    }
}

fn active_attempt(state: &AttemptState) -> Result<&Attempt, StoreError> {
    let attempt = state
        .current_attempt
        .as_ref()
        .ok_or(StoreError::NoActiveAttempt)?;
    if attempt.is_completed() {
        return Err(StoreError::AttemptCompleted(attempt.id().clone()));
    }
    Ok(attempt)
}

#[async_trait]
impl QuizStore for AttemptStore {
    fn snapshot(&self) -> AttemptState {
        self.lock().clone()
    }

    async fn start_quiz(&self, quiz_id: &QuizId) -> Result<Attempt, StoreError> {
        self.begin();
        let result = self.open_attempt(quiz_id).await;
        self.finish("start_quiz", result)
    }

    async fn submit_response(
        &self,
        question_id: &QuestionId,
        answer: &str,
        elapsed_secs: u32,
    ) -> Result<(), StoreError> {
        self.begin();
        let result = self.record_response(question_id, answer, elapsed_secs).await;
        self.finish("submit_response", result)
    }

    async fn complete_quiz(&self) -> Result<Attempt, StoreError> {
        self.begin();
        let result = self.close_attempt().await;
        self.finish("complete_quiz", result)
    }

    fn reset(&self) {
        *self.lock() = AttemptState::default();
        debug!("attempt state reset");
    }

    fn advance_question(&self) -> bool {
        let mut state = self.lock();
        if state.current_attempt.is_none()
            || state.current_question_index + 1 >= state.questions.len()
        {
            return false;
        }
        state.current_question_index += 1;
        true
    }

    fn previous_question(&self) -> bool {
        let mut state = self.lock();
        if state.current_attempt.is_none() || state.current_question_index == 0 {
            return false;
        }
        state.current_question_index -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerFormat, FileId, Question, Quiz};
    use quiz_core::time::fixed_clock;
    use storage::repository::{Storage, StorageError};

    async fn seeded_store(question_count: usize) -> (AttemptStore, QuizId) {
        let storage = Storage::in_memory();
        let attempts = Arc::clone(&storage.attempts);
        seeded_store_with(storage, attempts, question_count).await
    }

    /// Attempt repository whose saves yield once before reaching storage.
    struct YieldingSaves(Arc<dyn AttemptRepository>);

    #[async_trait]
    impl AttemptRepository for YieldingSaves {
        async fn insert_attempt(&self, attempt: &Attempt) -> Result<(), StorageError> {
            self.0.insert_attempt(attempt).await
        }

        async fn save_attempt(&self, attempt: &Attempt) -> Result<(), StorageError> {
            tokio::task::yield_now().await;
            self.0.save_attempt(attempt).await
        }

        async fn get_attempt(&self, id: &AttemptId) -> Result<Attempt, StorageError> {
            self.0.get_attempt(id).await
        }

        async fn list_attempts(
            &self,
            quiz_id: &QuizId,
            limit: u32,
        ) -> Result<Vec<Attempt>, StorageError> {
            self.0.list_attempts(quiz_id, limit).await
        }
    }

    async fn seeded_store_with(
        storage: Storage,
        attempts: Arc<dyn AttemptRepository>,
        question_count: usize,
    ) -> (AttemptStore, QuizId) {
        let questions: Vec<Question> = (1..=question_count)
            .map(|n| {
                Question::new(
                    QuestionId::new(format!("q1-{n}")).unwrap(),
                    format!("Question {n}"),
                    AnswerFormat::ShortAnswer,
                    format!("answer {n}"),
                    None,
                )
                .unwrap()
            })
            .collect();
        let quiz = Quiz::new(
            QuizId::new("q1").unwrap(),
            FileId::new("f1").unwrap(),
            "Quiz",
            None,
            questions.iter().map(|q| q.id().clone()).collect(),
        )
        .unwrap();
        storage.quizzes.upsert_quiz(&quiz, &questions).await.unwrap();
        let store = AttemptStore::new(
            fixed_clock(),
            Arc::clone(&storage.quizzes),
            attempts,
            Arc::clone(&storage.responses),
        );
        (store, quiz.id().clone())
    }

    #[tokio::test]
    async fn start_replaces_state_and_clears_loading() {
        let (store, quiz_id) = seeded_store(2).await;
        let attempt = store.start_quiz(&quiz_id).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.current_attempt.as_ref(), Some(&attempt));
        assert_eq!(state.questions.len(), 2);
        assert_eq!(state.current_question_index, 0);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn start_failure_keeps_state_and_records_error() {
        let (store, _) = seeded_store(1).await;
        let err = store
            .start_quiz(&QuizId::new("missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));

        let state = store.snapshot();
        assert!(state.current_attempt.is_none());
        assert!(!state.is_loading);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn submit_grades_and_overwrites_per_question() {
        let (store, quiz_id) = seeded_store(2).await;
        store.start_quiz(&quiz_id).await.unwrap();
        let q = QuestionId::new("q1-1").unwrap();

        store.submit_response(&q, "wrong", 4).await.unwrap();
        store.submit_response(&q, " Answer 1 ", 9).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.responses.len(), 1);
        let response = state.responses.get(&q).unwrap();
        assert!(response.is_correct);
        assert_eq!(response.time_spent_secs, 9);
    }

    #[tokio::test]
    async fn submit_rejects_foreign_question_and_missing_attempt() {
        let (store, quiz_id) = seeded_store(1).await;
        let q = QuestionId::new("q1-1").unwrap();
        assert!(matches!(
            store.submit_response(&q, "x", 1).await,
            Err(StoreError::NoActiveAttempt)
        ));

        store.start_quiz(&quiz_id).await.unwrap();
        assert!(matches!(
            store
                .submit_response(&QuestionId::new("other").unwrap(), "x", 1)
                .await,
            Err(StoreError::UnknownQuestion(_))
        ));
    }

    #[tokio::test]
    async fn complete_scores_and_blocks_further_answers() {
        let (store, quiz_id) = seeded_store(2).await;
        store.start_quiz(&quiz_id).await.unwrap();
        store
            .submit_response(&QuestionId::new("q1-1").unwrap(), "answer 1", 3)
            .await
            .unwrap();

        let done = store.complete_quiz().await.unwrap();
        let score = done.score().unwrap();
        assert_eq!((score.correct(), score.total()), (1, 2));
        assert!(store.snapshot().current_attempt.unwrap().is_completed());

        assert!(matches!(
            store
                .submit_response(&QuestionId::new("q1-2").unwrap(), "answer 2", 1)
                .await,
            Err(StoreError::AttemptCompleted(_))
        ));
        assert!(matches!(
            store.complete_quiz().await,
            Err(StoreError::AttemptCompleted(_))
        ));
    }

    #[tokio::test]
    async fn cursor_moves_are_bounded() {
        let (store, quiz_id) = seeded_store(2).await;
        assert!(!store.advance_question());

        store.start_quiz(&quiz_id).await.unwrap();
        assert!(!store.previous_question());
        assert!(store.advance_question());
        assert!(!store.advance_question());
        assert_eq!(store.snapshot().current_question_index, 1);
        assert!(store.previous_question());
        assert_eq!(store.snapshot().current_question_index, 0);
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let (store, quiz_id) = seeded_store(1).await;
        store.start_quiz(&quiz_id).await.unwrap();
        store.reset();
        assert_eq!(store.snapshot(), AttemptState::default());
    }

    #[tokio::test]
    async fn completion_after_reset_is_superseded() {
        let storage = Storage::in_memory();
        let attempts: Arc<dyn AttemptRepository> =
            Arc::new(YieldingSaves(Arc::clone(&storage.attempts)));
        let (store, quiz_id) = seeded_store_with(storage, attempts, 1).await;
        let attempt = store.start_quiz(&quiz_id).await.unwrap();

        let (result, ()) = tokio::join!(store.complete_quiz(), async { store.reset() });

        let err = result.unwrap_err();
        assert!(matches!(&err, StoreError::Superseded(id) if id == attempt.id()));
        assert_eq!(store.snapshot(), AttemptState::default());
    }

    #[tokio::test]
    async fn shuffled_start_keeps_every_question() {
        let (store, quiz_id) = seeded_store(5).await;
        let store = store.with_shuffle_questions(true);
        store.start_quiz(&quiz_id).await.unwrap();

        let mut ids: Vec<String> = store
            .snapshot()
            .questions
            .iter()
            .map(|q| q.id().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, ["q1-1", "q1-2", "q1-3", "q1-4", "q1-5"]);
    }
}
