use std::cell::Cell;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use quiz_core::model::{AttemptId, AttemptReport, FileId, Question, QuestionId, QuizId};

use super::state::{AttemptProgress, AttemptState};
use super::store::QuizStore;
use crate::Clock;
use crate::error::StoreError;
use crate::navigation::{Navigator, QuizRoute};
use crate::notify::{Notification, Notifier};

/// Which results pane is showing once an attempt is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsPane {
    Summary,
    Detail,
}

/// Lifecycle of one attempt as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Uninitialized,
    InProgress,
    /// `complete_quiz` is in flight.
    Completing,
    Completed(ResultsPane),
}

/// What the results page should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Summary(AttemptReport),
    Detail(AttemptReport),
    /// The store holds no completed attempt matching the route; the page
    /// must not render results.
    Redirect,
}

/// Store call that failed on behalf of a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowFailure {
    Start,
    Submit,
    Complete,
}

impl FlowFailure {
    fn notification(self) -> Notification {
        let description = match self {
            Self::Start => "Failed to start quiz. Please try again.",
            Self::Submit => "Failed to submit answer. Please try again.",
            Self::Complete => "Failed to complete quiz. Please try again.",
        };
        Notification::error("Error", description)
    }
}

/// Drives one quiz attempt: start, answer, finish, review, retry or leave.
///
/// Every store failure is turned into a notification; nothing is returned
/// to the caller as an error. Navigation and notifications are the only
/// side effects beyond store calls.
pub struct AttemptFlowController<S: ?Sized, N, T> {
    file_id: FileId,
    quiz_id: QuizId,
    /// Attempt named by the results route, if this controller serves one.
    results_for: Option<AttemptId>,
    store: Arc<S>,
    navigator: N,
    notifier: T,
    clock: Clock,
    phase: Cell<FlowPhase>,
    shown_at: Cell<DateTime<Utc>>,
}

impl<S, N, T> AttemptFlowController<S, N, T>
where
    S: QuizStore + ?Sized,
    N: Navigator,
    T: Notifier,
{
    #[must_use]
    pub fn new(file_id: FileId, quiz_id: QuizId, store: Arc<S>, navigator: N, notifier: T) -> Self {
        let clock = Clock::default_clock();
        Self {
            file_id,
            quiz_id,
            results_for: None,
            store,
            navigator,
            notifier,
            clock,
            phase: Cell::new(FlowPhase::Uninitialized),
            shown_at: Cell::new(clock.now()),
        }
    }

    /// Controller for the results page of `attempt_id`: starts in the
    /// summary pane and only shows that attempt.
    #[must_use]
    pub fn for_results(
        file_id: FileId,
        quiz_id: QuizId,
        attempt_id: AttemptId,
        store: Arc<S>,
        navigator: N,
        notifier: T,
    ) -> Self {
        let mut controller = Self::new(file_id, quiz_id, store, navigator, notifier);
        controller.results_for = Some(attempt_id);
        controller
            .phase
            .set(FlowPhase::Completed(ResultsPane::Summary));
        controller
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.shown_at.set(clock.now());
        self
    }

    #[must_use]
    pub fn phase(&self) -> FlowPhase {
        self.phase.get()
    }

    #[must_use]
    pub fn file_id(&self) -> &FileId {
        &self.file_id
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn state(&self) -> AttemptState {
        self.store.snapshot()
    }

    #[must_use]
    pub fn progress(&self) -> Option<AttemptProgress> {
        self.store.snapshot().progress()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<Question> {
        self.store.snapshot().current_question().cloned()
    }

    fn fail(&self, failure: FlowFailure) {
        self.notifier.notify(failure.notification());
    }

    fn mark_shown(&self) {
        self.shown_at.set(self.clock.now());
    }

    fn leave_to_quiz_list(&self) {
        self.store.reset();
        self.phase.set(FlowPhase::Uninitialized);
        self.navigator.navigate(QuizRoute::quiz_list(&self.file_id));
    }

    /// Start (or resume) the attempt for this controller's quiz.
    ///
    /// An active attempt for the same quiz already in the store is resumed
    /// without a store call. On failure the user is notified and sent back
    /// to the quiz list with the store cleared.
    pub async fn initialize(&self) -> FlowPhase {
        if self.phase.get() != FlowPhase::Uninitialized {
            return self.phase.get();
        }

        let snapshot = self.store.snapshot();
        let resumable = snapshot
            .current_attempt
            .as_ref()
            .is_some_and(|a| a.quiz_id() == &self.quiz_id && !a.is_completed());
        if resumable {
            debug!(quiz_id = %self.quiz_id, "resuming active attempt");
            self.phase.set(FlowPhase::InProgress);
            self.mark_shown();
            return self.phase.get();
        }

        match self.store.start_quiz(&self.quiz_id).await {
            Ok(attempt) => {
                info!(quiz_id = %self.quiz_id, attempt_id = %attempt.id(), "attempt flow started");
                self.phase.set(FlowPhase::InProgress);
                self.mark_shown();
            }
            Err(err) => {
                warn!(quiz_id = %self.quiz_id, error = %err, "failed to start attempt");
                self.fail(FlowFailure::Start);
                self.leave_to_quiz_list();
            }
        }
        self.phase.get()
    }

    /// Record an answer. Returns whether the store accepted it.
    pub async fn submit_response(
        &self,
        question_id: &QuestionId,
        answer: &str,
        elapsed_secs: u32,
    ) -> bool {
        if self.phase.get() != FlowPhase::InProgress {
            debug!(phase = ?self.phase.get(), "submit ignored outside an active attempt");
            return false;
        }
        match self
            .store
            .submit_response(question_id, answer, elapsed_secs)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(question_id = %question_id, error = %err, "failed to submit answer");
                self.fail(FlowFailure::Submit);
                false
            }
        }
    }

    /// Answer the question under the cursor, timing it from when it was shown.
    pub async fn submit_answer(&self, answer: &str) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        let elapsed = self.clock.elapsed_secs_since(self.shown_at.get());
        self.submit_response(question.id(), answer, elapsed).await
    }

    /// Advance to the next question, or finish the attempt on the last one.
    pub async fn on_next(&self) -> FlowPhase {
        if self.phase.get() != FlowPhase::InProgress {
            return self.phase.get();
        }
        let snapshot = self.store.snapshot();
        if !snapshot.has_attempt() {
            return self.phase.get();
        }
        if !snapshot.is_last_question() {
            if self.store.advance_question() {
                self.mark_shown();
            }
            return self.phase.get();
        }

        self.phase.set(FlowPhase::Completing);
        match self.store.complete_quiz().await {
            Ok(attempt) => {
                self.phase.set(FlowPhase::Completed(ResultsPane::Summary));
                self.navigator.navigate(QuizRoute::results(
                    &self.file_id,
                    &self.quiz_id,
                    attempt.id(),
                ));
            }
            // The user already left this attempt; there is nothing to show.
            Err(StoreError::Superseded(attempt_id)) => {
                debug!(quiz_id = %self.quiz_id, attempt_id = %attempt_id, "completion superseded");
                self.phase.set(FlowPhase::Uninitialized);
            }
            Err(err) => {
                warn!(quiz_id = %self.quiz_id, error = %err, "failed to complete attempt");
                self.phase.set(FlowPhase::InProgress);
                self.fail(FlowFailure::Complete);
            }
        }
        self.phase.get()
    }

    /// Step back one question. No store I/O.
    pub fn on_previous(&self) -> bool {
        if self.phase.get() != FlowPhase::InProgress {
            return false;
        }
        let moved = self.store.previous_question();
        if moved {
            self.mark_shown();
        }
        moved
    }

    pub fn on_view_answers(&self) {
        if let FlowPhase::Completed(_) = self.phase.get() {
            self.phase.set(FlowPhase::Completed(ResultsPane::Detail));
        }
    }

    pub fn on_back(&self) {
        if self.phase.get() == FlowPhase::Completed(ResultsPane::Detail) {
            self.phase.set(FlowPhase::Completed(ResultsPane::Summary));
        }
    }

    /// Open a fresh attempt of the same quiz and go to the attempt page.
    pub async fn on_retry(&self) -> FlowPhase {
        if !matches!(self.phase.get(), FlowPhase::Completed(_)) {
            return self.phase.get();
        }
        match self.store.start_quiz(&self.quiz_id).await {
            Ok(attempt) => {
                info!(quiz_id = %self.quiz_id, attempt_id = %attempt.id(), "attempt retried");
                self.phase.set(FlowPhase::InProgress);
                self.mark_shown();
                self.navigator
                    .navigate(QuizRoute::attempt(&self.file_id, &self.quiz_id));
            }
            Err(err) => {
                warn!(quiz_id = %self.quiz_id, error = %err, "failed to restart attempt");
                self.fail(FlowFailure::Start);
                self.leave_to_quiz_list();
            }
        }
        self.phase.get()
    }

    /// Drop the attempt and go back to the quiz list.
    pub fn on_return(&self) {
        self.leave_to_quiz_list();
    }

    /// Results to render, without side effects.
    ///
    /// Only a completed attempt of this controller's quiz is shown, and on a
    /// results route only the attempt the route names.
    #[must_use]
    pub fn results_view(&self) -> ResultsView {
        let state = self.store.snapshot();
        let quiz_matches = state
            .current_quiz
            .as_ref()
            .is_some_and(|quiz| quiz.id() == &self.quiz_id);
        let attempt_matches = state.current_attempt.as_ref().is_some_and(|attempt| {
            attempt.is_completed()
                && self
                    .results_for
                    .as_ref()
                    .is_none_or(|wanted| attempt.id() == wanted)
        });
        if !(quiz_matches && attempt_matches) {
            return ResultsView::Redirect;
        }
        match state.report() {
            None => ResultsView::Redirect,
            Some(report) => match self.phase.get() {
                FlowPhase::Completed(ResultsPane::Detail) => ResultsView::Detail(report),
                _ => ResultsView::Summary(report),
            },
        }
    }

    /// Like [`Self::results_view`], but redirects to the quiz list when there
    /// is nothing to show.
    pub fn guard_results(&self) -> ResultsView {
        let view = self.results_view();
        if view == ResultsView::Redirect {
            debug!(quiz_id = %self.quiz_id, "no matching completed attempt; redirecting");
            self.navigator.navigate(QuizRoute::quiz_list(&self.file_id));
        }
        view
    }
}
