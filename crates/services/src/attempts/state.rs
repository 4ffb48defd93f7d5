use quiz_core::model::{Attempt, AttemptReport, Question, Quiz, Responses};

/// In-memory view of the attempt currently being taken.
///
/// `AttemptStore` owns the live copy; callers only ever see clones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttemptState {
    pub current_quiz: Option<Quiz>,
    pub current_attempt: Option<Attempt>,
    pub questions: Vec<Question>,
    pub responses: Responses,
    pub current_question_index: usize,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Position within an attempt, for headers and progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub is_last: bool,
}

impl AttemptProgress {
    /// Share of answered questions, in whole percent.
    #[must_use]
    pub fn answered_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.answered.min(self.total) * 100 / self.total;
        u32::try_from(pct).unwrap_or(100)
    }
}

impl AttemptState {
    #[must_use]
    pub fn has_attempt(&self) -> bool {
        self.current_attempt.is_some()
    }

    /// The question under the cursor, if an attempt is running.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_attempt.as_ref()?;
        self.questions.get(self.current_question_index)
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current_question_index + 1 >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> Option<AttemptProgress> {
        self.current_question()?;
        Some(AttemptProgress {
            position: self.current_question_index + 1,
            total: self.questions.len(),
            answered: self
                .questions
                .iter()
                .filter(|q| self.responses.contains(q.id()))
                .count(),
            is_last: self.is_last_question(),
        })
    }

    /// Results for the held attempt; `None` when quiz or attempt is missing.
    #[must_use]
    pub fn report(&self) -> Option<AttemptReport> {
        let quiz = self.current_quiz.as_ref()?;
        let attempt = self.current_attempt.as_ref()?;
        Some(AttemptReport::build(
            quiz,
            attempt,
            &self.questions,
            &self.responses,
        ))
    }
}
