use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AttemptId, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("attempt {0} is already completed")]
    AlreadyCompleted(AttemptId),

    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score has {correct} correct answers out of {total}")]
    InvalidScore { correct: u32, total: u32 },

    #[error("invalid attempt status: {0}")]
    InvalidStatus(String),
}

/// Lifecycle of an attempt. Completed attempts are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Active,
    Completed,
}

impl AttemptStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AttemptStatus::Active => "active",
            AttemptStatus::Completed => "completed",
        }
    }

    /// # Errors
    ///
    /// Returns `AttemptError::InvalidStatus` for unknown values.
    pub fn parse(raw: &str) -> Result<Self, AttemptError> {
        match raw {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(AttemptError::InvalidStatus(other.to_string())),
        }
    }
}

/// Correct answers out of the number of questions in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptScore {
    correct: u32,
    total: u32,
}

impl AttemptScore {
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidScore` when `correct` exceeds `total`.
    pub fn new(correct: u32, total: u32) -> Result<Self, AttemptError> {
        if correct > total {
            return Err(AttemptError::InvalidScore { correct, total });
        }
        Ok(Self { correct, total })
    }

    /// Like `new`, but caps `correct` at `total` instead of failing.
    #[must_use]
    pub fn clamped(correct: u32, total: u32) -> Self {
        Self {
            correct: correct.min(total),
            total,
        }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whole-number percentage, rounded down. An empty quiz scores 0.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = u64::from(self.correct) * 100 / u64::from(self.total);
        u32::try_from(pct).unwrap_or(100)
    }
}

/// One user's run through a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    id: AttemptId,
    quiz_id: QuizId,
    status: AttemptStatus,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    score: Option<AttemptScore>,
}

impl Attempt {
    /// Starts a new active attempt.
    #[must_use]
    pub fn start(id: AttemptId, quiz_id: QuizId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            quiz_id,
            status: AttemptStatus::Active,
            started_at,
            completed_at: None,
            score: None,
        }
    }

    /// Rehydrate an attempt from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if the timestamps are inverted.
    pub fn from_persisted(
        id: AttemptId,
        quiz_id: QuizId,
        status: AttemptStatus,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
        score: Option<AttemptScore>,
    ) -> Result<Self, AttemptError> {
        if completed_at.is_some_and(|done| done < started_at) {
            return Err(AttemptError::InvalidTimeRange);
        }
        Ok(Self {
            id,
            quiz_id,
            status,
            started_at,
            completed_at,
            score,
        })
    }

    /// Freeze the attempt with its final score.
    ///
    /// Returns the completed copy; the original is left untouched so callers
    /// can keep their state unchanged until persistence succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::AlreadyCompleted` if the attempt is already frozen.
    /// Returns `AttemptError::InvalidTimeRange` if `completed_at` precedes the start.
    pub fn completed(
        &self,
        completed_at: DateTime<Utc>,
        score: AttemptScore,
    ) -> Result<Self, AttemptError> {
        if self.is_completed() {
            return Err(AttemptError::AlreadyCompleted(self.id.clone()));
        }
        if completed_at < self.started_at {
            return Err(AttemptError::InvalidTimeRange);
        }
        Ok(Self {
            status: AttemptStatus::Completed,
            completed_at: Some(completed_at),
            score: Some(score),
            ..self.clone()
        })
    }

    #[must_use]
    pub fn id(&self) -> &AttemptId {
        &self.id
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == AttemptStatus::Completed
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> Option<AttemptScore> {
        self.score
    }
}
