use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// A submitted answer plus the time spent on the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub question_id: QuestionId,
    pub answer: String,
    pub time_spent_secs: u32,
    pub is_correct: bool,
}

impl Response {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        answer: impl Into<String>,
        time_spent_secs: u32,
        is_correct: bool,
    ) -> Self {
        Self {
            question_id,
            answer: answer.into(),
            time_spent_secs,
            is_correct,
        }
    }
}

/// Responses of one attempt, keyed by question. Re-submitting overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responses {
    entries: BTreeMap<QuestionId, Response>,
}

impl Responses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the response, returning the one it replaced.
    pub fn record(&mut self, response: Response) -> Option<Response> {
        self.entries.insert(response.question_id.clone(), response)
    }

    #[must_use]
    pub fn get(&self, question_id: &QuestionId) -> Option<&Response> {
        self.entries.get(question_id)
    }

    #[must_use]
    pub fn contains(&self, question_id: &QuestionId) -> bool {
        self.entries.contains_key(question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Response> {
        self.entries.values()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.entries.values().filter(|r| r.is_correct).count()
    }

    #[must_use]
    pub fn total_time_secs(&self) -> u64 {
        self.entries
            .values()
            .map(|r| u64::from(r.time_spent_secs))
            .sum()
    }
}

impl FromIterator<Response> for Responses {
    fn from_iter<I: IntoIterator<Item = Response>>(iter: I) -> Self {
        let mut out = Self::new();
        for response in iter {
            out.record(response);
        }
        out
    }
}
