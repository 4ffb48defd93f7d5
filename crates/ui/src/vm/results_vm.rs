use quiz_core::model::{AttemptReport, QuestionReview};

use crate::vm::time_fmt::format_duration_secs;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsSummaryVm {
    pub quiz_title: String,
    pub score_label: String,
    pub percent: u32,
    pub answered_label: String,
    pub time_label: String,
}

impl From<&AttemptReport> for ResultsSummaryVm {
    fn from(report: &AttemptReport) -> Self {
        Self {
            quiz_title: report.quiz_title.clone(),
            score_label: format!("{} / {}", report.correct, report.total),
            percent: report.percent(),
            answered_label: format!("{} of {} answered", report.answered, report.total),
            time_label: format_duration_secs(report.total_time_secs),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub position: usize,
    pub prompt: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub time_label: String,
    pub explanation: Option<String>,
}

impl From<&QuestionReview> for ReviewRowVm {
    fn from(review: &QuestionReview) -> Self {
        Self {
            position: review.position,
            prompt: review.prompt.clone(),
            your_answer: review
                .your_answer
                .clone()
                .unwrap_or_else(|| "No answer".to_string()),
            correct_answer: review.correct_answer.clone(),
            is_correct: review.is_correct,
            time_label: format_duration_secs(u64::from(review.time_spent_secs)),
            explanation: review.explanation.clone(),
        }
    }
}

#[must_use]
pub fn map_review_rows(report: &AttemptReport) -> Vec<ReviewRowVm> {
    report.reviews.iter().map(ReviewRowVm::from).collect()
}
