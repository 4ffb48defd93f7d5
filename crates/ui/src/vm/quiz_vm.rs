use services::QuizListItem;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub quiz_id: String,
    pub title: String,
    pub description: Option<String>,
    pub question_count: usize,
    pub last_result: Option<String>,
}

impl From<&QuizListItem> for QuizCardVm {
    fn from(item: &QuizListItem) -> Self {
        let last_result = item.last_score.map(|score| {
            let when = item
                .last_completed_at
                .map(|at| format!(" on {}", format_datetime(at)))
                .unwrap_or_default();
            format!(
                "Last score: {}/{} ({}%){when}",
                score.correct(),
                score.total(),
                score.percent()
            )
        });
        Self {
            quiz_id: item.quiz.id().to_string(),
            title: item.quiz.title().to_string(),
            description: item.quiz.description().map(str::to_string),
            question_count: item.quiz.question_count(),
            last_result,
        }
    }
}

#[must_use]
pub fn map_quiz_cards(items: &[QuizListItem]) -> Vec<QuizCardVm> {
    items.iter().map(QuizCardVm::from).collect()
}
