use quiz_core::model::{AnswerFormat, Question};
use services::AttemptProgress;

/// How the answer is entered for the current question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerInputVm {
    Choices(Vec<String>),
    FreeText,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub question_id: String,
    pub prompt: String,
    pub format_label: &'static str,
    pub input: AnswerInputVm,
    pub position_label: String,
    pub progress_percent: u32,
    pub is_last: bool,
}

fn format_caption(format: &AnswerFormat) -> &'static str {
    match format {
        AnswerFormat::MultipleChoice { .. } => "Multiple choice",
        AnswerFormat::TrueFalse => "True or false",
        AnswerFormat::ShortAnswer => "Short answer",
    }
}

impl QuestionVm {
    #[must_use]
    pub fn new(question: &Question, progress: AttemptProgress) -> Self {
        let input = match question.format() {
            AnswerFormat::ShortAnswer => AnswerInputVm::FreeText,
            format => AnswerInputVm::Choices(format.choices()),
        };
        Self {
            question_id: question.id().to_string(),
            prompt: question.prompt().to_string(),
            format_label: format_caption(question.format()),
            input,
            position_label: format!("Question {} of {}", progress.position, progress.total),
            progress_percent: progress.answered_percent(),
            is_last: progress.is_last,
        }
    }

    #[must_use]
    pub fn next_label(&self) -> &'static str {
        if self.is_last { "Finish" } else { "Next" }
    }
}
