use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{FileId, QuestionId, QuizId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question {0} has no correct answer")]
    MissingAnswer(QuestionId),

    #[error("multiple choice question {0} needs at least two options")]
    TooFewOptions(QuestionId),

    #[error("answer for question {0} is not one of its options")]
    AnswerNotAnOption(QuestionId),

    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// How a question expects to be answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerFormat {
    /// Pick exactly one of the listed options.
    MultipleChoice { options: Vec<String> },
    /// Answer is `"True"` or `"False"`.
    TrueFalse,
    /// Free text, compared case-insensitively after trimming.
    ShortAnswer,
}

impl AnswerFormat {
    /// Options the user can pick from. Empty for free-text questions.
    #[must_use]
    pub fn choices(&self) -> Vec<String> {
        match self {
            AnswerFormat::MultipleChoice { options } => options.clone(),
            AnswerFormat::TrueFalse => vec!["True".to_string(), "False".to_string()],
            AnswerFormat::ShortAnswer => Vec::new(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AnswerFormat::MultipleChoice { .. } => "multiple_choice",
            AnswerFormat::TrueFalse => "true_false",
            AnswerFormat::ShortAnswer => "short_answer",
        }
    }
}

/// A single question in the bank. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    format: AnswerFormat,
    correct_answer: String,
    explanation: Option<String>,
}

impl Question {
    /// Validates and builds a question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the prompt or answer is blank, or if a multiple
    /// choice answer is not one of the options.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        format: AnswerFormat,
        correct_answer: impl Into<String>,
        explanation: Option<String>,
    ) -> Result<Self, QuizError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuizError::EmptyPrompt);
        }
        let correct_answer = correct_answer.into().trim().to_string();
        if correct_answer.is_empty() {
            return Err(QuizError::MissingAnswer(id));
        }

        match &format {
            AnswerFormat::MultipleChoice { options } => {
                if options.len() < 2 {
                    return Err(QuizError::TooFewOptions(id));
                }
                if !options.iter().any(|o| o == &correct_answer) {
                    return Err(QuizError::AnswerNotAnOption(id));
                }
            }
            AnswerFormat::TrueFalse => {
                if correct_answer != "True" && correct_answer != "False" {
                    return Err(QuizError::AnswerNotAnOption(id));
                }
            }
            AnswerFormat::ShortAnswer => {}
        }

        Ok(Self {
            id,
            prompt,
            format,
            correct_answer,
            explanation: explanation.filter(|e| !e.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn format(&self) -> &AnswerFormat {
        &self.format
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Grades a submitted answer against the expected one.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        let answer = answer.trim();
        match self.format {
            AnswerFormat::ShortAnswer => answer.eq_ignore_ascii_case(&self.correct_answer),
            AnswerFormat::MultipleChoice { .. } | AnswerFormat::TrueFalse => {
                answer == self.correct_answer
            }
        }
    }
}

//
// ─── QUIZ ─────────────────────────────────────────────────────────────────────
//

/// A titled, ordered set of questions generated from one study file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    id: QuizId,
    file_id: FileId,
    title: String,
    description: Option<String>,
    question_ids: Vec<QuestionId>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle` for a blank title and
    /// `QuizError::DuplicateQuestion` if a question is listed twice.
    pub fn new(
        id: QuizId,
        file_id: FileId,
        title: impl Into<String>,
        description: Option<String>,
        question_ids: Vec<QuestionId>,
    ) -> Result<Self, QuizError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        for (idx, qid) in question_ids.iter().enumerate() {
            if question_ids[..idx].contains(qid) {
                return Err(QuizError::DuplicateQuestion(qid.clone()));
            }
        }

        Ok(Self {
            id,
            file_id,
            title,
            description: description.filter(|d| !d.trim().is_empty()),
            question_ids,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn file_id(&self) -> &FileId {
        &self.file_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn question_ids(&self) -> &[QuestionId] {
        &self.question_ids
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_ids.len()
    }
}
