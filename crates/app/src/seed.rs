//! Demo content so a fresh database has something to take.

use thiserror::Error;

use quiz_core::model::{AnswerFormat, FileId, Question, QuestionId, Quiz, QuizId};
use services::{CatalogError, QuizCatalogService};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error(transparent)]
    Domain(#[from] quiz_core::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(QuizId),
    AlreadyPresent,
}

fn demo_quiz(file_id: &FileId) -> Result<(Quiz, Vec<Question>), quiz_core::Error> {
    let prefix = format!("{file_id}-rust-basics");
    let qid = |n: u8| QuestionId::new(format!("{prefix}-{n}"));

    let questions = vec![
        Question::new(
            qid(1)?,
            "Which keyword declares a binding that can be reassigned?",
            AnswerFormat::MultipleChoice {
                options: vec!["let".into(), "let mut".into(), "const".into(), "static".into()],
            },
            "let mut",
            Some("Bindings are immutable unless declared with `mut`.".into()),
        )?,
        Question::new(
            qid(2)?,
            "A value can have more than one owner at a time without Rc or Arc.",
            AnswerFormat::TrueFalse,
            "False",
            Some("Each value has exactly one owner; shared ownership needs Rc or Arc.".into()),
        )?,
        Question::new(
            qid(3)?,
            "Which operator propagates an error from a function returning Result?",
            AnswerFormat::MultipleChoice {
                options: vec!["!".into(), "?".into(), "&".into(), "*".into()],
            },
            "?",
            None,
        )?,
        Question::new(
            qid(4)?,
            "Name the tool that builds crates and resolves their dependencies.",
            AnswerFormat::ShortAnswer,
            "cargo",
            Some("Cargo drives rustc and fetches crates from the registry.".into()),
        )?,
    ];

    let quiz = Quiz::new(
        QuizId::new(&prefix)?,
        file_id.clone(),
        "Rust basics",
        Some("Ownership, bindings and error handling".into()),
        questions.iter().map(|q| q.id().clone()).collect(),
    )?;
    Ok((quiz, questions))
}

/// Insert the demo quiz unless the file already has quizzes.
///
/// # Errors
///
/// Returns `SeedError` if the quiz cannot be built or stored.
pub async fn seed_demo_quiz(
    catalog: &QuizCatalogService,
    file_id: &FileId,
) -> Result<SeedOutcome, SeedError> {
    if !catalog.list_quizzes(file_id, 1).await?.is_empty() {
        return Ok(SeedOutcome::AlreadyPresent);
    }
    let (quiz, questions) = demo_quiz(file_id)?;
    catalog.create_quiz(&quiz, &questions).await?;
    Ok(SeedOutcome::Created(quiz.id().clone()))
}
