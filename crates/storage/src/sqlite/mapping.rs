use chrono::{DateTime, Utc};
use quiz_core::model::{
    AnswerFormat, Attempt, AttemptId, AttemptScore, AttemptStatus, FileId, Question, QuestionId,
    Quiz, QuizId, Response,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn format_to_json(format: &AnswerFormat) -> Result<String, StorageError> {
    serde_json::to_string(format).map_err(ser)
}

fn format_from_json(raw: &str) -> Result<AnswerFormat, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_quiz_row(
    row: &sqlx::sqlite::SqliteRow,
    question_ids: Vec<QuestionId>,
) -> Result<Quiz, StorageError> {
    let id = QuizId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
    let file_id = FileId::new(row.try_get::<String, _>("file_id").map_err(ser)?).map_err(ser)?;
    let title: String = row.try_get("title").map_err(ser)?;
    let description: Option<String> = row.try_get("description").map_err(ser)?;

    Quiz::new(id, file_id, title, description, question_ids).map_err(ser)
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = QuestionId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
    let format = format_from_json(&row.try_get::<String, _>("format").map_err(ser)?)?;

    Question::new(
        id,
        row.try_get::<String, _>("prompt").map_err(ser)?,
        format,
        row.try_get::<String, _>("correct_answer").map_err(ser)?,
        row.try_get::<Option<String>, _>("explanation").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<Attempt, StorageError> {
    let id = AttemptId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
    let quiz_id = QuizId::new(row.try_get::<String, _>("quiz_id").map_err(ser)?).map_err(ser)?;
    let status = AttemptStatus::parse(&row.try_get::<String, _>("status").map_err(ser)?)
        .map_err(ser)?;
    let started_at: DateTime<Utc> = row.try_get("started_at").map_err(ser)?;
    let completed_at: Option<DateTime<Utc>> = row.try_get("completed_at").map_err(ser)?;

    let correct: Option<i64> = row.try_get("score_correct").map_err(ser)?;
    let total: Option<i64> = row.try_get("score_total").map_err(ser)?;
    let score = match (correct, total) {
        (Some(correct), Some(total)) => Some(
            AttemptScore::new(
                u32_from_i64("score_correct", correct)?,
                u32_from_i64("score_total", total)?,
            )
            .map_err(ser)?,
        ),
        (None, None) => None,
        _ => return Err(StorageError::Serialization("partial attempt score".into())),
    };

    Attempt::from_persisted(id, quiz_id, status, started_at, completed_at, score).map_err(ser)
}

pub(crate) fn map_response_row(row: &sqlx::sqlite::SqliteRow) -> Result<Response, StorageError> {
    let question_id =
        QuestionId::new(row.try_get::<String, _>("question_id").map_err(ser)?).map_err(ser)?;
    let time_spent_secs = u32_from_i64(
        "time_spent_secs",
        row.try_get::<i64, _>("time_spent_secs").map_err(ser)?,
    )?;
    let is_correct = row.try_get::<i64, _>("is_correct").map_err(ser)? != 0;

    Ok(Response::new(
        question_id,
        row.try_get::<String, _>("answer").map_err(ser)?,
        time_spent_secs,
        is_correct,
    ))
}
