use quiz_core::model::{AttemptId, Response, Responses};

use super::SqliteRepository;
use super::mapping::{conn, map_response_row};
use crate::repository::{ResponseRepository, StorageError};

#[async_trait::async_trait]
impl ResponseRepository for SqliteRepository {
    async fn upsert_response(
        &self,
        attempt_id: &AttemptId,
        response: &Response,
    ) -> Result<(), StorageError> {
        // One row per (attempt, question); a re-submission replaces the answer.
        sqlx::query(
            r"
                INSERT INTO responses (
                    attempt_id, question_id, answer, time_spent_secs, is_correct
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(attempt_id, question_id) DO UPDATE SET
                    answer = excluded.answer,
                    time_spent_secs = excluded.time_spent_secs,
                    is_correct = excluded.is_correct
            ",
        )
        .bind(attempt_id.as_str())
        .bind(response.question_id.as_str())
        .bind(response.answer.as_str())
        .bind(i64::from(response.time_spent_secs))
        .bind(i64::from(response.is_correct))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::NotFound,
            other => conn(other),
        })?;

        Ok(())
    }

    async fn list_responses(&self, attempt_id: &AttemptId) -> Result<Responses, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT question_id, answer, time_spent_secs, is_correct
                FROM responses
                WHERE attempt_id = ?1
            ",
        )
        .bind(attempt_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_response_row).collect()
    }
}
