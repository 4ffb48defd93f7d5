use quiz_core::model::{Attempt, AttemptId, QuizId};

use super::SqliteRepository;
use super::mapping::{conn, map_attempt_row};
use crate::repository::{AttemptRepository, StorageError};

fn score_columns(attempt: &Attempt) -> (Option<i64>, Option<i64>) {
    attempt.score().map_or((None, None), |score| {
        (
            Some(i64::from(score.correct())),
            Some(i64::from(score.total())),
        )
    })
}

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn insert_attempt(&self, attempt: &Attempt) -> Result<(), StorageError> {
        let (correct, total) = score_columns(attempt);

        sqlx::query(
            r"
                INSERT INTO attempts (
                    id, quiz_id, status, started_at, completed_at, score_correct, score_total
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(attempt.id().as_str())
        .bind(attempt.quiz_id().as_str())
        .bind(attempt.status().as_str())
        .bind(attempt.started_at())
        .bind(attempt.completed_at())
        .bind(correct)
        .bind(total)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::NotFound,
            other => conn(other),
        })?;

        Ok(())
    }

    async fn save_attempt(&self, attempt: &Attempt) -> Result<(), StorageError> {
        let (correct, total) = score_columns(attempt);

        let res = sqlx::query(
            r"
                UPDATE attempts
                SET status = ?2,
                    completed_at = ?3,
                    score_correct = ?4,
                    score_total = ?5
                WHERE id = ?1
            ",
        )
        .bind(attempt.id().as_str())
        .bind(attempt.status().as_str())
        .bind(attempt.completed_at())
        .bind(correct)
        .bind(total)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_attempt(&self, id: &AttemptId) -> Result<Attempt, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, quiz_id, status, started_at, completed_at, score_correct, score_total
                FROM attempts
                WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_attempt_row(&row)
    }

    async fn list_attempts(
        &self,
        quiz_id: &QuizId,
        limit: u32,
    ) -> Result<Vec<Attempt>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, quiz_id, status, started_at, completed_at, score_correct, score_total
                FROM attempts
                WHERE quiz_id = ?1
                ORDER BY started_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(quiz_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_attempt_row).collect()
    }
}
