use quiz_core::model::{FileId, Question, QuestionId, Quiz, QuizId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, format_to_json, map_question_row, map_quiz_row, ser};
use crate::repository::{QuizRepository, StorageError};

impl SqliteRepository {
    async fn question_ids(&self, quiz_id: &QuizId) -> Result<Vec<QuestionId>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id FROM questions
                WHERE quiz_id = ?1
                ORDER BY position ASC
            ",
        )
        .bind(quiz_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter()
            .map(|row| {
                let raw: String = row.try_get("id").map_err(ser)?;
                QuestionId::new(raw).map_err(ser)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &Quiz, questions: &[Question]) -> Result<(), StorageError> {
        let mut ordered = Vec::with_capacity(quiz.question_count());
        for id in quiz.question_ids() {
            let question = questions
                .iter()
                .find(|q| q.id() == id)
                .ok_or(StorageError::Conflict)?;
            ordered.push(question);
        }

        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
                INSERT INTO quizzes (id, file_id, title, description)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                    file_id = excluded.file_id,
                    title = excluded.title,
                    description = excluded.description
            ",
        )
        .bind(quiz.id().as_str())
        .bind(quiz.file_id().as_str())
        .bind(quiz.title())
        .bind(quiz.description())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM questions WHERE quiz_id = ?1")
            .bind(quiz.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, question) in ordered.into_iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            sqlx::query(
                r"
                    INSERT INTO questions (
                        id, quiz_id, position, prompt, format, correct_answer, explanation
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )
            .bind(question.id().as_str())
            .bind(quiz.id().as_str())
            .bind(position)
            .bind(question.prompt())
            .bind(format_to_json(question.format())?)
            .bind(question.correct_answer())
            .bind(question.explanation())
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
                other => conn(other),
            })?;
        }

        tx.commit().await.map_err(conn)?;
        tracing::debug!(quiz_id = %quiz.id(), questions = quiz.question_count(), "quiz upserted");
        Ok(())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, file_id, title, description
                FROM quizzes
                WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        let question_ids = self.question_ids(id).await?;
        map_quiz_row(&row, question_ids)
    }

    async fn get_questions(&self, quiz_id: &QuizId) -> Result<Vec<Question>, StorageError> {
        let exists = sqlx::query("SELECT 1 FROM quizzes WHERE id = ?1")
            .bind(quiz_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        if exists.is_none() {
            return Err(StorageError::NotFound);
        }

        let rows = sqlx::query(
            r"
                SELECT id, prompt, format, correct_answer, explanation
                FROM questions
                WHERE quiz_id = ?1
                ORDER BY position ASC
            ",
        )
        .bind(quiz_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn list_quizzes(&self, file_id: &FileId, limit: u32) -> Result<Vec<Quiz>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, file_id, title, description
                FROM quizzes
                WHERE file_id = ?1
                ORDER BY title ASC, id ASC
                LIMIT ?2
            ",
        )
        .bind(file_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let id = QuizId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
            let question_ids = self.question_ids(&id).await?;
            out.push(map_quiz_row(&row, question_ids)?);
        }
        Ok(out)
    }
}
