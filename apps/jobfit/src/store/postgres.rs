//! PostgreSQL-backed `DocumentStore`.
//!
//! Expected tables (created out of band):
//!
//! ```sql
//! jobs      (id BIGSERIAL PK, title TEXT, jd_text TEXT, created_at TIMESTAMPTZ DEFAULT now())
//! resumes   (id BIGSERIAL PK, text TEXT, created_at TIMESTAMPTZ DEFAULT now())
//! quizzes   (id BIGSERIAL PK, job_id BIGINT REFERENCES jobs, created_at TIMESTAMPTZ DEFAULT now())
//! questions (id BIGSERIAL PK, quiz_id BIGINT REFERENCES quizzes, idx INT, text TEXT)
//! answers   (id BIGSERIAL PK, quiz_id BIGINT REFERENCES quizzes,
//!            question_id BIGINT REFERENCES questions, text TEXT,
//!            accuracy SMALLINT, completeness SMALLINT, communication SMALLINT,
//!            score_pct DOUBLE PRECISION, tip TEXT)
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::models::{
    AnswerId, AnswerRow, JobId, JobRow, QuestionId, QuestionRow, QuizId, QuizRow, ResumeId,
    ResumeRow,
};
use crate::store::{DocumentStore, GradeUpdate, StoreError};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn create_job(&self, title: &str, jd_text: &str) -> Result<JobRow, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(
            "INSERT INTO jobs (title, jd_text) VALUES ($1, $2) RETURNING *",
        )
        .bind(title)
        .bind(jd_text)
        .fetch_one(&self.pool)
        .await?;
        debug!(job_id = %row.id, "Job stored");
        Ok(row)
    }

    async fn get_job(&self, job_id: JobId) -> Result<Option<JobRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_resume(&self, text: &str) -> Result<ResumeRow, StoreError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("INSERT INTO resumes (text) VALUES ($1) RETURNING *")
                .bind(text)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn get_resume(&self, resume_id: ResumeId) -> Result<Option<ResumeRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
                .bind(resume_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_quiz(&self, job_id: JobId) -> Result<QuizRow, StoreError> {
        Ok(
            sqlx::query_as::<_, QuizRow>("INSERT INTO quizzes (job_id) VALUES ($1) RETURNING *")
                .bind(job_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn get_quiz(&self, quiz_id: QuizId) -> Result<Option<QuizRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, QuizRow>("SELECT * FROM quizzes WHERE id = $1")
                .bind(quiz_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn add_questions(
        &self,
        quiz_id: QuizId,
        texts: &[String],
    ) -> Result<Vec<QuestionRow>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(texts.len());

        for (idx, text) in texts.iter().enumerate() {
            let row = sqlx::query_as::<_, QuestionRow>(
                "INSERT INTO questions (quiz_id, idx, text) VALUES ($1, $2, $3) RETURNING *",
            )
            .bind(quiz_id)
            .bind(idx as i32)
            .bind(text)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<QuestionRow>, StoreError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            "SELECT * FROM questions WHERE quiz_id = $1 ORDER BY idx, id",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn add_answers(
        &self,
        quiz_id: QuizId,
        answers: &[(QuestionId, String)],
    ) -> Result<Vec<AnswerRow>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(answers.len());

        for (question_id, text) in answers {
            let owner: Option<QuizId> =
                sqlx::query_scalar("SELECT quiz_id FROM questions WHERE id = $1")
                    .bind(*question_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if owner != Some(quiz_id) {
                return Err(StoreError::ForeignQuestion {
                    quiz_id,
                    question_id: *question_id,
                });
            }

            let row = sqlx::query_as::<_, AnswerRow>(
                "INSERT INTO answers (quiz_id, question_id, text) VALUES ($1, $2, $3) RETURNING *",
            )
            .bind(quiz_id)
            .bind(*question_id)
            .bind(text)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    async fn list_answers(&self, quiz_id: QuizId) -> Result<Vec<AnswerRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, AnswerRow>("SELECT * FROM answers WHERE quiz_id = $1 ORDER BY id")
                .bind(quiz_id)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn latest_answer(
        &self,
        quiz_id: QuizId,
        question_id: QuestionId,
    ) -> Result<Option<AnswerRow>, StoreError> {
        Ok(sqlx::query_as::<_, AnswerRow>(
            "SELECT * FROM answers WHERE quiz_id = $1 AND question_id = $2 ORDER BY id DESC LIMIT 1",
        )
        .bind(quiz_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_answer_grade(
        &self,
        answer_id: AnswerId,
        grade: &GradeUpdate,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE answers
            SET accuracy = $2, completeness = $3, communication = $4, score_pct = $5, tip = $6
            WHERE id = $1
            "#,
        )
        .bind(answer_id)
        .bind(grade.accuracy as i16)
        .bind(grade.completeness as i16)
        .bind(grade.communication as i16)
        .bind(grade.score_pct)
        .bind(&grade.tip)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
