//! Persistence for jobs, résumés, quizzes, questions and answers.
//!
//! The scoring core never touches rows directly; it reads and writes through
//! `DocumentStore`, which the engine holds as `Arc<dyn DocumentStore>`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    AnswerId, AnswerRow, JobId, JobRow, QuestionId, QuestionRow, QuizId, QuizRow, ResumeId,
    ResumeRow,
};
use crate::quiz::grading::{latest_per_question, overall_score};

pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("question {question_id} does not belong to quiz {quiz_id}")]
    ForeignQuestion {
        quiz_id: QuizId,
        question_id: QuestionId,
    },
}

/// Grade columns written back onto one answer row.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeUpdate {
    pub accuracy: u8,
    pub completeness: u8,
    pub communication: u8,
    pub score_pct: f64,
    pub tip: String,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_job(&self, title: &str, jd_text: &str) -> Result<JobRow, StoreError>;

    async fn get_job(&self, job_id: JobId) -> Result<Option<JobRow>, StoreError>;

    async fn create_resume(&self, text: &str) -> Result<ResumeRow, StoreError>;

    async fn get_resume(&self, resume_id: ResumeId) -> Result<Option<ResumeRow>, StoreError>;

    async fn create_quiz(&self, job_id: JobId) -> Result<QuizRow, StoreError>;

    async fn get_quiz(&self, quiz_id: QuizId) -> Result<Option<QuizRow>, StoreError>;

    /// Persists questions in the given order; `idx` is the position in `texts`.
    async fn add_questions(
        &self,
        quiz_id: QuizId,
        texts: &[String],
    ) -> Result<Vec<QuestionRow>, StoreError>;

    /// Questions ordered by `idx`.
    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<QuestionRow>, StoreError>;

    /// Appends one answer row per `(question_id, text)` pair.
    async fn add_answers(
        &self,
        quiz_id: QuizId,
        answers: &[(QuestionId, String)],
    ) -> Result<Vec<AnswerRow>, StoreError>;

    /// Every answer row of the quiz, oldest first.
    async fn list_answers(&self, quiz_id: QuizId) -> Result<Vec<AnswerRow>, StoreError>;

    /// The authoritative (most recently created) answer for a question.
    async fn latest_answer(
        &self,
        quiz_id: QuizId,
        question_id: QuestionId,
    ) -> Result<Option<AnswerRow>, StoreError>;

    async fn update_answer_grade(
        &self,
        answer_id: AnswerId,
        grade: &GradeUpdate,
    ) -> Result<(), StoreError>;

    /// Mean `score_pct` over the latest graded answer of each question, one
    /// decimal, 0 when nothing is graded. A pure read; safe to recompute.
    async fn quiz_overall(&self, quiz_id: QuizId) -> Result<f64, StoreError> {
        let graded: Vec<AnswerRow> = self
            .list_answers(quiz_id)
            .await?
            .into_iter()
            .filter(AnswerRow::is_graded)
            .collect();
        let scores: Vec<f64> = latest_per_question(&graded)
            .into_iter()
            .filter_map(|a| a.score_pct)
            .collect();
        Ok(overall_score(&scores))
    }
}
