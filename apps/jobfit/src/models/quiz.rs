use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::ids::{AnswerId, JobId, QuestionId, QuizId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizRow {
    pub id: QuizId,
    pub job_id: JobId,
    pub created_at: DateTime<Utc>,
}

/// One quiz question. `idx` is 0-based and fixes display and grading order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: QuestionId,
    pub quiz_id: QuizId,
    pub idx: i32,
    pub text: String,
}

/// A submitted answer. Grade columns stay NULL until a grading pass writes them.
/// Several rows may exist for one question; the highest id is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerRow {
    pub id: AnswerId,
    pub quiz_id: QuizId,
    pub question_id: QuestionId,
    pub text: String,
    pub accuracy: Option<i16>,
    pub completeness: Option<i16>,
    pub communication: Option<i16>,
    pub score_pct: Option<f64>,
    pub tip: Option<String>,
}

impl AnswerRow {
    pub fn is_graded(&self) -> bool {
        self.score_pct.is_some()
    }
}
