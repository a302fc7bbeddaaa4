//! Persisted quiz lifecycle: start a quiz, grade submitted answers, report state.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::Engine;
use crate::errors::AppError;
use crate::models::{AnswerRow, JobId, QuestionId, QuestionRow, QuizId, QuizRow};
use crate::quiz::grading::latest_per_question;
use crate::quiz::{QuizMatch, QuizState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartedQuestion {
    pub id: QuestionId,
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStarted {
    pub quiz_id: QuizId,
    pub questions: Vec<StartedQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub score: f64,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizGradeReport {
    pub quiz_id: QuizId,
    pub overall: f64,
    pub feedback: Vec<AnswerFeedback>,
    pub quiz_match: QuizMatch,
}

#[derive(Clone)]
pub struct QuizWorkflow {
    engine: Engine,
}

impl QuizWorkflow {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Creates a quiz for the job with `n` questions (the engine default when
    /// `None`), persisted in generation order.
    pub async fn start(&self, job_id: JobId, n: Option<usize>) -> Result<QuizStarted, AppError> {
        let n = n.unwrap_or_else(|| self.engine.question_count());
        if n == 0 {
            return Err(AppError::EmptyInput(
                "a quiz needs at least one question".to_string(),
            ));
        }

        let texts = self.engine.make_questions(job_id, n).await?;
        let store = self.engine.store();
        let quiz = store.create_quiz(job_id).await?;
        let rows = store.add_questions(quiz.id, &texts).await?;

        info!(quiz_id = %quiz.id, %job_id, questions = rows.len(), "Quiz started");
        Ok(QuizStarted {
            quiz_id: quiz.id,
            questions: rows
                .into_iter()
                .map(|row| StartedQuestion {
                    id: row.id,
                    index: row.idx.max(0) as usize,
                    text: row.text,
                })
                .collect(),
        })
    }

    pub async fn state(&self, quiz_id: QuizId) -> Result<QuizState, AppError> {
        self.require_quiz(quiz_id).await?;
        let store = self.engine.store();
        let questions = store.list_questions(quiz_id).await?;
        let answers = store.list_answers(quiz_id).await?;
        Ok(derive_state(&questions, &answers))
    }

    /// Persists a round of answers and grades every question of the quiz.
    ///
    /// Each question is graded on its latest answer; questions that never got
    /// one are graded defensively on empty text. Grades are written back onto
    /// the answer rows they were computed from.
    pub async fn grade(
        &self,
        quiz_id: QuizId,
        answers: &[(QuestionId, String)],
    ) -> Result<QuizGradeReport, AppError> {
        let quiz = self.require_quiz(quiz_id).await?;
        let store = self.engine.store();

        let questions = store.list_questions(quiz_id).await?;
        let state = derive_state(&questions, &store.list_answers(quiz_id).await?);
        state.ensure_can_advance(QuizState::AnswersSubmitted)?;

        if answers.is_empty() {
            return Err(AppError::EmptyInput("no answers submitted".to_string()));
        }
        let known: HashSet<QuestionId> = questions.iter().map(|q| q.id).collect();
        if let Some((foreign, _)) = answers.iter().find(|(id, _)| !known.contains(id)) {
            return Err(AppError::NotFound(format!(
                "question {foreign} in quiz {quiz_id}"
            )));
        }
        store.add_answers(quiz_id, answers).await?;

        let all_answers = store.list_answers(quiz_id).await?;
        let latest: HashMap<QuestionId, &AnswerRow> = latest_per_question(&all_answers)
            .into_iter()
            .map(|a| (a.question_id, a))
            .collect();
        let qas: Vec<(String, String)> = questions
            .iter()
            .map(|q| {
                let answer = latest.get(&q.id).map(|a| a.text.clone()).unwrap_or_default();
                (q.text.clone(), answer)
            })
            .collect();

        let summary = self.engine.grade_many(quiz.job_id, &qas).await;

        // Each grade goes onto the row it was computed from, even if a newer
        // answer arrived while the oracle calls were in flight.
        for (question, grade) in questions.iter().zip(&summary.grades) {
            if let Some(row) = latest.get(&question.id) {
                store.update_answer_grade(row.id, &grade.to_update()).await?;
            }
        }

        info!(%quiz_id, overall = summary.overall, "Quiz graded");
        Ok(QuizGradeReport {
            quiz_id,
            overall: summary.overall,
            feedback: questions
                .iter()
                .zip(&summary.feedback)
                .map(|(q, f)| AnswerFeedback {
                    question_id: q.id,
                    score: f.score,
                    tip: f.tip.clone(),
                })
                .collect(),
            quiz_match: summary.quiz_match,
        })
    }

    async fn require_quiz(&self, quiz_id: QuizId) -> Result<QuizRow, AppError> {
        self.engine
            .store()
            .get_quiz(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("quiz {quiz_id}")))
    }
}

fn derive_state(questions: &[QuestionRow], answers: &[AnswerRow]) -> QuizState {
    if questions.is_empty() {
        QuizState::Created
    } else if answers.is_empty() {
        QuizState::QuestionsGenerated
    } else if latest_per_question(answers).iter().all(|a| a.is_graded()) {
        QuizState::Graded
    } else {
        QuizState::AnswersSubmitted
    }
}
