//! Interview quiz: question generation, per-answer grading, aggregation and
//! the persisted quiz lifecycle.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub mod grading;
pub mod prompts;
pub mod questions;
pub mod summary;
pub mod workflow;

pub use grading::{Grade, Grader, RawGrade};
pub use questions::QuestionGenerator;
pub use summary::{QuestionFeedback, QuizMatch, QuizSummary};
pub use workflow::{AnswerFeedback, QuizGradeReport, QuizStarted, QuizWorkflow, StartedQuestion};

/// Lifecycle of a persisted quiz.
///
/// `Created → QuestionsGenerated → AnswersSubmitted → Graded`. Answers may be
/// resubmitted before grading, and a graded quiz may take a new round of
/// answers, which moves it back to `AnswersSubmitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    Created,
    QuestionsGenerated,
    AnswersSubmitted,
    Graded,
}

impl QuizState {
    pub fn can_advance_to(self, next: QuizState) -> bool {
        use QuizState::*;
        matches!(
            (self, next),
            (Created, QuestionsGenerated)
                | (QuestionsGenerated, AnswersSubmitted)
                | (AnswersSubmitted, AnswersSubmitted)
                | (AnswersSubmitted, Graded)
                | (Graded, AnswersSubmitted)
        )
    }

    pub fn ensure_can_advance(self, next: QuizState) -> Result<(), AppError> {
        if self.can_advance_to(next) {
            return Ok(());
        }
        let message = match (self, next) {
            (QuizState::Created, QuizState::AnswersSubmitted | QuizState::Graded) => {
                "no questions for this quiz".to_string()
            }
            _ => format!("quiz cannot move from {self:?} to {next:?}"),
        };
        Err(AppError::InvalidState(message))
    }
}
