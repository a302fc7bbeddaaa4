pub mod ids;
pub mod job;
pub mod quiz;

pub use ids::{AnswerId, JobId, QuestionId, QuizId, ResumeId};
pub use job::{JobRow, ResumeRow};
pub use quiz::{AnswerRow, QuestionRow, QuizRow};
