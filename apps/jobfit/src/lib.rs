//! Job-fit scoring engine.
//!
//! Extracts weighted skills from a job description, scores résumé evidence
//! against them, runs a JD-grounded self-assessment quiz and combines both
//! channels into a fit badge. Transport is left to the embedding binary,
//! which builds one [`Engine`] at startup and shares it.

pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod quiz;
pub mod retrieval;
pub mod skills;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use engine::Engine;
pub use errors::AppError;
pub use matching::{FitBadge, FitVerdict, MatchReport, MatchResult, MatchService};
pub use quiz::{Grade, QuizMatch, QuizState, QuizWorkflow};
pub use skills::Skill;
