//! Assembles the fit report for a job from whichever channels are available.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::Engine;
use crate::errors::AppError;
use crate::matching::{FitBadge, MatchResult};
use crate::models::{AnswerRow, JobId, QuizId, ResumeId};
use crate::quiz::grading::latest_per_question;

/// Gaps shown in the recommendation block. `MatchResult::gaps` itself is uncapped.
const TOP_CV_GAPS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizScore {
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendations {
    pub top_cv_gaps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub job_id: JobId,
    pub cv_match: Option<MatchResult>,
    pub quiz_match: Option<QuizScore>,
    pub combined: Option<f64>,
    pub badge: Option<FitBadge>,
    pub message: String,
    pub recommend: Recommendations,
}

#[derive(Clone)]
pub struct MatchService {
    engine: Engine,
}

impl MatchService {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Builds the report. A quiz with no graded answers counts as an absent
    /// channel rather than a zero score.
    pub async fn report(
        &self,
        job_id: JobId,
        resume_id: Option<ResumeId>,
        quiz_id: Option<QuizId>,
    ) -> Result<MatchReport, AppError> {
        let store = self.engine.store();
        self.engine.require_job(job_id).await?;

        let cv_match = match resume_id {
            Some(resume_id) => {
                let resume = store
                    .get_resume(resume_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("resume {resume_id}")))?;
                let skills = self.engine.skills_or_fallback(job_id).await?;
                Some(self.engine.score_cv(&resume.text, &skills)?)
            }
            None => None,
        };

        let quiz_match = match quiz_id {
            Some(quiz_id) => {
                let quiz = store
                    .get_quiz(quiz_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("quiz {quiz_id}")))?;
                if quiz.job_id != job_id {
                    return Err(AppError::InvalidState(format!(
                        "quiz {quiz_id} belongs to job {}, not job {job_id}",
                        quiz.job_id
                    )));
                }
                let graded: Vec<AnswerRow> = store
                    .list_answers(quiz_id)
                    .await?
                    .into_iter()
                    .filter(AnswerRow::is_graded)
                    .collect();
                if latest_per_question(&graded).is_empty() {
                    None
                } else {
                    Some(QuizScore {
                        score: store.quiz_overall(quiz_id).await?,
                    })
                }
            }
            None => None,
        };

        let verdict = self.engine.combine_fit(
            cv_match.as_ref().map(|m| m.score),
            quiz_match.as_ref().map(|q| q.score),
        );
        let recommend = Recommendations {
            top_cv_gaps: cv_match
                .as_ref()
                .map(|m| m.gaps.iter().take(TOP_CV_GAPS).cloned().collect())
                .unwrap_or_default(),
        };

        info!(
            %job_id,
            cv = ?cv_match.as_ref().map(|m| m.score),
            quiz = ?quiz_match.as_ref().map(|q| q.score),
            badge = ?verdict.badge,
            "Match report built"
        );

        Ok(MatchReport {
            job_id,
            cv_match,
            quiz_match,
            combined: verdict.combined,
            badge: verdict.badge,
            message: verdict.message,
            recommend,
        })
    }
}
