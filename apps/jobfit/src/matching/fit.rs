//! Fit combiner: merges the CV and quiz channels into one score and badge.

use serde::{Deserialize, Serialize};

use crate::matching::round1;

/// Both channels use the same pass mark.
pub const FIT_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitBadge {
    StrongFit,
    ImproveQuiz,
    ImproveCv,
    NeedsWork,
    CvOnlyStrong,
    CvOnlyGaps,
    QuizOnlyStrong,
    QuizOnlyGaps,
}

impl FitBadge {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitBadge::StrongFit => "strong_fit",
            FitBadge::ImproveQuiz => "improve_quiz",
            FitBadge::ImproveCv => "improve_cv",
            FitBadge::NeedsWork => "needs_work",
            FitBadge::CvOnlyStrong => "cv_only_strong",
            FitBadge::CvOnlyGaps => "cv_only_gaps",
            FitBadge::QuizOnlyStrong => "quiz_only_strong",
            FitBadge::QuizOnlyGaps => "quiz_only_gaps",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            FitBadge::StrongFit => {
                "Strong fit: your CV and interview answers both align well with this role."
            }
            FitBadge::ImproveQuiz => {
                "Your CV matches the role well, but your interview answers were weaker. Practise explaining your experience with concrete examples."
            }
            FitBadge::ImproveCv => {
                "You interviewed well, but your CV does not show it. Add the missing skills and evidence to your CV."
            }
            FitBadge::NeedsWork => {
                "Both your CV and interview answers show gaps for this role. Focus on the listed missing skills first."
            }
            FitBadge::CvOnlyStrong => {
                "Your CV aligns well with this role. Take the quiz for a combined assessment."
            }
            FitBadge::CvOnlyGaps => {
                "Your CV is missing several of the role's skills. Address the gaps, then take the quiz."
            }
            FitBadge::QuizOnlyStrong => {
                "You answered the interview questions well. Add your resume for a combined assessment."
            }
            FitBadge::QuizOnlyGaps => {
                "Your interview answers show gaps for this role. Add your resume for a fuller picture."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitVerdict {
    pub combined: Option<f64>,
    pub badge: Option<FitBadge>,
    pub message: String,
}

/// Combines the two channel scores.
///
/// `combined` is the one-decimal mean and only exists when both channels do.
pub fn combine(cv_score: Option<f64>, quiz_score: Option<f64>) -> FitVerdict {
    let strong = |s: f64| s >= FIT_THRESHOLD;

    let badge = match (cv_score, quiz_score) {
        (None, None) => None,
        (Some(cv), Some(quiz)) => Some(match (strong(cv), strong(quiz)) {
            (true, true) => FitBadge::StrongFit,
            (true, false) => FitBadge::ImproveQuiz,
            (false, true) => FitBadge::ImproveCv,
            (false, false) => FitBadge::NeedsWork,
        }),
        (Some(cv), None) if strong(cv) => Some(FitBadge::CvOnlyStrong),
        (Some(_), None) => Some(FitBadge::CvOnlyGaps),
        (None, Some(quiz)) if strong(quiz) => Some(FitBadge::QuizOnlyStrong),
        (None, Some(_)) => Some(FitBadge::QuizOnlyGaps),
    };

    let combined = match (cv_score, quiz_score) {
        (Some(cv), Some(quiz)) => Some(round1((cv + quiz) / 2.0)),
        _ => None,
    };

    let message = badge
        .map(|b| b.message().to_string())
        .unwrap_or_else(|| "Provide a resume or complete the quiz to get a fit assessment.".to_string());

    FitVerdict {
        combined,
        badge,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_strong() {
        let v = combine(Some(80.0), Some(75.0));
        assert_eq!(v.combined, Some(77.5));
        assert_eq!(v.badge, Some(FitBadge::StrongFit));
    }

    #[test]
    fn test_cv_only() {
        let v = combine(Some(80.0), None);
        assert_eq!(v.combined, None);
        assert_eq!(v.badge, Some(FitBadge::CvOnlyStrong));
        assert_eq!(combine(Some(40.0), None).badge, Some(FitBadge::CvOnlyGaps));
    }

    #[test]
    fn test_quiz_only() {
        assert_eq!(combine(None, Some(70.0)).badge, Some(FitBadge::QuizOnlyStrong));
        assert_eq!(combine(None, Some(69.9)).badge, Some(FitBadge::QuizOnlyGaps));
    }

    #[test]
    fn test_neither_channel() {
        let v = combine(None, None);
        assert_eq!(v.combined, None);
        assert_eq!(v.badge, None);
        assert!(v.message.contains("resume"));
    }

    #[test]
    fn test_mixed_channels() {
        assert_eq!(combine(Some(90.0), Some(50.0)).badge, Some(FitBadge::ImproveQuiz));
        assert_eq!(combine(Some(50.0), Some(90.0)).badge, Some(FitBadge::ImproveCv));
        assert_eq!(combine(Some(50.0), Some(50.0)).badge, Some(FitBadge::NeedsWork));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(combine(Some(70.0), Some(70.0)).badge, Some(FitBadge::StrongFit));
    }

    #[test]
    fn test_combined_rounds_to_one_decimal() {
        assert_eq!(combine(Some(60.0), Some(65.25)).combined, Some(62.6));
    }

    #[test]
    fn test_badge_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&FitBadge::CvOnlyStrong).unwrap(),
            "\"cv_only_strong\""
        );
        assert_eq!(FitBadge::NeedsWork.as_str(), "needs_work");
    }
}
