//! CV alignment: scores a résumé against a weighted skill list.
//!
//! Algorithm:
//! 1. For each skill, weight `w` = 1.0 + 0.5 × (importance − 1) (+1.0 if must-have)
//! 2. Evidenced skills add `w` to the score; the rest become gaps, in skill order
//! 3. score = round(100 × Σw(matched) / max(Σw(all), 1.0), 1)
//!
//! The gap list is never truncated here. Display caps belong to the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::evidence::EvidenceMatcher;
use crate::matching::round1;
use crate::skills::{normalize, Skill};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub gaps: Vec<String>,
    pub matched: usize,
    pub total_skills: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CvAligner {
    evidence: EvidenceMatcher,
}

impl CvAligner {
    pub fn new(evidence: EvidenceMatcher) -> Self {
        Self { evidence }
    }

    pub fn score(&self, resume_text: &str, skills: &[Skill]) -> MatchResult {
        let body = normalize(resume_text);
        let mut total = 0.0_f64;
        let mut earned = 0.0_f64;
        let mut matched = 0;
        let mut gaps = Vec::new();

        for skill in skills {
            let w = skill.weight();
            total += w;
            if self.evidence.present_in_normalized(&skill.name, &body) {
                earned += w;
                matched += 1;
            } else {
                gaps.push(skill.name.clone());
            }
        }

        let score = round1(100.0 * earned / total.max(1.0));
        debug!(score, matched, total_skills = skills.len(), "CV scored");

        MatchResult {
            score,
            gaps,
            matched,
            total_skills: skills.len(),
        }
    }
}
