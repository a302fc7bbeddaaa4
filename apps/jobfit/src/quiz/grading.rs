//! Per-answer grading and score aggregation.
//!
//! Oracle grades arrive in one of two vocabularies. Both are parsed into
//! `RawGrade` and normalized to a single `Grade`:
//!
//! - legacy `accuracy / completeness / communication`: `sum / 15 × 100`
//! - requirement `relevance / qualification / communication`: weighted
//!   `0.4 / 0.5 / 0.1`, stored as accuracy / completeness / communication
//!
//! Every sub-score is clamped to `0..=5` and `score_pct` is rounded to one
//! decimal. Anything unparseable becomes `Grade::defensive()`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::llm_client::coerce::{as_integer, as_text};
use crate::llm_client::prompts::fill_prompt;
use crate::llm_client::{ask, parse_lenient, Oracle};
use crate::matching::round1;
use crate::models::{AnswerRow, JobId, QuestionId};
use crate::quiz::prompts::GRADE_PROMPT;
use crate::quiz::summary::{summarize, QuizSummary};
use crate::retrieval::{gather_context, Retriever};
use crate::skills::Skill;
use crate::store::GradeUpdate;

pub const DEFAULT_TIP: &str = "Clarify years, scale, and your role.";
const MAX_TIP_WORDS: usize = 20;
const MAX_SUBSCORE: i64 = 5;
const GRADE_CONTEXT_PASSAGES: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub accuracy: u8,
    pub completeness: u8,
    pub communication: u8,
    pub score_pct: f64,
    pub tip: String,
}

impl Grade {
    /// Minimal grade returned when the oracle gives nothing usable.
    pub fn defensive() -> Self {
        Self {
            accuracy: 0,
            completeness: 0,
            communication: 0,
            score_pct: 0.0,
            tip: DEFAULT_TIP.to_string(),
        }
    }

    pub fn to_update(&self) -> GradeUpdate {
        GradeUpdate {
            accuracy: self.accuracy,
            completeness: self.completeness,
            communication: self.communication,
            score_pct: self.score_pct,
            tip: self.tip.clone(),
        }
    }
}

/// An oracle grade in whichever vocabulary it was returned.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGrade {
    Legacy {
        accuracy: u8,
        completeness: u8,
        communication: u8,
        tip: String,
    },
    Requirement {
        relevance: u8,
        qualification: u8,
        communication: u8,
        tip: String,
    },
}

impl RawGrade {
    /// Reads a grade object, or the first element of an array of them.
    ///
    /// The requirement vocabulary wins when any of its keys is present.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = match value {
            Value::Object(obj) => obj,
            Value::Array(items) => items.first()?.as_object()?,
            _ => return None,
        };

        let tip = obj.get("tip").and_then(as_text).unwrap_or_default();

        if obj.contains_key("relevance") || obj.contains_key("qualification") {
            return Some(RawGrade::Requirement {
                relevance: subscore(obj, "relevance"),
                qualification: subscore(obj, "qualification"),
                communication: subscore(obj, "communication"),
                tip,
            });
        }

        if ["accuracy", "completeness", "communication"]
            .iter()
            .any(|k| obj.contains_key(*k))
        {
            return Some(RawGrade::Legacy {
                accuracy: subscore(obj, "accuracy"),
                completeness: subscore(obj, "completeness"),
                communication: subscore(obj, "communication"),
                tip,
            });
        }

        None
    }

    pub fn score_pct(&self) -> f64 {
        let pct = match self {
            RawGrade::Legacy {
                accuracy,
                completeness,
                communication,
                ..
            } => {
                let sum = f64::from(*accuracy) + f64::from(*completeness) + f64::from(*communication);
                sum * 100.0 / 15.0
            }
            RawGrade::Requirement {
                relevance,
                qualification,
                communication,
                ..
            } => {
                let weighted = 0.4 * f64::from(*relevance)
                    + 0.5 * f64::from(*qualification)
                    + 0.1 * f64::from(*communication);
                weighted * 100.0 / MAX_SUBSCORE as f64
            }
        };
        round1(pct)
    }

    pub fn into_grade(self) -> Grade {
        let score_pct = self.score_pct();
        match self {
            RawGrade::Legacy {
                accuracy,
                completeness,
                communication,
                tip,
            } => Grade {
                accuracy,
                completeness,
                communication,
                score_pct,
                tip: clean_tip(&tip),
            },
            RawGrade::Requirement {
                relevance,
                qualification,
                communication,
                tip,
            } => Grade {
                accuracy: relevance,
                completeness: qualification,
                communication,
                score_pct,
                tip: clean_tip(&tip),
            },
        }
    }
}

fn subscore(obj: &Map<String, Value>, key: &str) -> u8 {
    obj.get(key)
        .and_then(as_integer)
        .unwrap_or(0)
        .clamp(0, MAX_SUBSCORE) as u8
}

/// Tolerant parse of one oracle grading response.
pub fn parse_grade(raw: &str) -> Option<Grade> {
    let value = parse_lenient::<Value>(raw)?;
    RawGrade::from_value(&value).map(RawGrade::into_grade)
}

/// Trims the tip to its first 20 words; blank tips become the default.
pub fn clean_tip(tip: &str) -> String {
    let words: Vec<&str> = tip.split_whitespace().take(MAX_TIP_WORDS).collect();
    if words.is_empty() {
        DEFAULT_TIP.to_string()
    } else {
        words.join(" ")
    }
}

#[derive(Clone)]
pub struct Grader {
    oracle: Arc<dyn Oracle>,
    retriever: Arc<dyn Retriever>,
    timeout: Duration,
}

impl Grader {
    pub fn new(oracle: Arc<dyn Oracle>, retriever: Arc<dyn Retriever>, timeout: Duration) -> Self {
        Self {
            oracle,
            retriever,
            timeout,
        }
    }

    /// Grades one answer against the JD passages closest to the question.
    ///
    /// Always returns a grade. Blank answers, oracle failures and unusable
    /// output all yield `Grade::defensive()`.
    pub async fn grade_one(&self, job_id: JobId, question: &str, answer: &str) -> Grade {
        if answer.trim().is_empty() {
            debug!(%job_id, "Blank answer; grading defensively");
            return Grade::defensive();
        }

        let context = gather_context(
            self.retriever.as_ref(),
            job_id,
            question,
            GRADE_CONTEXT_PASSAGES,
        )
        .await;
        let prompt = fill_prompt(
            GRADE_PROMPT,
            &[("context", context.as_str()), ("question", question), ("answer", answer)],
        );

        let grade = ask(self.oracle.as_ref(), &prompt, self.timeout)
            .await
            .and_then(|raw| parse_grade(&raw))
            .unwrap_or_else(|| {
                info!(%job_id, "Unusable grade from oracle; using defensive grade");
                Grade::defensive()
            });

        debug!(%job_id, score_pct = grade.score_pct, "Graded answer");
        grade
    }

    /// Grades every `(question, answer)` pair concurrently and summarizes.
    ///
    /// `skills` only names the gaps; an empty list leaves them as raw keywords.
    pub async fn grade_many(
        &self,
        job_id: JobId,
        qas: &[(String, String)],
        skills: &[Skill],
    ) -> QuizSummary {
        let grades = join_all(
            qas.iter()
                .map(|(question, answer)| self.grade_one(job_id, question, answer)),
        )
        .await;

        let summary = summarize(qas, grades, skills);
        info!(
            %job_id,
            questions = qas.len(),
            overall = summary.overall,
            "Graded quiz"
        );
        summary
    }
}

/// One-decimal mean, 0 for no scores.
pub fn overall_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    round1(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// The authoritative answer per question: the row with the highest id.
/// Ordered by question id.
pub fn latest_per_question(answers: &[AnswerRow]) -> Vec<&AnswerRow> {
    let mut latest: BTreeMap<QuestionId, &AnswerRow> = BTreeMap::new();
    for answer in answers {
        latest
            .entry(answer.question_id)
            .and_modify(|current| {
                if answer.id > current.id {
                    *current = answer;
                }
            })
            .or_insert(answer);
    }
    latest.into_values().collect()
}
