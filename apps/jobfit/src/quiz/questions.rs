//! JD-grounded quiz question generation.
//!
//! The oracle proposes questions; filtering, deduplication and two backfill
//! tiers (skill templates, then generic competency templates) guarantee the
//! caller gets exactly `n` distinct, non-empty questions whatever the oracle
//! returns.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm_client::coerce::as_text;
use crate::llm_client::prompts::{fill_prompt, JD_GROUNDING_INSTRUCTION};
use crate::llm_client::{ask, parse_lenient, Oracle};
use crate::matching::EvidenceMatcher;
use crate::models::JobId;
use crate::quiz::prompts::QUESTION_PROMPT;
use crate::skills::{normalize, Skill, SkillExtractor};

/// Shorter oracle questions are treated as noise.
const MIN_QUESTION_CHARS: usize = 15;

/// Normalized phrasings that carry no JD signal.
const BOILERPLATE: &[&str] = &[
    "tell me about yourself",
    "what are your strengths",
    "what are your weaknesses",
    "why do you want this job",
    "why should we hire you",
    "where do you see yourself",
    "describe a project using the core tools from this jd",
];

const GENERIC_AREAS: &[&str] = &[
    "the core technologies in this role",
    "testing and code quality",
    "system design and architecture",
    "debugging production issues",
    "code review and collaboration",
    "deployment and release practices",
];

const GENERIC_TEMPLATES: &[&str] = &[
    "How many years of hands-on experience do you have with {area}? Give one concrete example.",
    "Rate your depth in {area} from 1 to 5 and justify it with a recent project.",
    "What was your exact role the last time you worked on {area}, and what was the outcome?",
];

#[derive(Clone)]
pub struct QuestionGenerator {
    oracle: Arc<dyn Oracle>,
    extractor: SkillExtractor,
    evidence: EvidenceMatcher,
    timeout: Duration,
}

impl QuestionGenerator {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        extractor: SkillExtractor,
        evidence: EvidenceMatcher,
        timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            extractor,
            evidence,
            timeout,
        }
    }

    /// Returns exactly `n` distinct questions for the job.
    ///
    /// `context` is the JD text the oracle grounds on. Skill extraction only
    /// runs when the oracle's questions fall short.
    pub async fn generate(&self, job_id: JobId, context: &str, n: usize) -> Vec<String> {
        if n == 0 {
            return Vec::new();
        }
        let mut pool = QuestionPool::new(n, self.evidence.clone());

        if context.trim().is_empty() {
            warn!(%job_id, "No JD context for question generation; using templates");
        } else {
            let count = n.to_string();
            let prompt = fill_prompt(
                QUESTION_PROMPT,
                &[
                    ("n", count.as_str()),
                    ("grounding", JD_GROUNDING_INSTRUCTION),
                    ("context", context),
                ],
            );
            if let Some(raw) = ask(self.oracle.as_ref(), &prompt, self.timeout).await {
                for question in parse_questions(&raw) {
                    pool.push(&question);
                }
            }
        }

        let from_oracle = pool.len();
        if !pool.is_full() {
            let skills = self.extractor.extract(job_id).await;
            pool.backfill_from_skills(&skills);
        }
        pool.backfill_generic();

        info!(%job_id, n, from_oracle, "Generated quiz questions");
        pool.into_questions()
    }
}

/// Pulls question strings out of oracle output.
///
/// Accepts `[{"q": ..}]`, `[{"question": ..}]`, bare strings, or any of those
/// wrapped under `"questions"`.
pub fn parse_questions(raw: &str) -> Vec<String> {
    let Some(value) = parse_lenient::<Value>(raw) else {
        return Vec::new();
    };
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => obj.get("q").or_else(|| obj.get("question")).and_then(as_text),
            other => as_text(other),
        })
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}

/// Too short, still templated, or a known generic phrasing.
pub fn is_boilerplate(question: &str) -> bool {
    let trimmed = question.trim();
    if trimmed.chars().count() < MIN_QUESTION_CHARS {
        return true;
    }
    if trimmed.contains('{') || trimmed.contains('}') {
        return true;
    }
    let key = question_key(trimmed);
    BOILERPLATE.iter().any(|phrase| key.contains(phrase))
}

fn question_key(question: &str) -> String {
    normalize(question)
        .trim_end_matches(|c: char| matches!(c, '?' | '.' | '!') || c.is_whitespace())
        .to_string()
}

fn skill_question(skill: &str) -> String {
    format!(
        "Have you used {skill}? If yes, how many years and at what depth? Name one project where you applied it."
    )
}

/// Fixed-capacity, order-preserving set of distinct questions.
struct QuestionPool {
    target: usize,
    questions: Vec<String>,
    keys: HashSet<String>,
    evidence: EvidenceMatcher,
}

impl QuestionPool {
    fn new(target: usize, evidence: EvidenceMatcher) -> Self {
        Self {
            target,
            questions: Vec::with_capacity(target),
            keys: HashSet::new(),
            evidence,
        }
    }

    fn len(&self) -> usize {
        self.questions.len()
    }

    fn is_full(&self) -> bool {
        self.questions.len() >= self.target
    }

    fn push(&mut self, question: &str) -> bool {
        if self.is_full() || is_boilerplate(question) {
            debug!("Rejected quiz question: {question}");
            return false;
        }
        if !self.keys.insert(question_key(question)) {
            return false;
        }
        self.questions.push(question.trim().to_string());
        true
    }

    /// Word-bounded and alias-aware, so "Java" is not covered by "JavaScript".
    fn mentions(&self, skill: &str) -> bool {
        self.keys
            .iter()
            .any(|key| self.evidence.present_in_normalized(skill, key))
    }

    /// Must-haves first, then by descending importance; stable otherwise.
    fn backfill_from_skills(&mut self, skills: &[Skill]) {
        let mut ordered: Vec<&Skill> = skills.iter().collect();
        ordered.sort_by(|a, b| {
            b.must_have
                .cmp(&a.must_have)
                .then(b.importance.cmp(&a.importance))
        });

        for skill in ordered {
            if self.is_full() {
                break;
            }
            if self.mentions(&skill.name) {
                continue;
            }
            self.push(&skill_question(skill.name.trim()));
        }
    }

    fn backfill_generic(&mut self) {
        for template in GENERIC_TEMPLATES {
            for area in GENERIC_AREAS {
                if self.is_full() {
                    return;
                }
                self.push(&template.replace("{area}", area));
            }
        }

        let base = GENERIC_TEMPLATES[0].replace("{area}", GENERIC_AREAS[0]);
        let mut round = 2;
        while !self.is_full() {
            self.push(&format!("{base} (follow-up {round})"));
            round += 1;
        }
    }

    fn into_questions(self) -> Vec<String> {
        self.questions
    }
}
