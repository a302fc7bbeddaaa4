//! Turns JD context plus oracle output into a deduplicated, weighted skill list.
//!
//! Flow: retriever probe → prompt → oracle → tolerant parse → coerce → dedupe → cap.
//! Every failure along the way degrades to an empty list; callers substitute
//! `skills::or_fallback` where scoring needs at least one skill.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::llm_client::coerce::{as_flag, as_integer, as_text};
use crate::llm_client::prompts::{fill_prompt, JD_GROUNDING_INSTRUCTION};
use crate::llm_client::{ask, parse_lenient, Oracle};
use crate::models::JobId;
use crate::retrieval::{gather_context, Retriever};
use crate::skills::prompts::{SKILL_EXTRACTION_PROMPT, SKILL_PROBE_QUERY};
use crate::skills::{Skill, MAX_SKILLS};

/// Passages requested from the retriever for the extraction context.
const CONTEXT_PASSAGES: usize = 6;
const DEFAULT_IMPORTANCE: i64 = 3;

#[derive(Clone)]
pub struct SkillExtractor {
    oracle: Arc<dyn Oracle>,
    retriever: Arc<dyn Retriever>,
    timeout: Duration,
}

impl SkillExtractor {
    pub fn new(oracle: Arc<dyn Oracle>, retriever: Arc<dyn Retriever>, timeout: Duration) -> Self {
        Self {
            oracle,
            retriever,
            timeout,
        }
    }

    /// Extracts up to 15 skills for a job, ordered by first appearance.
    ///
    /// An empty result is a valid outcome (no retrievable context, oracle
    /// failure or unusable output), never an error.
    pub async fn extract(&self, job_id: JobId) -> Vec<Skill> {
        let context = gather_context(
            self.retriever.as_ref(),
            job_id,
            SKILL_PROBE_QUERY,
            CONTEXT_PASSAGES,
        )
        .await;

        if context.trim().is_empty() {
            info!(%job_id, "No JD context retrievable; skill list is empty");
            return Vec::new();
        }

        let prompt = fill_prompt(
            SKILL_EXTRACTION_PROMPT,
            &[("grounding", JD_GROUNDING_INSTRUCTION), ("context", context.as_str())],
        );

        let Some(raw) = ask(self.oracle.as_ref(), &prompt, self.timeout).await else {
            return Vec::new();
        };

        let skills = parse_skills(&raw);
        info!(%job_id, count = skills.len(), "Extracted JD skills");
        skills
    }
}

/// Parses oracle output into canonical skills.
///
/// Accepts a bare JSON array or an object wrapping one under `"skills"`.
/// Items without a usable name are dropped; importance is coerced into
/// `1..=5` (default 3) and must_have into a bool (default false). Case-folded
/// duplicates merge into the first-seen entry with the max importance and
/// OR-ed must_have. At most `MAX_SKILLS` survive.
pub fn parse_skills(raw: &str) -> Vec<Skill> {
    let Some(value) = parse_lenient::<Value>(raw) else {
        return Vec::new();
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("skills") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut skills: Vec<Skill> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for item in &items {
        let Some(skill) = coerce_skill(item) else {
            debug!("Dropping unusable skill item: {item}");
            continue;
        };

        match index_by_key.get(&skill.key()) {
            Some(&i) => {
                let existing = &mut skills[i];
                existing.importance = existing.importance.max(skill.importance);
                existing.must_have |= skill.must_have;
            }
            None => {
                index_by_key.insert(skill.key(), skills.len());
                skills.push(skill);
            }
        }
    }

    skills.truncate(MAX_SKILLS);
    skills
}

fn coerce_skill(item: &Value) -> Option<Skill> {
    let obj = item.as_object()?;
    let name = obj
        .get("skill")
        .or_else(|| obj.get("name"))
        .and_then(as_text)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let importance = obj
        .get("importance")
        .and_then(as_integer)
        .unwrap_or(DEFAULT_IMPORTANCE)
        .clamp(1, 5) as u8;
    let must_have = obj.get("must_have").and_then(as_flag).unwrap_or(false);

    Some(Skill::new(name, importance, must_have))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedOracle, StaticRetriever};

    fn extractor(oracle: ScriptedOracle, retriever: StaticRetriever) -> SkillExtractor {
        SkillExtractor::new(
            Arc::new(oracle),
            Arc::new(retriever),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_duplicate_skills_merge_to_max_importance_and_or_must_have() {
        let raw = r#"[{"skill":"Python","importance":2,"must_have":false},
                      {"skill":"python","importance":5,"must_have":true}]"#;
        let skills = parse_skills(raw);
        assert_eq!(skills, vec![Skill::new("Python", 5, true)]);
    }

    #[test]
    fn test_garbage_output_yields_empty_list() {
        assert!(parse_skills("sorry, I can't help").is_empty());
        assert!(parse_skills("42").is_empty());
        assert!(parse_skills(r#"{"skills": "none"}"#).is_empty());
    }

    #[test]
    fn test_fenced_output_is_parsed() {
        let raw = "```json\n[{\"skill\":\"Rust\",\"importance\":5,\"must_have\":true}]\n```";
        assert_eq!(parse_skills(raw), vec![Skill::new("Rust", 5, true)]);
    }

    #[test]
    fn test_wrapped_object_is_accepted() {
        let raw = r#"{"skills":[{"name":"Kafka","importance":"4","must_have":"yes"}]}"#;
        assert_eq!(parse_skills(raw), vec![Skill::new("Kafka", 4, true)]);
    }

    #[test]
    fn test_coercion_defaults_and_clamps() {
        let raw = r#"[
            {"skill":"  Go  "},
            {"skill":"SQL","importance":11,"must_have":"maybe"},
            {"skill":"Bash","importance":-3},
            {"skill":"Terraform","importance":"high"},
            {"skill":"Helm","importance":3.6}
        ]"#;
        let skills = parse_skills(raw);
        assert_eq!(
            skills,
            vec![
                Skill::new("Go", 3, false),
                Skill::new("SQL", 5, false),
                Skill::new("Bash", 1, false),
                Skill::new("Terraform", 3, false),
                Skill::new("Helm", 4, false),
            ]
        );
    }

    #[test]
    fn test_blank_and_malformed_items_are_dropped() {
        let raw = r#"[{"skill":"   "}, "Rust", {"importance":5}, {"skill":"Docker"}]"#;
        assert_eq!(parse_skills(raw), vec![Skill::new("Docker", 3, false)]);
    }

    #[test]
    fn test_list_is_capped_preserving_first_seen_order() {
        let items: Vec<String> = (0..20)
            .map(|i| format!(r#"{{"skill":"tool{i}","importance":3}}"#))
            .collect();
        let skills = parse_skills(&format!("[{}]", items.join(",")));
        assert_eq!(skills.len(), MAX_SKILLS);
        assert_eq!(skills[0].name, "tool0");
        assert_eq!(skills[14].name, "tool14");
    }

    #[test]
    fn test_first_seen_casing_is_kept() {
        let raw = r#"[{"skill":"TypeScript"},{"skill":"typescript","importance":5}]"#;
        let skills = parse_skills(raw);
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "TypeScript");
        assert_eq!(skills[0].importance, 5);
    }

    #[tokio::test]
    async fn test_extract_without_context_skips_oracle() {
        let oracle = ScriptedOracle::new(vec![r#"[{"skill":"Rust"}]"#]);
        let calls = oracle.calls();
        let skills = extractor(oracle, StaticRetriever::empty())
            .extract(JobId(1))
            .await;
        assert!(skills.is_empty());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extract_parses_oracle_output() {
        let oracle = ScriptedOracle::new(vec![
            r#"[{"skill":"Rust","importance":5,"must_have":true},{"skill":"Kubernetes","importance":3}]"#,
        ]);
        let retriever = StaticRetriever::new(vec!["Required: 5+ years Rust.", "Kubernetes a plus."]);
        let skills = extractor(oracle, retriever).extract(JobId(1)).await;
        assert_eq!(
            skills,
            vec![Skill::new("Rust", 5, true), Skill::new("Kubernetes", 3, false)]
        );
    }

    #[tokio::test]
    async fn test_extract_degrades_on_oracle_failure() {
        let retriever = StaticRetriever::new(vec!["Required: Rust."]);
        let skills = extractor(ScriptedOracle::failing(), retriever)
            .extract(JobId(1))
            .await;
        assert!(skills.is_empty());
    }

    #[tokio::test]
    async fn test_extract_degrades_on_retrieval_failure() {
        let oracle = ScriptedOracle::new(vec![r#"[{"skill":"Rust"}]"#]);
        let skills = extractor(oracle, StaticRetriever::failing())
            .extract(JobId(1))
            .await;
        assert!(skills.is_empty());
    }
}
