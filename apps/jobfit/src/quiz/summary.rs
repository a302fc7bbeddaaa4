//! Aggregates per-question grades into an overall score and a gap summary.
//!
//! Questions under 60% are weak. Their keywords become gaps, mapped onto the
//! job's extracted skill names where a token and a skill contain one another.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::FIT_THRESHOLD;
use crate::quiz::grading::{overall_score, Grade};
use crate::skills::{normalize, Skill};

pub const WEAK_QUESTION_PCT: f64 = 60.0;
const MAX_KEYWORDS_PER_QUESTION: usize = 6;
const MAX_GAPS: usize = 8;
/// Tokens or skill names shorter than this only map on exact equality.
const MIN_CONTAINMENT_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "an", "and", "any", "applied", "are", "as", "at", "be", "been", "by",
    "can", "concrete", "could", "depth", "describe", "did", "do", "does", "example", "exact",
    "experience", "explain", "for", "from", "give", "hands", "have", "how", "if", "in", "into",
    "is", "it", "its", "justify", "last", "many", "me", "my", "name", "of", "on", "one", "or",
    "our", "outcome", "project", "rate", "recent", "role", "that", "the", "their", "this",
    "time", "to", "used", "using", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "why", "will", "with", "worked", "would", "years", "yes", "you", "your",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizMatch {
    pub score: f64,
    pub gaps: Vec<String>,
    pub matched: usize,
    pub total_skills: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionFeedback {
    pub index: usize,
    pub score: f64,
    pub tip: String,
}

/// Result of grading a whole quiz. `grades` and `feedback` follow question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub overall: f64,
    pub grades: Vec<Grade>,
    pub feedback: Vec<QuestionFeedback>,
    pub quiz_match: QuizMatch,
}

/// Builds the summary for graded `(question, answer)` pairs.
///
/// `grades[i]` must be the grade of `qas[i]`.
pub fn summarize(qas: &[(String, String)], grades: Vec<Grade>, skills: &[Skill]) -> QuizSummary {
    let scores: Vec<f64> = grades.iter().map(|g| g.score_pct).collect();
    let overall = overall_score(&scores);

    let weak: Vec<&str> = qas
        .iter()
        .zip(&grades)
        .filter(|(_, g)| g.score_pct < WEAK_QUESTION_PCT)
        .map(|((q, _), _)| q.as_str())
        .collect();

    let gaps = weak_area_gaps(&weak, skills);
    let quiz_match = QuizMatch {
        score: overall,
        matched: qas.len() - weak.len(),
        total_skills: qas.len(),
        message: quiz_message(overall, &gaps),
        gaps,
    };

    let feedback = grades
        .iter()
        .enumerate()
        .map(|(index, g)| QuestionFeedback {
            index,
            score: g.score_pct,
            tip: g.tip.clone(),
        })
        .collect();

    QuizSummary {
        overall,
        grades,
        feedback,
        quiz_match,
    }
}

fn weak_area_gaps(weak_questions: &[&str], skills: &[Skill]) -> Vec<String> {
    let skill_keys: Vec<(String, &str)> = skills
        .iter()
        .map(|s| (normalize(&s.name), s.name.as_str()))
        .collect();

    let mut seen = HashSet::new();
    let mut gaps = Vec::new();
    for question in weak_questions {
        for token in keyword_tokens(question) {
            let gap = skill_keys
                .iter()
                .find(|(key, _)| related(&token, key))
                .map(|(_, name)| name.to_string())
                .unwrap_or(token);
            if seen.insert(gap.to_lowercase()) {
                gaps.push(gap);
            }
            if gaps.len() >= MAX_GAPS {
                return gaps;
            }
        }
    }
    gaps
}

fn related(token: &str, skill_key: &str) -> bool {
    if skill_key.is_empty() {
        return false;
    }
    token == skill_key
        || (token.chars().count() >= MIN_CONTAINMENT_CHARS && skill_key.contains(token))
        || (skill_key.chars().count() >= MIN_CONTAINMENT_CHARS && token.contains(skill_key))
}

/// Lowercased content words of a question, first six distinct.
///
/// Punctuation is stripped except `+ . # /` so names like `c++`, `node.js`
/// and `ci/cd` survive.
pub fn keyword_tokens(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '+' | '.' | '#' | '/') {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut seen = HashSet::new();
    cleaned
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| c == '.' || c == '/'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| !STOPWORDS.contains(t))
        .filter(|t| seen.insert(t.to_string()))
        .take(MAX_KEYWORDS_PER_QUESTION)
        .map(str::to_string)
        .collect()
}

fn quiz_message(overall: f64, gaps: &[String]) -> String {
    if overall >= FIT_THRESHOLD {
        return "Good overall alignment.".to_string();
    }
    if gaps.is_empty() {
        return "Strengthen your answers with concrete years, scale, and your own role.".to_string();
    }
    let focus: Vec<&str> = gaps.iter().take(3).map(String::as_str).collect();
    format!(
        "Strengthen your answers on {}: give concrete years, scale, and your own role.",
        focus.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(score_pct: f64) -> Grade {
        Grade {
            accuracy: 0,
            completeness: 0,
            communication: 0,
            score_pct,
            tip: format!("tip {score_pct}"),
        }
    }

    fn qa(q: &str) -> (String, String) {
        (q.to_string(), "some answer".to_string())
    }

    #[test]
    fn test_keyword_tokens_drop_template_words() {
        let tokens = keyword_tokens(
            "Have you used Kafka? If yes, how many years and at what depth? Name one project where you applied it.",
        );
        assert_eq!(tokens, vec!["kafka"]);
    }

    #[test]
    fn test_keyword_tokens_keep_symbolic_names() {
        let tokens = keyword_tokens("Have you shipped C++, Node.js and CI/CD pipelines in 2023?");
        assert_eq!(tokens, vec!["shipped", "c++", "node.js", "ci/cd", "pipelines"]);
    }

    #[test]
    fn test_keyword_tokens_cap_per_question() {
        let tokens = keyword_tokens("alpha beta gamma delta epsilon zeta eta theta");
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[5], "zeta");
    }

    #[test]
    fn test_weak_questions_map_to_skills() {
        let qas = vec![
            qa("Have you used Kafka? If yes, how many years and at what depth?"),
            qa("Have you used Rust? If yes, how many years?"),
            qa("How many years of Kubernetes cluster operations do you have?"),
        ];
        let skills = vec![Skill::new("Kafka", 4, true), Skill::new("Kubernetes", 3, false)];
        let summary = summarize(&qas, vec![grade(30.0), grade(90.0), grade(50.0)], &skills);

        assert_eq!(summary.overall, 56.7);
        assert_eq!(summary.quiz_match.score, 56.7);
        assert_eq!(
            summary.quiz_match.gaps,
            vec!["Kafka", "Kubernetes", "cluster", "operations"]
        );
        assert_eq!(summary.quiz_match.matched, 1);
        assert_eq!(summary.quiz_match.total_skills, 3);
        assert!(summary.quiz_match.message.contains("Kafka"));
        assert_eq!(summary.feedback[1].score, 90.0);
        assert_eq!(summary.feedback[1].tip, "tip 90");
    }

    #[test]
    fn test_strong_quiz_has_no_gaps() {
        let qas = vec![qa("Have you used Rust?"), qa("Have you used Go?")];
        let summary = summarize(&qas, vec![grade(80.0), grade(70.0)], &[]);
        assert_eq!(summary.overall, 75.0);
        assert!(summary.quiz_match.gaps.is_empty());
        assert_eq!(summary.quiz_match.matched, 2);
        assert_eq!(summary.quiz_match.message, "Good overall alignment.");
    }

    #[test]
    fn test_gaps_are_deduped_and_capped() {
        let qas: Vec<(String, String)> = (0..4)
            .map(|i| qa(&format!("kafka topic{i}a topic{i}b topic{i}c")))
            .collect();
        let grades = vec![grade(0.0), grade(0.0), grade(0.0), grade(0.0)];
        let summary = summarize(&qas, grades, &[Skill::new("Kafka", 3, false)]);
        assert_eq!(summary.quiz_match.gaps.len(), 8);
        assert_eq!(summary.quiz_match.gaps.iter().filter(|g| *g == "Kafka").count(), 1);
    }

    #[test]
    fn test_empty_quiz() {
        let summary = summarize(&[], Vec::new(), &[]);
        assert_eq!(summary.overall, 0.0);
        assert_eq!(summary.quiz_match.matched, 0);
        assert_eq!(summary.quiz_match.total_skills, 0);
        assert!(summary.feedback.is_empty());
    }

    #[test]
    fn test_short_tokens_do_not_map_by_containment() {
        let gaps = weak_area_gaps(&["Have you used Go for google cloud?"], &[Skill::new("Go", 3, false)]);
        assert_eq!(gaps, vec!["Go", "google", "cloud"]);
    }
}
