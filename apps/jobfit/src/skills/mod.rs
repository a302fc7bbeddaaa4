//! Weighted skill requirements extracted from a job description.

use serde::{Deserialize, Serialize};

pub mod extractor;
pub mod normalize;
pub mod prompts;

pub use extractor::SkillExtractor;
pub use normalize::{normalize, AliasTable};

/// Most skills kept from one extraction.
pub const MAX_SKILLS: usize = 15;

/// Skill substituted when extraction yields nothing, so scoring never runs on
/// an empty list.
pub const FALLBACK_SKILL: &str = "communication";

/// A named competency with an importance in `1..=5` and a must-have flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(alias = "skill")]
    pub name: String,
    pub importance: u8,
    pub must_have: bool,
}

impl Skill {
    pub fn new(name: impl Into<String>, importance: u8, must_have: bool) -> Self {
        Self {
            name: name.into(),
            importance: importance.clamp(1, 5),
            must_have,
        }
    }

    /// Low-weight default used when a job yields no skills.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_SKILL, 3, false)
    }

    /// Case-folded, trimmed name; two skills with the same key are the same skill.
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// `1.0 + 0.5 * (importance - 1)`, plus `1.0` for must-haves. Range `[1.0, 4.0]`.
    pub fn weight(&self) -> f64 {
        let importance = self.importance.clamp(1, 5) as f64;
        let base = 1.0 + 0.5 * (importance - 1.0);
        if self.must_have {
            base + 1.0
        } else {
            base
        }
    }
}

/// Returns `skills` unchanged, or the single fallback skill when it is empty.
pub fn or_fallback(skills: Vec<Skill>) -> Vec<Skill> {
    if skills.is_empty() {
        vec![Skill::fallback()]
    } else {
        skills
    }
}
