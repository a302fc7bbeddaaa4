//! Decides whether a skill is textually evidenced in a document.
//!
//! Deliberately lexical: alias-aware substring search with loose word
//! boundaries. Paraphrased skills ("built REST services" for "API design") are
//! missed; that false-negative rate is accepted over fuzzier matching that
//! would raise false positives.

use std::sync::Arc;

use crate::skills::{normalize, AliasTable};

#[derive(Debug, Clone)]
pub struct EvidenceMatcher {
    aliases: Arc<AliasTable>,
}

impl Default for EvidenceMatcher {
    fn default() -> Self {
        Self::new(Arc::new(AliasTable::builtin()))
    }
}

impl EvidenceMatcher {
    pub fn new(aliases: Arc<AliasTable>) -> Self {
        Self { aliases }
    }

    /// True when any spelling of `skill_name` occurs in `document`.
    pub fn present(&self, skill_name: &str, document: &str) -> bool {
        self.present_in_normalized(skill_name, &normalize(document))
    }

    /// Same as `present`, for a document already passed through `normalize`.
    pub fn present_in_normalized(&self, skill_name: &str, normalized_doc: &str) -> bool {
        self.aliases
            .variants(skill_name)
            .iter()
            .any(|variant| contains_bounded(normalized_doc, variant))
    }
}

/// Substring search that rejects hits embedded in a longer alphanumeric token.
///
/// A boundary is only enforced on a side where the needle itself starts or
/// ends with an alphanumeric character, so needles edged by punctuation
/// (".net", "c++") match more loosely.
fn contains_bounded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let check_left = needle.chars().next().is_some_and(char::is_alphanumeric);
    let check_right = needle.chars().last().is_some_and(char::is_alphanumeric);

    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let left_ok = !check_left
            || !haystack[..start]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
        let right_ok = !check_right
            || !haystack[end..]
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric);
        left_ok && right_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> EvidenceMatcher {
        EvidenceMatcher::default()
    }

    #[test]
    fn test_alias_spelling_is_found() {
        assert!(matcher().present("Node.js", "I built an app with node js and postgres"));
        assert!(matcher().present("PostgreSQL", "I built an app with node js and postgres"));
    }

    #[test]
    fn test_no_match_inside_longer_word() {
        assert!(!matcher().present("React", "reactive programming"));
        assert!(!matcher().present("Go", "good communication"));
    }

    #[test]
    fn test_match_at_text_edges_and_punctuation() {
        assert!(matcher().present("Rust", "rust"));
        assert!(matcher().present("Rust", "Skills: Rust, Go."));
        assert!(matcher().present("Kubernetes", "(Kubernetes)"));
    }

    #[test]
    fn test_separators_are_normalized_on_both_sides() {
        assert!(matcher().present("CI/CD", "Owned the CI-CD pipeline"));
        assert!(matcher().present("docker compose", "wrote docker_compose files"));
    }

    #[test]
    fn test_squashed_variant_matches() {
        assert!(matcher().present("Spring Boot", "Built services in SpringBoot"));
    }

    #[test]
    fn test_punctuation_edged_variant_matches_loosely() {
        assert!(matcher().present(".NET", "ASP.NET developer"));
        assert!(matcher().present("C++", "modern c++17 codebase"));
    }

    #[test]
    fn test_later_occurrence_is_found_after_embedded_one() {
        assert!(matcher().present("Java", "javascript first, then Java"));
    }

    #[test]
    fn test_absent_skill() {
        assert!(!matcher().present("Kafka", "Python and Django developer"));
    }

    #[test]
    fn test_blank_skill_never_matches() {
        assert!(!matcher().present("  ", "anything at all"));
    }

    #[test]
    fn test_custom_alias_group() {
        let mut table = AliasTable::builtin();
        table.add_group(["kubernetes", "k8s"]);
        let matcher = EvidenceMatcher::new(Arc::new(table));
        assert!(matcher.present("Kubernetes", "ran workloads on k8s"));
    }
}
