//! Text normalization and alias expansion for skill-name matching.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

static SEPARATOR_RUNS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[_\-]+").ok());

/// Built-in equivalence groups. Each inner slice lists interchangeable spellings.
const BUILTIN_ALIASES: &[&[&str]] = &[
    &["nodejs", "node.js", "node js", "node"],
    &["reactjs", "react"],
    &["typescript", "type script"],
    &["javascript", "java script", "js"],
    &["aws s3", "amazon s3", "s3"],
    &["postgresql", "postgres", "postgre sql"],
    &["ci/cd", "cicd", "ci cd"],
    &["docker", "docker-compose", "docker compose"],
];

/// Case-folds, turns `_`/`-` runs into a space and collapses whitespace.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spaced = match SEPARATOR_RUNS.as_ref() {
        Some(re) => re.replace_all(&lowered, " ").into_owned(),
        None => lowered.replace(['_', '-'], " "),
    };
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Static table of spelling equivalences used to expand a skill name into variants.
///
/// Entries are stored normalized so lookups and document search agree on form.
#[derive(Debug, Clone)]
pub struct AliasTable {
    groups: Vec<Vec<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AliasTable {
    pub fn builtin() -> Self {
        let mut table = Self { groups: Vec::new() };
        for group in BUILTIN_ALIASES {
            table.add_group(group.iter().copied());
        }
        table
    }

    /// Built-in groups plus extra groups from a JSON file (`[["k8s", "kubernetes"], ...]`).
    pub fn with_extra_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read alias table {}", path.display()))?;
        let extra: Vec<Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("alias table {} must be a JSON array of string arrays", path.display()))?;

        let mut table = Self::builtin();
        for group in &extra {
            table.add_group(group.iter().map(String::as_str));
        }
        info!(
            extra_groups = extra.len(),
            "Loaded skill alias table from {}",
            path.display()
        );
        Ok(table)
    }

    pub fn add_group<'a>(&mut self, spellings: impl IntoIterator<Item = &'a str>) {
        let mut group: Vec<String> = Vec::new();
        for spelling in spellings {
            let normalized = normalize(spelling);
            if !normalized.is_empty() && !group.contains(&normalized) {
                group.push(normalized);
            }
        }
        if group.len() > 1 {
            self.groups.push(group);
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All spellings a skill name may appear under in normalized text.
    ///
    /// Always contains the normalized name itself. Dotted names also yield the
    /// dot-to-space form and spaced names the squashed form.
    pub fn variants(&self, skill_name: &str) -> BTreeSet<String> {
        let base = normalize(skill_name);
        let mut variants = BTreeSet::new();
        if base.is_empty() {
            return variants;
        }

        for group in &self.groups {
            if group.iter().any(|spelling| *spelling == base) {
                variants.extend(group.iter().cloned());
            }
        }
        if base.contains('.') {
            variants.insert(base.replace('.', " "));
        }
        if base.contains(' ') {
            variants.insert(base.replace(' ', ""));
        }
        variants.insert(base);
        variants
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_normalize_folds_case_and_separators() {
        assert_eq!(normalize("  CI_CD--Pipelines\n\tOwner "), "ci cd pipelines owner");
    }

    #[test]
    fn test_normalize_keeps_dots_and_slashes() {
        assert_eq!(normalize("Node.JS / CI/CD"), "node.js / ci/cd");
    }

    #[test]
    fn test_variants_expand_alias_group() {
        let table = AliasTable::builtin();
        let v = table.variants("Node.js");
        for expected in ["nodejs", "node.js", "node js", "node"] {
            assert!(v.contains(expected), "missing {expected} in {v:?}");
        }
    }

    #[test]
    fn test_variants_unknown_skill_gets_mechanical_forms() {
        let table = AliasTable::builtin();
        let v = table.variants("Spring Boot");
        assert!(v.contains("spring boot"));
        assert!(v.contains("springboot"));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_hyphenated_alias_is_stored_normalized() {
        let table = AliasTable::builtin();
        assert!(table.variants("Docker").contains("docker compose"));
    }

    #[test]
    fn test_empty_name_has_no_variants() {
        assert!(AliasTable::builtin().variants("   ").is_empty());
    }

    #[test]
    fn test_extra_groups_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[["k8s", "Kubernetes"], ["solo"]]"#).unwrap();

        let table = AliasTable::with_extra_file(file.path()).unwrap();
        assert_eq!(table.len(), BUILTIN_ALIASES.len() + 1);
        assert!(table.variants("kubernetes").contains("k8s"));
    }

    #[test]
    fn test_malformed_alias_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(AliasTable::with_extra_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_alias_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AliasTable::with_extra_file(&dir.path().join("absent.json")).is_err());
    }
}
