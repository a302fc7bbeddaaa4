use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which text-generation backend answers oracle prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleProvider {
    Ollama,
    Anthropic,
}

impl std::str::FromStr for OracleProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(OracleProvider::Ollama),
            "anthropic" => Ok(OracleProvider::Anthropic),
            other => bail!("ORACLE_PROVIDER must be 'ollama' or 'anthropic', got '{other}'"),
        }
    }
}

/// Engine configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub oracle_provider: OracleProvider,
    pub anthropic_api_key: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub oracle_timeout: Duration,
    pub skill_aliases_path: Option<PathBuf>,
    pub quiz_question_count: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let oracle_provider: OracleProvider = optional_env("ORACLE_PROVIDER")
            .unwrap_or_else(|| "ollama".to_string())
            .parse()?;

        let anthropic_api_key = optional_env("ANTHROPIC_API_KEY");
        if oracle_provider == OracleProvider::Anthropic && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY is required when ORACLE_PROVIDER=anthropic");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            oracle_provider,
            anthropic_api_key,
            ollama_url: optional_env("OLLAMA_URL")
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
            ollama_model: optional_env("OLLAMA_MODEL")
                .unwrap_or_else(|| "mistral:latest".to_string()),
            oracle_timeout: Duration::from_secs(
                optional_env("ORACLE_TIMEOUT_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse::<u64>()
                    .context("ORACLE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            skill_aliases_path: optional_env("SKILL_ALIASES_PATH").map(PathBuf::from),
            quiz_question_count: optional_env("QUIZ_QUESTION_COUNT")
                .unwrap_or_else(|| "5".to_string())
                .parse::<usize>()
                .context("QUIZ_QUESTION_COUNT must be a positive integer")?
                .max(1),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
