//! Engine facade: the operations an embedding transport calls.
//!
//! Built once at startup with its collaborators (document store, oracle,
//! retriever, alias table) and shared by clone; every field is an `Arc` or
//! cheap to clone.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::errors::AppError;
use crate::llm_client::{build_oracle, Oracle};
use crate::matching::{combine, CvAligner, EvidenceMatcher, FitVerdict, MatchResult};
use crate::models::{JobId, JobRow, ResumeId};
use crate::quiz::prompts::QUIZ_PROBE_QUERY;
use crate::quiz::{Grade, Grader, QuestionGenerator, QuizSummary};
use crate::retrieval::{gather_context, PassageRetriever, Retriever};
use crate::skills::{or_fallback, AliasTable, Skill, SkillExtractor};
use crate::store::{DocumentStore, PgStore};

/// Passages pulled when the stored JD text is empty.
const QUIZ_CONTEXT_PASSAGES: usize = 8;
pub const DEFAULT_QUESTION_COUNT: usize = 5;

#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn DocumentStore>,
    retriever: Arc<dyn Retriever>,
    extractor: SkillExtractor,
    questions: QuestionGenerator,
    grader: Grader,
    aligner: CvAligner,
    question_count: usize,
}

impl Engine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        oracle: Arc<dyn Oracle>,
        retriever: Arc<dyn Retriever>,
        aliases: Arc<AliasTable>,
        oracle_timeout: Duration,
    ) -> Self {
        let extractor = SkillExtractor::new(oracle.clone(), retriever.clone(), oracle_timeout);
        Self {
            questions: QuestionGenerator::new(
                oracle.clone(),
                extractor.clone(),
                EvidenceMatcher::new(aliases.clone()),
                oracle_timeout,
            ),
            grader: Grader::new(oracle, retriever.clone(), oracle_timeout),
            aligner: CvAligner::new(EvidenceMatcher::new(aliases)),
            extractor,
            store,
            retriever,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    pub fn with_question_count(mut self, n: usize) -> Self {
        self.question_count = n.max(1);
        self
    }

    /// Wires the Postgres store, configured oracle, passage retriever and
    /// alias table.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let pool = db::create_pool(&config.database_url).await?;
        let store: Arc<dyn DocumentStore> = Arc::new(PgStore::new(pool));

        let oracle = build_oracle(config).map_err(|e| AppError::Config(e.to_string()))?;
        let retriever: Arc<dyn Retriever> = Arc::new(PassageRetriever::new(store.clone()));

        let aliases = match &config.skill_aliases_path {
            Some(path) => AliasTable::with_extra_file(path)
                .with_context(|| format!("SKILL_ALIASES_PATH={}", path.display()))?,
            None => AliasTable::builtin(),
        };
        info!(
            provider = ?config.oracle_provider,
            alias_groups = aliases.len(),
            "Engine ready"
        );

        Ok(Self::new(
            store,
            oracle,
            retriever,
            Arc::new(aliases),
            config.oracle_timeout,
        )
        .with_question_count(config.quiz_question_count))
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Question count used when a quiz is started without an explicit `n`.
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub async fn ingest_job(&self, title: &str, jd_text: &str) -> Result<JobId, AppError> {
        if jd_text.trim().is_empty() {
            return Err(AppError::EmptyInput("job description text is empty".to_string()));
        }
        let job = self.store.create_job(title.trim(), jd_text).await?;
        info!(job_id = %job.id, chars = jd_text.chars().count(), "Job ingested");
        Ok(job.id)
    }

    pub async fn ingest_resume(&self, text: &str) -> Result<ResumeId, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::EmptyInput("resume text is empty".to_string()));
        }
        let resume = self.store.create_resume(text).await?;
        info!(resume_id = %resume.id, chars = text.chars().count(), "Resume ingested");
        Ok(resume.id)
    }

    pub(crate) async fn require_job(&self, job_id: JobId) -> Result<JobRow, AppError> {
        self.store
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))
    }

    /// Extracted skills; may be empty.
    pub async fn extract_skills(&self, job_id: JobId) -> Result<Vec<Skill>, AppError> {
        self.require_job(job_id).await?;
        Ok(self.extractor.extract(job_id).await)
    }

    /// Extracted skills, or the single fallback skill when extraction is empty.
    pub async fn skills_or_fallback(&self, job_id: JobId) -> Result<Vec<Skill>, AppError> {
        Ok(or_fallback(self.extract_skills(job_id).await?))
    }

    pub fn score_cv(&self, resume_text: &str, skills: &[Skill]) -> Result<MatchResult, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::EmptyInput("resume text is empty".to_string()));
        }
        let result = self.aligner.score(resume_text, skills);
        info!(
            score = result.score,
            matched = result.matched,
            total_skills = result.total_skills,
            "CV scored"
        );
        Ok(result)
    }

    /// Exactly `n` distinct questions grounded in the job's JD.
    ///
    /// The full stored JD is the preferred context; retrieval is used only
    /// when it is empty.
    pub async fn make_questions(&self, job_id: JobId, n: usize) -> Result<Vec<String>, AppError> {
        let job = self.require_job(job_id).await?;
        let context = if job.jd_text.trim().is_empty() {
            gather_context(
                self.retriever.as_ref(),
                job_id,
                QUIZ_PROBE_QUERY,
                QUIZ_CONTEXT_PASSAGES,
            )
            .await
        } else {
            job.jd_text
        };
        Ok(self.questions.generate(job_id, &context, n).await)
    }

    pub async fn grade_one(&self, job_id: JobId, question: &str, answer: &str) -> Grade {
        self.grader.grade_one(job_id, question, answer).await
    }

    /// Extracts the job's skills to name the gaps, then grades all pairs
    /// concurrently.
    pub async fn grade_many(&self, job_id: JobId, qas: &[(String, String)]) -> QuizSummary {
        let skills = if qas.is_empty() {
            Vec::new()
        } else {
            self.extractor.extract(job_id).await
        };
        self.grader.grade_many(job_id, qas, &skills).await
    }

    pub fn combine_fit(&self, cv_score: Option<f64>, quiz_score: Option<f64>) -> FitVerdict {
        combine(cv_score, quiz_score)
    }
}
