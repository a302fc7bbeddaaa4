//! In-memory collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::llm_client::{LlmError, Oracle};
use crate::models::{
    AnswerId, AnswerRow, JobId, JobRow, QuestionId, QuestionRow, QuizId, QuizRow, ResumeId,
    ResumeRow,
};
use crate::retrieval::{RetrievalError, Retriever};
use crate::store::{DocumentStore, GradeUpdate, StoreError};

enum Script {
    /// Responses in order; the last one repeats.
    Sequence(Mutex<VecDeque<String>>),
    /// First response whose needle occurs in the prompt.
    Keyed(Vec<(String, String)>),
    Failing,
}

pub struct ScriptedOracle {
    script: Script,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedOracle {
    pub fn new(responses: Vec<&str>) -> Self {
        Self::with_script(Script::Sequence(Mutex::new(
            responses.into_iter().map(str::to_string).collect(),
        )))
    }

    pub fn keyed(responses: Vec<(&str, &str)>) -> Self {
        Self::with_script(Script::Keyed(
            responses
                .into_iter()
                .map(|(needle, response)| (needle.to_string(), response.to_string()))
                .collect(),
        ))
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Failing)
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared call counter; stays readable after the oracle moves into an `Arc`.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.script {
            Script::Sequence(queue) => {
                let mut queue = queue.lock().unwrap();
                let next = if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                };
                next.ok_or(LlmError::EmptyContent)
            }
            Script::Keyed(responses) => responses
                .iter()
                .find(|(needle, _)| prompt.contains(needle.as_str()))
                .map(|(_, response)| response.clone())
                .ok_or(LlmError::EmptyContent),
            Script::Failing => Err(LlmError::Api {
                status: 503,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

pub struct StaticRetriever {
    passages: Vec<String>,
    failing: bool,
}

impl StaticRetriever {
    pub fn new(passages: Vec<&str>) -> Self {
        Self {
            passages: passages.into_iter().map(str::to_string).collect(),
            failing: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn failing() -> Self {
        Self {
            passages: Vec::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn retrieve(
        &self,
        _job_id: JobId,
        _query: &str,
        k: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        if self.failing {
            return Err(RetrievalError::Backend("scripted failure".to_string()));
        }
        Ok(self.passages.iter().take(k).cloned().collect())
    }
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    jobs: Vec<JobRow>,
    resumes: Vec<ResumeRow>,
    quizzes: Vec<QuizRow>,
    questions: Vec<QuestionRow>,
    answers: Vec<AnswerRow>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// `DocumentStore` over vectors. Ids come from one shared sequence, so they
/// increase in creation order across tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_job(&self, title: &str, jd_text: &str) -> Result<JobRow, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let row = JobRow {
            id: JobId(t.next_id()),
            title: title.to_string(),
            jd_text: jd_text.to_string(),
            created_at: Utc::now(),
        };
        t.jobs.push(row.clone());
        Ok(row)
    }

    async fn get_job(&self, job_id: JobId) -> Result<Option<JobRow>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn create_resume(&self, text: &str) -> Result<ResumeRow, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let row = ResumeRow {
            id: ResumeId(t.next_id()),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        t.resumes.push(row.clone());
        Ok(row)
    }

    async fn get_resume(&self, resume_id: ResumeId) -> Result<Option<ResumeRow>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.resumes.iter().find(|r| r.id == resume_id).cloned())
    }

    async fn create_quiz(&self, job_id: JobId) -> Result<QuizRow, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let row = QuizRow {
            id: QuizId(t.next_id()),
            job_id,
            created_at: Utc::now(),
        };
        t.quizzes.push(row.clone());
        Ok(row)
    }

    async fn get_quiz(&self, quiz_id: QuizId) -> Result<Option<QuizRow>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.quizzes.iter().find(|q| q.id == quiz_id).cloned())
    }

    async fn add_questions(
        &self,
        quiz_id: QuizId,
        texts: &[String],
    ) -> Result<Vec<QuestionRow>, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let mut rows = Vec::with_capacity(texts.len());
        for (idx, text) in texts.iter().enumerate() {
            let row = QuestionRow {
                id: QuestionId(t.next_id()),
                quiz_id,
                idx: idx as i32,
                text: text.clone(),
            };
            t.questions.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }

    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<QuestionRow>, StoreError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<QuestionRow> = t
            .questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        rows.sort_by_key(|q| q.idx);
        Ok(rows)
    }

    async fn add_answers(
        &self,
        quiz_id: QuizId,
        answers: &[(QuestionId, String)],
    ) -> Result<Vec<AnswerRow>, StoreError> {
        let mut t = self.tables.lock().unwrap();
        for (question_id, _) in answers {
            if !t
                .questions
                .iter()
                .any(|q| q.id == *question_id && q.quiz_id == quiz_id)
            {
                return Err(StoreError::ForeignQuestion {
                    quiz_id,
                    question_id: *question_id,
                });
            }
        }

        let mut rows = Vec::with_capacity(answers.len());
        for (question_id, text) in answers {
            let row = AnswerRow {
                id: AnswerId(t.next_id()),
                quiz_id,
                question_id: *question_id,
                text: text.clone(),
                accuracy: None,
                completeness: None,
                communication: None,
                score_pct: None,
                tip: None,
            };
            t.answers.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }

    async fn list_answers(&self, quiz_id: QuizId) -> Result<Vec<AnswerRow>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.answers
            .iter()
            .filter(|a| a.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn latest_answer(
        &self,
        quiz_id: QuizId,
        question_id: QuestionId,
    ) -> Result<Option<AnswerRow>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.answers
            .iter()
            .filter(|a| a.quiz_id == quiz_id && a.question_id == question_id)
            .max_by_key(|a| a.id)
            .cloned())
    }

    async fn update_answer_grade(
        &self,
        answer_id: AnswerId,
        grade: &GradeUpdate,
    ) -> Result<(), StoreError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(row) = t.answers.iter_mut().find(|a| a.id == answer_id) {
            row.accuracy = Some(i16::from(grade.accuracy));
            row.completeness = Some(i16::from(grade.completeness));
            row.communication = Some(i16::from(grade.communication));
            row.score_pct = Some(grade.score_pct);
            row.tip = Some(grade.tip.clone());
        }
        Ok(())
    }
}
