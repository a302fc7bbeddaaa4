//! Passage retriever over the stored JD text.
//!
//! Chunks the job's JD on each call and ranks chunks by lexical overlap with
//! the query. Jobs are addressed by `JobId` end to end; nothing derives an
//! index handle from the id.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::models::JobId;
use crate::retrieval::chunker::{chunk, CHUNK_CHARS, CHUNK_OVERLAP};
use crate::retrieval::{RetrievalError, Retriever};
use crate::skills::normalize;
use crate::store::DocumentStore;

const MIN_QUERY_TOKEN_CHARS: usize = 3;

#[derive(Clone)]
pub struct PassageRetriever {
    store: Arc<dyn DocumentStore>,
}

impl PassageRetriever {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Retriever for PassageRetriever {
    async fn retrieve(
        &self,
        job_id: JobId,
        query: &str,
        k: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        let Some(job) = self.store.get_job(job_id).await? else {
            debug!(%job_id, "No stored job; nothing to retrieve");
            return Ok(Vec::new());
        };
        Ok(rank_passages(&job.jd_text, query, k))
    }
}

/// Top `k` chunks of `text` by distinct query-token hits, ties in document order.
pub fn rank_passages(text: &str, query: &str, k: usize) -> Vec<String> {
    let query_tokens = tokens(query);
    let mut scored: Vec<(usize, String)> = chunk(text, CHUNK_CHARS, CHUNK_OVERLAP)
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .map(|c| {
            let chunk_tokens = tokens(&c);
            let hits = query_tokens
                .iter()
                .filter(|t| chunk_tokens.iter().any(|ct| ct.starts_with(t.as_str())))
                .count();
            (hits, c)
        })
        .collect();

    // stable: equal scores keep document order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(k).map(|(_, c)| c).collect()
}

fn tokens(text: &str) -> HashSet<String> {
    normalize(text)
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/')))
        .map(|t| t.trim_matches('.'))
        .filter(|t| t.chars().count() >= MIN_QUERY_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}
