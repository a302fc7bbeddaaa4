//! The narrow interface through which the engine reads JD passages.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::JobId;
use crate::store::StoreError;

pub mod chunker;
pub mod passages;

pub use passages::PassageRetriever;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("document store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("retrieval backend error: {0}")]
    Backend(String),
}

/// Returns up to `k` JD passages for a job, most relevant first.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(
        &self,
        job_id: JobId,
        query: &str,
        k: usize,
    ) -> Result<Vec<String>, RetrievalError>;
}

/// Retrieves passages and joins them with blank lines.
///
/// Retrieval errors are logged and produce an empty context, which callers
/// treat as a low-information state rather than a failure.
pub async fn gather_context(
    retriever: &dyn Retriever,
    job_id: JobId,
    query: &str,
    k: usize,
) -> String {
    match retriever.retrieve(job_id, query, k).await {
        Ok(passages) => {
            debug!(%job_id, passages = passages.len(), "Retrieved JD context");
            passages
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n")
        }
        Err(e) => {
            warn!(%job_id, "Retrieval failed, continuing without context: {e}");
            String::new()
        }
    }
}
