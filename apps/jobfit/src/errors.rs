use thiserror::Error;

use crate::store::StoreError;

/// Engine-level error type.
///
/// Only missing entities, blank required input and broken persistence surface
/// here. Oracle and retrieval trouble is absorbed where it happens and never
/// reaches this enum.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures caused by the caller's request (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::EmptyInput(_) | AppError::InvalidState(_)
        )
    }

    /// Stable machine-readable code for an embedding transport.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::EmptyInput(_) => "EMPTY_INPUT",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                "STORE_ERROR"
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {msg}");
                "CONFIG_ERROR"
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "INTERNAL_ERROR"
            }
        }
    }
}
