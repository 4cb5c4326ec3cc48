//! Storage trait abstraction.

use async_trait::async_trait;
use studytrack_core::{HistoryDocument, ProgressDocument};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for the two StudyTrack documents.
///
/// Loads return `Ok(None)` when the document has never been written.
/// Saves replace the whole document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the current-progress document.
    async fn load_current(&self) -> Result<Option<ProgressDocument>>;

    /// Replace the current-progress document.
    async fn save_current(&mut self, doc: &ProgressDocument) -> Result<()>;

    /// Load the historical document.
    async fn load_historical(&self) -> Result<Option<HistoryDocument>>;

    /// Replace the historical document.
    async fn save_historical(&mut self, doc: &HistoryDocument) -> Result<()>;
}
