//! In-memory storage, mainly for tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use studytrack_core::{HistoryDocument, ProgressDocument};
use super::{DocumentStore, Result, StorageError};

#[derive(Debug, Default)]
struct Slots {
    current: Option<ProgressDocument>,
    historical: Option<HistoryDocument>,
    current_writes: usize,
    historical_writes: usize,
    fail_writes: bool,
}

/// Storage backend that keeps both documents in memory.
///
/// Clones share the same slots, so a test can keep a handle after giving the
/// store away and inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<Slots>>,
}

impl MemoryStore {
    /// Empty store: both documents absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with documents.
    pub fn with_documents(
        current: Option<ProgressDocument>,
        historical: Option<HistoryDocument>,
    ) -> Self {
        let store = Self::default();
        {
            let mut slots = store.lock();
            slots.current = current;
            slots.historical = historical;
        }
        store
    }

    /// Make every subsequent save fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of successful current-document saves.
    pub fn current_writes(&self) -> usize {
        self.lock().current_writes
    }

    /// Number of successful historical-document saves.
    pub fn historical_writes(&self) -> usize {
        self.lock().historical_writes
    }

    /// Last saved current document.
    pub fn current(&self) -> Option<ProgressDocument> {
        self.lock().current.clone()
    }

    /// Last saved historical document.
    pub fn historical(&self) -> Option<HistoryDocument> {
        self.lock().historical.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write_refused() -> StorageError {
    StorageError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "writes disabled",
    ))
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn load_current(&self) -> Result<Option<ProgressDocument>> {
        Ok(self.lock().current.clone())
    }

    async fn save_current(&mut self, doc: &ProgressDocument) -> Result<()> {
        let mut slots = self.lock();
        if slots.fail_writes {
            return Err(write_refused());
        }
        slots.current = Some(doc.clone());
        slots.current_writes += 1;
        Ok(())
    }

    async fn load_historical(&self) -> Result<Option<HistoryDocument>> {
        Ok(self.lock().historical.clone())
    }

    async fn save_historical(&mut self, doc: &HistoryDocument) -> Result<()> {
        let mut slots = self.lock();
        if slots.fail_writes {
            return Err(write_refused());
        }
        slots.historical = Some(doc.clone());
        slots.historical_writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_slots() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();

        store.save_current(&ProgressDocument::default()).await.unwrap();
        assert_eq!(handle.current_writes(), 1);
        assert_eq!(handle.current(), Some(ProgressDocument::default()));
    }

    #[tokio::test]
    async fn test_failing_writes_keep_previous_document() {
        let mut store = MemoryStore::with_documents(None, Some(HistoryDocument::default()));
        store.fail_writes(true);

        let mut history = HistoryDocument::default();
        history.buckets.insert("Math".into(), Default::default());
        assert!(store.save_historical(&history).await.is_err());
        assert_eq!(store.historical(), Some(HistoryDocument::default()));
        assert_eq!(store.historical_writes(), 0);
    }
}
