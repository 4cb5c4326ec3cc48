//! Progress store - the single owner of both documents.

use std::sync::Arc;
use studytrack_core::{
    Clock, HistoryDocument, Module, ModuleSummary, ModuleView, ProgressDocument, Subject,
    SubjectStatus, SystemClock, format_date,
};
use studytrack_storage::{DocumentStore, StorageError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Error type for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors returned by [`ProgressStore`].
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// A module or subject name was blank
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// Module does not exist
    #[error("Module '{0}' not found")]
    ModuleNotFound(String),

    /// Subject does not exist in the module
    #[error("Subject '{subject}' not found in module '{module}'")]
    SubjectNotFound {
        /// Module searched
        module: String,
        /// Missing subject
        subject: String,
    },

    /// Reading or writing a document failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProgressError {
    /// Whether the error names a missing module or subject.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModuleNotFound(_) | Self::SubjectNotFound { .. })
    }
}

struct Inner<S> {
    backend: S,
    current: ProgressDocument,
    historical: HistoryDocument,
}

/// Owns the current-progress and historical documents.
///
/// Every operation holds one async mutex for its whole read-modify-write
/// cycle. Mutations work on copies; a copy replaces the in-memory document
/// only once it has been written, so memory never runs ahead of disk.
pub struct ProgressStore<S: DocumentStore> {
    inner: Mutex<Inner<S>>,
    clock: Arc<dyn Clock>,
}

impl<S: DocumentStore> ProgressStore<S> {
    /// Open the store using the local date.
    pub async fn open(backend: S) -> Result<Self> {
        Self::open_with_clock(backend, Arc::new(SystemClock)).await
    }

    /// Open the store with an explicit clock.
    ///
    /// Missing documents are seeded and written immediately. A document that
    /// exists but cannot be parsed is an error.
    pub async fn open_with_clock(mut backend: S, clock: Arc<dyn Clock>) -> Result<Self> {
        let current = match backend.load_current().await? {
            Some(doc) => {
                let unknown = count_unknown_statuses(&doc);
                if unknown > 0 {
                    warn!(unknown, "progress document holds statuses outside the known vocabulary");
                }
                doc
            }
            None => {
                let doc = ProgressDocument::seeded(clock.today());
                backend.save_current(&doc).await?;
                info!(modules = doc.modules.len(), "seeded default progress document");
                doc
            }
        };

        let historical = match backend.load_historical().await? {
            Some(doc) => doc,
            None => {
                let doc = HistoryDocument::default();
                backend.save_historical(&doc).await?;
                info!("created empty historical document");
                doc
            }
        };

        Ok(Self {
            inner: Mutex::new(Inner {
                backend,
                current,
                historical,
            }),
            clock,
        })
    }

    /// The full current-progress document.
    pub async fn get_current_data(&self) -> ProgressDocument {
        self.inner.lock().await.current.clone()
    }

    /// The full historical document.
    pub async fn get_historical_data(&self) -> HistoryDocument {
        self.inner.lock().await.historical.clone()
    }

    /// Both documents, read under one lock.
    pub async fn snapshot(&self) -> (ProgressDocument, HistoryDocument) {
        let inner = self.inner.lock().await;
        (inner.current.clone(), inner.historical.clone())
    }

    /// A module with its point history, or `None` if it does not exist.
    pub async fn get_module_data(&self, name: &str) -> Option<ModuleView> {
        let inner = self.inner.lock().await;
        let module = inner.current.modules.get(name)?;
        debug!(module = name, "module lookup");

        Some(ModuleView {
            name: name.to_string(),
            current: module.clone(),
            historical: inner.historical.bucket(name).cloned().unwrap_or_default(),
        })
    }

    /// Per-module status counts and points.
    pub async fn summary(&self) -> Vec<ModuleSummary> {
        let inner = self.inner.lock().await;
        inner
            .current
            .modules
            .iter()
            .map(|(name, module)| ModuleSummary::of(name, module))
            .collect()
    }

    /// Set a subject's status, creating the module and subject as needed.
    ///
    /// Records the module's new point total under today's date, replacing
    /// any total already recorded today, then writes both documents.
    pub async fn update_status(
        &self,
        module: &str,
        subject: &str,
        status: SubjectStatus,
    ) -> Result<Subject> {
        require_name("Module", module)?;
        require_name("Subject", subject)?;
        let today = self.clock.today();

        let mut inner = self.inner.lock().await;
        let mut current = inner.current.clone();
        let mut historical = inner.historical.clone();

        let entry = current.modules.entry(module.to_string()).or_default();
        let created = entry.upsert_subject(subject, status.clone());
        let points = entry.points();
        historical.record(module, today, points);

        inner.backend.save_current(&current).await?;
        inner.current = current;
        inner.backend.save_historical(&historical).await?;
        inner.historical = historical;

        info!(
            module,
            subject,
            status = %status,
            points,
            created,
            "updated subject status"
        );
        Ok(Subject::new(subject, status))
    }

    /// Remove one subject from a module.
    ///
    /// Nothing is written when the module or subject is missing. History is
    /// left untouched.
    pub async fn delete_subject(&self, module: &str, subject: &str) -> Result<Subject> {
        let mut inner = self.inner.lock().await;

        let mut current = inner.current.clone();
        let entry = current
            .modules
            .get_mut(module)
            .ok_or_else(|| ProgressError::ModuleNotFound(module.to_string()))?;
        let removed = entry
            .remove_subject(subject)
            .ok_or_else(|| ProgressError::SubjectNotFound {
                module: module.to_string(),
                subject: subject.to_string(),
            })?;

        inner.backend.save_current(&current).await?;
        inner.current = current;

        info!(module, subject, "deleted subject");
        Ok(removed)
    }

    /// Remove a module and its historical bucket.
    pub async fn delete_module(&self, module: &str) -> Result<Module> {
        let mut inner = self.inner.lock().await;

        let mut current = inner.current.clone();
        let removed = current
            .modules
            .remove(module)
            .ok_or_else(|| ProgressError::ModuleNotFound(module.to_string()))?;

        inner.backend.save_current(&current).await?;
        inner.current = current;

        if inner.historical.bucket(module).is_some() {
            let mut historical = inner.historical.clone();
            historical.remove(module);
            inner.backend.save_historical(&historical).await?;
            inner.historical = historical;
        }

        info!(module, subjects = removed.subjects.len(), "deleted module");
        Ok(removed)
    }

    /// Move a module and its history to a new name.
    ///
    /// An existing module under `new` is replaced, history included.
    pub async fn rename_module(&self, old: &str, new: &str) -> Result<()> {
        require_name("Module", new)?;
        let mut inner = self.inner.lock().await;

        if !inner.current.modules.contains_key(old) {
            return Err(ProgressError::ModuleNotFound(old.to_string()));
        }
        if old == new {
            return Ok(());
        }
        if inner.current.modules.contains_key(new) {
            warn!(from = old, to = new, "rename overwrites existing module");
        }

        let mut current = inner.current.clone();
        if let Some(module) = current.modules.remove(old) {
            current.modules.insert(new.to_string(), module);
        }

        let history_touched =
            inner.historical.bucket(old).is_some() || inner.historical.bucket(new).is_some();

        inner.backend.save_current(&current).await?;
        inner.current = current;

        if history_touched {
            let mut historical = inner.historical.clone();
            historical.rename(old, new);
            inner.backend.save_historical(&historical).await?;
            inner.historical = historical;
        }

        info!(from = old, to = new, "renamed module");
        Ok(())
    }

    /// Once-per-day rollover.
    ///
    /// When today is later than the stored reset marker, every subject goes
    /// back to not started and the marker moves to today. A missing marker
    /// counts as today. A malformed one is overwritten with today's date
    /// without resetting. Returns whether the reset ran.
    pub async fn daily_reset(&self) -> Result<bool> {
        let today = self.clock.today();
        let mut inner = self.inner.lock().await;

        let last = match (inner.current.last_reset.clone(), inner.current.last_reset_date()) {
            (Some(raw), None) => {
                warn!(marker = %raw, %today, "malformed reset marker, rewriting");
                let mut current = inner.current.clone();
                current.last_reset = Some(format_date(today));
                inner.backend.save_current(&current).await?;
                inner.current = current;
                return Ok(false);
            }
            (_, date) => date.unwrap_or(today),
        };
        if today <= last {
            debug!(%today, %last, "daily reset not due");
            return Ok(false);
        }

        let mut current = inner.current.clone();
        let changed: usize = current
            .modules
            .values_mut()
            .map(Module::reset_statuses)
            .sum();
        current.last_reset = Some(format_date(today));

        inner.backend.save_current(&current).await?;
        inner.current = current;

        info!(%today, %last, changed, "daily reset applied");
        Ok(true)
    }
}

fn count_unknown_statuses(doc: &ProgressDocument) -> usize {
    doc.modules
        .values()
        .flat_map(|module| &module.subjects)
        .filter(|subject| !subject.status.is_known())
        .count()
}

fn require_name(kind: &'static str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ProgressError::EmptyName(kind));
    }
    Ok(())
}
