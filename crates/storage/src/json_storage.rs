//! JSON file storage implementation.
//!
//! Each document lives in its own pretty-printed JSON file at a path chosen
//! by the caller. Writes go to a sibling `.tmp` file that is then renamed
//! over the target, so a crash never leaves a half-written document.

use std::path::{Path, PathBuf};
use studytrack_core::{HistoryDocument, ProgressDocument};
use serde::{de::DeserializeOwned, Serialize};
use super::{DocumentStore, Result};
use tokio::fs;
use tracing::debug;

/// File-based JSON storage backend.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    current_path: PathBuf,
    historical_path: PathBuf,
}

impl JsonFileStore {
    /// Create a store over two document paths. Nothing is touched on disk
    /// until the first save.
    pub fn new(current_path: impl AsRef<Path>, historical_path: impl AsRef<Path>) -> Self {
        Self {
            current_path: current_path.as_ref().to_path_buf(),
            historical_path: historical_path.as_ref().to_path_buf(),
        }
    }

    /// Create a store with the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("progress_data.json"), dir.join("historical_data.json"))
    }

    /// Path of the current-progress document.
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// Path of the historical document.
    pub fn historical_path(&self) -> &Path {
        &self.historical_path
    }
}

#[async_trait::async_trait]
impl DocumentStore for JsonFileStore {
    async fn load_current(&self) -> Result<Option<ProgressDocument>> {
        read_json(&self.current_path).await
    }

    async fn save_current(&mut self, doc: &ProgressDocument) -> Result<()> {
        write_json(&self.current_path, doc).await
    }

    async fn load_historical(&self) -> Result<Option<HistoryDocument>> {
        read_json(&self.historical_path).await
    }

    async fn save_historical(&mut self, doc: &HistoryDocument) -> Result<()> {
        write_json(&self.historical_path, doc).await
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            debug!(path = %path.display(), "loaded document");
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp = temp_path(path);
    fs::write(&tmp, json.as_bytes()).await?;
    fs::rename(&tmp, path).await?;

    debug!(path = %path.display(), bytes = json.len(), "wrote document");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
