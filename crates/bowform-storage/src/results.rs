//! Analysis result persistence.
//!
//! Results are stored as pretty-printed JSON at `{results_dir}/{identifier}.json`.
//! Writes go to a temporary sibling first and are renamed into place, so a
//! reader never sees a partially written result.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use bowform_models::{AnalysisId, AnalysisResult};

use crate::error::{StorageError, StorageResult};

/// Directory-backed store of `AnalysisResult` documents.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the results directory if needed.
    pub async fn ensure_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Path of the document for `id`. Only UUID identifiers are accepted.
    pub fn result_path(&self, id: &AnalysisId) -> StorageResult<PathBuf> {
        if !id.is_valid() {
            return Err(StorageError::invalid_key(id.as_str()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    /// Write `result` under `id`, replacing any previous document.
    pub async fn save(&self, id: &AnalysisId, result: &AnalysisResult) -> StorageResult<PathBuf> {
        let path = self.result_path(id)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", id));
        let json = serde_json::to_vec_pretty(result)?;

        self.ensure_dir().await?;
        fs::write(&tmp, &json).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(
            key = %id,
            frames = result.pose_data.len(),
            size = json.len(),
            "Stored analysis result"
        );
        Ok(path)
    }

    /// Load the document stored under `id`.
    pub async fn load(&self, id: &AnalysisId) -> StorageResult<AnalysisResult> {
        let path = self.result_path(id)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::not_found(id.as_str()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn exists(&self, id: &AnalysisId) -> StorageResult<bool> {
        let path = self.result_path(id)?;
        Ok(fs::try_exists(&path).await?)
    }
}
