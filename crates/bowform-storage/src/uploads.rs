//! Temporary storage for uploaded videos.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StorageResult;

/// Directory where uploads wait for analysis.
#[derive(Debug, Clone)]
pub struct UploadArea {
    dir: PathBuf,
}

impl UploadArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fresh path `{dir}/{uuid}_{sanitized name}` for an upload.
    pub fn allocate(&self, original_name: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}", Uuid::new_v4(), sanitize_file_name(original_name)))
    }

    /// Create an upload file ready for streaming writes.
    pub async fn create(&self, original_name: &str) -> StorageResult<(PathBuf, fs::File)> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.allocate(original_name);
        let file = fs::File::create(&path).await?;
        debug!(path = %path.display(), "Created upload file");
        Ok((path, file))
    }

    /// Write a complete upload in one call.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let (path, mut file) = self.create(original_name).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(path)
    }
}

/// Remove an upload, logging instead of failing when it is already gone.
pub fn remove_upload(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed upload"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), "Failed to remove upload: {}", e),
    }
}

/// Keep only the final path component and replace characters outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
