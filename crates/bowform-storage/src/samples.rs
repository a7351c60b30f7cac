//! Sample video library.

use std::path::{Path, PathBuf};

use tokio::fs;

use bowform_models::SampleVideo;

use crate::error::{StorageError, StorageResult};

/// File extension listed as a sample video.
pub const SAMPLE_EXTENSION: &str = "mp4";

/// Directory of pre-recorded videos that can be analyzed by name.
#[derive(Debug, Clone)]
pub struct SampleLibrary {
    dir: PathBuf,
}

impl SampleLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every `*.mp4` directly inside the library, sorted by name.
    ///
    /// A missing directory is an empty library.
    pub async fn list(&self) -> StorageResult<Vec<SampleVideo>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut videos = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SAMPLE_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            videos.push(SampleVideo {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: path.display().to_string(),
                size: metadata.len(),
            });
        }

        videos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(videos)
    }

    /// Path of the sample called `name`.
    ///
    /// Names must be a single path component; anything that could escape the
    /// library is `InvalidKey`.
    pub async fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        if !is_plain_file_name(name) {
            return Err(StorageError::invalid_key(name));
        }

        let path = self.dir.join(name);
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            Ok(_) => Err(StorageError::not_found(name)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(name))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// True for a single non-empty path component other than `.` or `..`.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
