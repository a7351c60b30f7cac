//! Filesystem storage.
//!
//! This crate provides:
//! - Analysis result documents keyed by identifier
//! - Temporary upload files
//! - The sample video library

pub mod error;
pub mod results;
pub mod samples;
pub mod uploads;

pub use error::{StorageError, StorageResult};
pub use results::ResultStore;
pub use samples::{is_plain_file_name, SampleLibrary};
pub use uploads::{remove_upload, sanitize_file_name, UploadArea};
