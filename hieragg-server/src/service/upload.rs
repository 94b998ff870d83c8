//! Upload Service
//!
//! Extracts the uploaded log from a multipart form and saves it under the
//! upload directory.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

/// Form field carrying the log file
pub const FILE_FIELD: &str = "file";

/// Service error type
#[derive(Debug)]
pub enum UploadError {
    NoFile,
    Multipart(MultipartError),
    Io(std::io::Error),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart(err)
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;

/// An uploaded file, already reduced to a safe name
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub data: Bytes,
}

/// Reduces a client supplied file name to its final path component
///
/// Returns `None` for names that reduce to nothing usable.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let normalized = raw.replace('\\', "/");
    let name = normalized.rsplit('/').next().unwrap_or_default().trim();

    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Reads the `file` field, skipping any other fields
pub async fn take_file(multipart: &mut Multipart) -> Result<Upload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().and_then(sanitize_file_name) else {
            return Err(UploadError::NoFile);
        };
        let data = field.bytes().await?;

        return Ok(Upload { file_name, data });
    }

    Err(UploadError::NoFile)
}

/// Writes the upload into `dir`, creating the directory if needed
pub async fn save(dir: &Path, upload: &Upload) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(&upload.file_name);
    tokio::fs::write(&path, &upload.data).await?;

    tracing::debug!(
        path = %path.display(),
        bytes = upload.data.len(),
        "Upload saved"
    );

    Ok(path)
}
