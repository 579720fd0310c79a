//! Saving a finished artifact: the download side of a combination.
//!
//! Writes the artifact bytes under the configured file name, with a JSON
//! metadata sidecar next to it.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use av_combine_core::{ArtifactMetadata, CombinedArtifact};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),
}

/// Write `artifact` to `directory/file_name` and its metadata to
/// `directory/<stem>.metadata.json`. Returns the artifact path.
pub fn save_artifact(artifact: &CombinedArtifact, directory: &Path, file_name: &str) -> Result<PathBuf, DownloadError> {
    let name = Path::new(file_name);
    if file_name.trim().is_empty() || name.file_name().map(|n| n != name.as_os_str()).unwrap_or(true) {
        return Err(DownloadError::InvalidFileName(file_name.to_string()));
    }

    fs::create_dir_all(directory)?;
    let path = directory.join(file_name);
    fs::write(&path, &artifact.bytes)?;

    let json = artifact.metadata.to_json()?;
    fs::write(metadata_path(&path), json)?;

    log::info!("saved {} ({} bytes)", path.display(), artifact.len());
    Ok(path)
}

/// Read the metadata sidecar written by `save_artifact`.
pub fn read_metadata(artifact_path: &Path) -> Result<ArtifactMetadata, DownloadError> {
    let json = fs::read_to_string(metadata_path(artifact_path))?;
    Ok(ArtifactMetadata::from_json(&json)?)
}

fn metadata_path(artifact_path: &Path) -> PathBuf {
    artifact_path.with_extension("metadata.json")
}
