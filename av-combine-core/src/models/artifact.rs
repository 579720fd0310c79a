use serde::{Deserialize, Serialize};

use super::format::OutputFormat;
use super::media::FrameSize;

/// The muxed result of a successful combination.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedArtifact {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub metadata: ArtifactMetadata,
}

impl CombinedArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Metadata describing an artifact.
///
/// Serializable for the JSON sidecar written next to a saved artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub created_at: String,
    pub format: OutputFormat,
    pub frame_size: FrameSize,
    pub frames_rendered: u64,
    pub estimated_total_frames: u64,
    pub chunk_count: usize,
    pub has_audio: bool,
    pub byte_length: usize,
    pub checksum: String,
}

impl ArtifactMetadata {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
