use sha2::{Digest, Sha256};

use crate::models::artifact::{ArtifactMetadata, CombinedArtifact};
use crate::models::error::CombineError;
use crate::models::format::OutputFormat;
use crate::models::media::FrameSize;
use crate::processing::chunk_buffer::ChunkBuffer;

/// What the session knows about a recording when it stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordingSummary {
    pub frame_size: FrameSize,
    pub frames_rendered: u64,
    pub estimated_total_frames: u64,
    pub has_audio: bool,
}

/// Join the recorded chunks into one artifact tagged with `format`.
///
/// Fails with `EmptyRecording` when the encoder produced nothing.
pub fn assemble(
    chunks: ChunkBuffer,
    format: OutputFormat,
    summary: &RecordingSummary,
) -> Result<CombinedArtifact, CombineError> {
    if chunks.is_empty() {
        return Err(CombineError::EmptyRecording);
    }

    let chunk_count = chunks.len();
    let bytes = chunks.concat();
    let checksum = sha256_hex(&bytes);

    log::info!(
        "assembled {} chunks into {} bytes ({})",
        chunk_count,
        bytes.len(),
        format
    );

    let metadata = ArtifactMetadata {
        id: uuid::Uuid::new_v4().to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
        format: format.clone(),
        frame_size: summary.frame_size,
        frames_rendered: summary.frames_rendered,
        estimated_total_frames: summary.estimated_total_frames,
        chunk_count,
        has_audio: summary.has_audio,
        byte_length: bytes.len(),
        checksum,
    };

    Ok(CombinedArtifact {
        bytes,
        format,
        metadata,
    })
}

/// SHA-256 hex digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
