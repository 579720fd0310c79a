use std::time::Duration;

use super::error::CombineError;
use super::format::{OutputFormat, FALLBACK_FORMAT};

/// Configuration for a combination attempt.
#[derive(Debug, Clone)]
pub struct CombineConfiguration {
    /// Render ticks per logical second, also the capture rate of the
    /// surface track (default: 30). Not derived from either source.
    pub frame_rate: u32,

    /// Encoder timeslice: a chunk is emitted at least this often (default: 500 ms).
    pub chunk_interval: Duration,

    /// Encoder formats, most preferred first.
    pub format_preferences: Vec<OutputFormat>,

    /// Tag for artifacts produced by a host default encoder that does not
    /// report its own format.
    pub fallback_format: OutputFormat,

    /// Largest accepted video upload in bytes (default: 200 MiB).
    pub video_max_bytes: u64,

    /// Largest accepted audio upload in bytes (default: 50 MiB).
    pub audio_max_bytes: u64,

    /// File name given to the artifact when it is saved.
    pub output_file_name: String,
}

impl CombineConfiguration {
    pub fn validate(&self) -> Result<(), CombineError> {
        if self.frame_rate == 0 {
            return Err(CombineError::Validation("frame rate must be positive".into()));
        }
        if self.chunk_interval.is_zero() {
            return Err(CombineError::Validation("chunk interval must be positive".into()));
        }
        if self.video_max_bytes == 0 || self.audio_max_bytes == 0 {
            return Err(CombineError::Validation("size limits must be positive".into()));
        }
        if self.output_file_name.trim().is_empty() {
            return Err(CombineError::Validation("output file name is empty".into()));
        }
        Ok(())
    }
}

impl Default for CombineConfiguration {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            chunk_interval: Duration::from_millis(500),
            format_preferences: OutputFormat::default_preferences(),
            fallback_format: OutputFormat::new(FALLBACK_FORMAT),
            video_max_bytes: 200 * 1024 * 1024,
            audio_max_bytes: 50 * 1024 * 1024,
            output_file_name: "combined-video.mp4".into(),
        }
    }
}
