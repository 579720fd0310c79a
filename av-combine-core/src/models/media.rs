use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Kind of input clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

/// An input file handle: name, declared media type, and its bytes.
///
/// The bytes are shared, never copied, when a host opens the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub media_type: String,
    pub data: Arc<[u8]>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lowercased text after the last dot, so `.mp4` alone still counts.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// How a host should set up playback for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    pub kind: MediaKind,
    /// Suppress output to the user's audio device. Capture still works.
    pub muted_output: bool,
    /// Drop any audio track embedded in the file.
    pub discard_embedded_audio: bool,
}

impl SourceOptions {
    /// Video playback: its own soundtrack is discarded, the audio clip is authoritative.
    pub fn video() -> Self {
        Self {
            kind: MediaKind::Video,
            muted_output: true,
            discard_embedded_audio: true,
        }
    }

    /// Audio playback: silent on the device but still capturable.
    pub fn audio() -> Self {
        Self {
            kind: MediaKind::Audio,
            muted_output: true,
            discard_embedded_audio: false,
        }
    }
}

/// Pixel dimensions of a video frame or raster surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Metadata resolved once a source has loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaMetadata {
    pub duration_secs: f64,
    /// Present for video sources only.
    pub frame_size: Option<FrameSize>,
}

/// One decoded RGBA frame, as currently displayed by a video source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub size: FrameSize,
    pub pixels: Vec<u8>,
}

impl VideoFrame {
    pub const BYTES_PER_PIXEL: usize = 4;

    pub fn filled(size: FrameSize, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(size.pixel_count() * Self::BYTES_PER_PIXEL)
            .collect();
        Self { size, pixels }
    }
}

/// Counters collected over one combination attempt.
#[derive(Debug, Clone, Default)]
pub struct CombineDiagnostics {
    pub frames_rendered: u64,
    pub estimated_total_frames: u64,
    pub chunks_received: u64,
    pub bytes_received: u64,
    pub audio_attached: bool,
    pub format: Option<String>,
}
