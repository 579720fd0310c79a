//! Clip profiles: what the soft host "decodes" a registered file as.

use av_combine_core::FrameSize;

/// Behaviour of one registered input clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipProfile {
    pub duration_secs: f64,
    /// Frame size for video clips; `None` for audio-only clips.
    pub frame_size: Option<FrameSize>,
    /// Rate at which the clip's displayed frame changes.
    pub native_frame_rate: f64,
    pub metadata_resolves: bool,
    pub playback_starts: bool,
    /// Whether playback can be tapped as a live audio track.
    pub has_audio_track: bool,
}

impl ClipProfile {
    pub fn video(duration_secs: f64, width: u32, height: u32) -> Self {
        Self {
            duration_secs,
            frame_size: Some(FrameSize::new(width, height)),
            native_frame_rate: 30.0,
            metadata_resolves: true,
            playback_starts: true,
            has_audio_track: false,
        }
    }

    pub fn audio(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            frame_size: None,
            native_frame_rate: 0.0,
            metadata_resolves: true,
            playback_starts: true,
            has_audio_track: true,
        }
    }

    pub fn with_native_frame_rate(mut self, fps: f64) -> Self {
        self.native_frame_rate = fps;
        self
    }

    /// Metadata never resolves, as with an undecodable file.
    pub fn failing_metadata(mut self) -> Self {
        self.metadata_resolves = false;
        self
    }

    /// Playback is refused, as with an autoplay or device restriction.
    pub fn failing_playback(mut self) -> Self {
        self.playback_starts = false;
        self
    }

    pub fn without_audio_track(mut self) -> Self {
        self.has_audio_track = false;
        self
    }
}
