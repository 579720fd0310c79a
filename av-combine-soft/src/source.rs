//! Media sources played back on the virtual clock.

use std::sync::Arc;

use parking_lot::Mutex;

use av_combine_core::{CombineError, MediaKind, MediaMetadata, MediaSource, SourceOptions, VideoFrame};

use crate::clock::VirtualClock;
use crate::encoder::SoftAudioTrack;
use crate::host::SoftHostStats;
use crate::profile::ClipProfile;

/// Sample rate reported by tapped audio tracks.
pub const CAPTURE_SAMPLE_RATE: u32 = 48_000;

/// A registered clip opened for playback.
///
/// Holds a reference to the file's bytes until released.
pub struct SoftMediaSource {
    name: String,
    options: SourceOptions,
    profile: ClipProfile,
    data: Option<Arc<[u8]>>,
    clock: VirtualClock,
    stats: Arc<Mutex<SoftHostStats>>,
    started_at: Option<f64>,
    released: bool,
}

impl SoftMediaSource {
    pub(crate) fn new(
        name: String,
        data: Arc<[u8]>,
        options: SourceOptions,
        profile: ClipProfile,
        clock: VirtualClock,
        stats: Arc<Mutex<SoftHostStats>>,
    ) -> Self {
        Self {
            name,
            options,
            profile,
            data: Some(data),
            clock,
            stats,
            started_at: None,
            released: false,
        }
    }

    /// Whether playback is currently reaching the output device.
    pub fn is_audible(&self) -> bool {
        self.emits_sound() && !self.is_paused()
    }

    fn emits_sound(&self) -> bool {
        let soundtrack = match self.options.kind {
            MediaKind::Audio => true,
            MediaKind::Video => !self.options.discard_embedded_audio,
        };
        soundtrack && self.profile.has_audio_track && !self.options.muted_output
    }

    /// Size of the referenced file, or zero once released.
    pub fn byte_len(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    fn elapsed(&self) -> Option<f64> {
        self.started_at.map(|start| self.clock.now() - start)
    }

    fn playback_error(&self, message: String) -> CombineError {
        match self.options.kind {
            MediaKind::Video => CombineError::VideoPlayback(message),
            MediaKind::Audio => CombineError::AudioCapture(message),
        }
    }
}

impl MediaSource for SoftMediaSource {
    type AudioTrack = SoftAudioTrack;

    fn kind(&self) -> MediaKind {
        self.options.kind
    }

    async fn load_metadata(&mut self) -> Result<MediaMetadata, CombineError> {
        if self.released || !self.profile.metadata_resolves {
            return Err(CombineError::SourceLoad(format!("{}: metadata never resolved", self.name)));
        }
        let frame_size = match self.options.kind {
            MediaKind::Video => self.profile.frame_size,
            MediaKind::Audio => None,
        };
        Ok(MediaMetadata {
            duration_secs: self.profile.duration_secs,
            frame_size,
        })
    }

    async fn play(&mut self) -> Result<(), CombineError> {
        if self.released {
            return Err(self.playback_error(format!("{}: source was released", self.name)));
        }
        if !self.profile.playback_starts {
            return Err(self.playback_error(format!("{}: playback was refused", self.name)));
        }
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
            if self.emits_sound() {
                self.stats.lock().audible_sources += 1;
            }
            log::debug!("{} playing at {:.3}s", self.name, self.clock.now());
        }
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.released || self.started_at.is_none() || self.is_ended()
    }

    fn is_ended(&self) -> bool {
        self.elapsed()
            .is_some_and(|elapsed| elapsed >= self.profile.duration_secs)
    }

    fn position_secs(&self) -> f64 {
        self.elapsed()
            .map_or(0.0, |elapsed| elapsed.min(self.profile.duration_secs))
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        if self.options.kind != MediaKind::Video || self.released || self.started_at.is_none() {
            return None;
        }
        let size = self.profile.frame_size?;
        let index = (self.position_secs() * self.profile.native_frame_rate).floor() as u64;
        Some(VideoFrame::filled(size, frame_color(index)))
    }

    fn capture_audio_track(&mut self) -> Result<Option<SoftAudioTrack>, CombineError> {
        if self.released || self.started_at.is_none() {
            return Err(CombineError::AudioCapture(format!("{}: not playing", self.name)));
        }
        if self.options.discard_embedded_audio || !self.profile.has_audio_track {
            return Ok(None);
        }
        Ok(Some(SoftAudioTrack {
            label: self.name.clone(),
            sample_rate: CAPTURE_SAMPLE_RATE,
        }))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.data = None;
        self.stats.lock().sources_released += 1;
        log::debug!("{} released", self.name);
    }
}

impl Drop for SoftMediaSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Synthetic colour of frame `index`, distinct for consecutive frames.
pub fn frame_color(index: u64) -> [u8; 4] {
    [index as u8, (index >> 8) as u8, 0x80, 0xff]
}
