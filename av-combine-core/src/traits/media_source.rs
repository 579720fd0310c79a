use std::future::Future;

use crate::models::error::CombineError;
use crate::models::media::{MediaKind, MediaMetadata, VideoFrame};

/// A playable audio or video source opened by a host.
///
/// Playback position is driven by the host's clock once `play` resolves.
/// Implementations release their playback and buffers in `release`, which
/// must be safe to call more than once.
pub trait MediaSource {
    /// Live capture track tapped from this source's playback.
    type AudioTrack;

    fn kind(&self) -> MediaKind;

    /// Resolves once duration (and, for video, dimensions) are known.
    fn load_metadata(&mut self) -> impl Future<Output = Result<MediaMetadata, CombineError>>;

    /// Resolves once playback has actually started.
    fn play(&mut self) -> impl Future<Output = Result<(), CombineError>>;

    fn is_paused(&self) -> bool;

    fn is_ended(&self) -> bool;

    fn position_secs(&self) -> f64;

    /// The frame currently on display, if this is a video source that has one.
    fn current_frame(&self) -> Option<VideoFrame>;

    /// Tap the live audio output. `Ok(None)` means playback yields no track.
    fn capture_audio_track(&mut self) -> Result<Option<Self::AudioTrack>, CombineError>;

    fn release(&mut self);
}
