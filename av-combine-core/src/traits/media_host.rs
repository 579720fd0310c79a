use std::future::Future;

use crate::models::error::CombineError;
use crate::models::format::OutputFormat;
use crate::models::media::{FrameSize, MediaFile, SourceOptions};
use crate::models::stream::CaptureStream;
use crate::traits::media_source::MediaSource;
use crate::traits::raster_surface::RasterSurface;
use crate::traits::stream_encoder::StreamEncoder;

/// The runtime a combination runs inside: playback, surfaces, capture and encoders.
///
/// All calls happen on one cooperative thread. Implemented by:
/// - `SoftHost` (av-combine-soft), a deterministic virtual-clock host
pub trait MediaHost {
    type VideoTrack;
    type AudioTrack;
    type Source: MediaSource<AudioTrack = Self::AudioTrack>;
    type Surface: RasterSurface;
    type Encoder: StreamEncoder;

    /// Create a playable reference to `file` without copying its bytes.
    fn open_source(&mut self, file: &MediaFile, options: SourceOptions) -> Result<Self::Source, CombineError>;

    fn create_surface(&mut self, size: FrameSize) -> Result<Self::Surface, CombineError>;

    /// Tap `surface` as a live video track sampled at `frame_rate`.
    fn capture_surface(&mut self, surface: &Self::Surface, frame_rate: u32) -> Result<Self::VideoTrack, CombineError>;

    fn is_format_supported(&self, format: &OutputFormat) -> bool;

    /// Create an encoder for `stream`. `None` asks for the host's default configuration.
    fn create_encoder(
        &mut self,
        stream: &CaptureStream<Self::VideoTrack, Self::AudioTrack>,
        format: Option<&OutputFormat>,
    ) -> Result<Self::Encoder, CombineError>;

    /// Suspend until the display would next repaint.
    fn next_frame(&mut self) -> impl Future<Output = ()>;
}
