use crate::models::error::CombineError;
use crate::models::media::{FrameSize, MediaFile, MediaMetadata, SourceOptions};
use crate::traits::media_host::MediaHost;
use crate::traits::media_source::MediaSource;

/// Metadata for both sources once loading succeeded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedMetadata {
    pub video: MediaMetadata,
    pub audio: MediaMetadata,
    pub frame_size: FrameSize,
}

/// Open the video clip: muted, embedded soundtrack discarded.
pub fn open_video<H: MediaHost>(host: &mut H, file: &MediaFile) -> Result<H::Source, CombineError> {
    host.open_source(file, SourceOptions::video())
        .map_err(|e| e.reclassify(CombineError::SourceLoad))
}

/// Open the audio clip: silent on the output device but capturable.
pub fn open_audio<H: MediaHost>(host: &mut H, file: &MediaFile) -> Result<H::Source, CombineError> {
    host.open_source(file, SourceOptions::audio())
        .map_err(|e| e.reclassify(CombineError::SourceLoad))
}

/// Wait for both sources' metadata concurrently.
///
/// Resumes when the slower source resolves, or as soon as either fails.
/// A video source must report non-empty dimensions.
pub async fn await_metadata<S: MediaSource>(video: &mut S, audio: &mut S) -> Result<LoadedMetadata, CombineError> {
    let (video_meta, audio_meta) = futures::try_join!(video.load_metadata(), audio.load_metadata())
        .map_err(|e| e.reclassify(CombineError::SourceLoad))?;

    let frame_size = video_meta
        .frame_size
        .filter(|size| !size.is_empty())
        .ok_or_else(|| CombineError::SourceLoad("video source reported no frame dimensions".into()))?;

    log::info!(
        "sources ready: video {}x{} {:.2}s, audio {:.2}s",
        frame_size.width,
        frame_size.height,
        video_meta.duration_secs,
        audio_meta.duration_secs
    );

    Ok(LoadedMetadata {
        video: video_meta,
        audio: audio_meta,
        frame_size,
    })
}
