use thiserror::Error;

/// Errors that can occur while combining a video clip with an audio clip.
///
/// Every variant except `AudioCapture` aborts the attempt. `AudioCapture`
/// is reported to observers and the session continues video-only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CombineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("source failed to load: {0}")]
    SourceLoad(String),

    #[error("video playback failed: {0}")]
    VideoPlayback(String),

    #[error("audio capture unavailable: {0}")]
    AudioCapture(String),

    #[error("encoder failed to start: {0}")]
    EncoderStart(String),

    #[error("encoder failed while recording: {0}")]
    EncoderRuntime(String),

    #[error("no data was recorded")]
    EmptyRecording,
}

impl CombineError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::AudioCapture(_))
    }

    /// Re-tag an error reported by a host call as `kind`, keeping its message.
    ///
    /// Errors already of the requested kind pass through untouched.
    pub(crate) fn reclassify(self, kind: fn(String) -> CombineError) -> CombineError {
        let probe = kind(String::new());
        if std::mem::discriminant(&self) == std::mem::discriminant(&probe) {
            return self;
        }
        let message = match self {
            Self::Validation(m)
            | Self::SourceLoad(m)
            | Self::VideoPlayback(m)
            | Self::AudioCapture(m)
            | Self::EncoderStart(m)
            | Self::EncoderRuntime(m) => m,
            Self::EmptyRecording => Self::EmptyRecording.to_string(),
        };
        kind(message)
    }
}
