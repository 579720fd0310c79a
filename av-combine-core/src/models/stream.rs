use super::error::CombineError;

/// A bundle of one video capture track and at most one audio capture track.
///
/// Tracks can only be added before the stream is sealed, which happens
/// when encoding begins.
#[derive(Debug)]
pub struct CaptureStream<V, A> {
    video: V,
    audio: Option<A>,
    sealed: bool,
}

impl<V, A> CaptureStream<V, A> {
    pub fn new(video: V) -> Self {
        Self {
            video,
            audio: None,
            sealed: false,
        }
    }

    pub fn add_audio_track(&mut self, track: A) -> Result<(), CombineError> {
        if self.sealed {
            return Err(CombineError::AudioCapture(
                "cannot add tracks after encoding has started".into(),
            ));
        }
        if self.audio.is_some() {
            return Err(CombineError::AudioCapture("stream already has an audio track".into()));
        }
        self.audio = Some(track);
        Ok(())
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    pub fn audio(&self) -> Option<&A> {
        self.audio.as_ref()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}
