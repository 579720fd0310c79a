/// Progress after both sources have been opened.
pub const SOURCES_OPENED: f64 = 10.0;
/// Progress once both sources' metadata resolved.
pub const METADATA_READY: f64 = 20.0;
/// Progress once the raster surface exists.
pub const SURFACE_READY: f64 = 30.0;
/// Progress once the surface is tapped as a video track.
pub const VIDEO_CAPTURE_READY: f64 = 40.0;
/// Progress after the audio attach attempt, successful or not.
pub const AUDIO_ATTACHED: f64 = 50.0;
/// Progress once the encoder is recording; frame-driven progress starts here.
pub const ENCODER_STARTED: f64 = 60.0;
pub const COMPLETE: f64 = 100.0;

/// Overall progress of one attempt, in `[0, 100]`.
///
/// Never decreases while the attempt runs; only `reset` (on failure)
/// brings it back to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionProgress {
    value: f64,
}

impl SessionProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Raise progress to `target` (clamped to `[0, 100]`) and return the current value.
    pub fn advance_to(&mut self, target: f64) -> f64 {
        let target = if target.is_nan() { 0.0 } else { target.clamp(0.0, COMPLETE) };
        if target > self.value {
            self.value = target;
        }
        self.value
    }

    /// Map render completion (`0.0..=1.0`) onto the frame-driven band.
    pub fn frame_driven(&mut self, completion: f64) -> f64 {
        let span = COMPLETE - ENCODER_STARTED;
        self.advance_to(ENCODER_STARTED + completion.clamp(0.0, 1.0) * span)
    }

    pub fn complete(&mut self) -> f64 {
        self.advance_to(COMPLETE)
    }

    pub fn reset(&mut self) -> f64 {
        self.value = 0.0;
        self.value
    }
}
