use crate::traits::media_source::MediaSource;
use crate::traits::raster_surface::RasterSurface;

/// Estimated number of render ticks for a clip, used only for progress.
///
/// Unknown or non-positive durations estimate zero frames.
pub fn estimate_total_frames(duration_secs: f64, frame_rate: u32) -> u64 {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return 0;
    }
    (duration_secs * frame_rate as f64).ceil() as u64
}

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStep {
    /// A frame was copied onto the surface; `frame_count` ticks so far.
    Rendered { frame_count: u64 },
    /// The video source is paused or ended; rendering is over.
    Finished,
}

/// Copies the video source's displayed frame onto the raster surface once per tick.
///
/// Does not throttle or drop frames: if ticks arrive slower than the frame
/// rate, fewer frames are produced.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    frame_rate: u32,
    estimated_total_frames: u64,
    frame_count: u64,
    finished: bool,
}

impl FrameRenderer {
    pub fn new(frame_rate: u32, duration_secs: f64) -> Self {
        Self {
            frame_rate,
            estimated_total_frames: estimate_total_frames(duration_secs, frame_rate),
            frame_count: 0,
            finished: false,
        }
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn estimated_total_frames(&self) -> u64 {
        self.estimated_total_frames
    }

    /// Rendering continues only while the source is actively playing.
    pub fn should_continue<S: MediaSource>(&self, source: &S) -> bool {
        !self.finished && !source.is_paused() && !source.is_ended()
    }

    /// Render one tick, or report that the source has stopped playing.
    ///
    /// Once `Finished` has been returned, every later call returns it too.
    pub fn step<S: MediaSource, R: RasterSurface>(&mut self, source: &S, surface: &mut R) -> RenderStep {
        if !self.should_continue(source) {
            self.finished = true;
            return RenderStep::Finished;
        }

        if let Some(frame) = source.current_frame() {
            surface.draw_frame(&frame);
        }
        self.frame_count += 1;
        RenderStep::Rendered {
            frame_count: self.frame_count,
        }
    }

    /// Fraction of the estimated frames rendered, capped at 1.
    pub fn completion(&self) -> f64 {
        if self.estimated_total_frames == 0 {
            return if self.frame_count > 0 { 1.0 } else { 0.0 };
        }
        (self.frame_count as f64 / self.estimated_total_frames as f64).min(1.0)
    }
}
