use crate::models::media::{FrameSize, VideoFrame};

/// Drawable pixel buffer that video frames are copied onto before capture.
///
/// Written by the frame renderer only; capture tracks read it by copy.
pub trait RasterSurface {
    fn size(&self) -> FrameSize;

    /// Copy `frame` onto the whole surface, scaling if its size differs.
    fn draw_frame(&mut self, frame: &VideoFrame);
}
