//! RGBA raster surface shared between the renderer and the surface capture track.

use std::sync::Arc;

use parking_lot::Mutex;

use av_combine_core::{FrameSize, RasterSurface, VideoFrame};

#[derive(Debug)]
struct SurfaceBuffer {
    size: FrameSize,
    pixels: Vec<u8>,
    generation: u64,
}

/// What a capture track sees when it samples the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSample {
    /// Number of completed draws so far.
    pub generation: u64,
    /// FNV-1a hash of the pixel data.
    pub fingerprint: u32,
}

/// Handle to one surface. Clones refer to the same pixels.
#[derive(Debug, Clone)]
pub struct SoftSurface {
    inner: Arc<Mutex<SurfaceBuffer>>,
}

impl SoftSurface {
    pub fn new(size: FrameSize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SurfaceBuffer {
                size,
                pixels: vec![0; size.pixel_count() * VideoFrame::BYTES_PER_PIXEL],
                generation: 0,
            })),
        }
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let buf = self.inner.lock();
        if x >= buf.size.width || y >= buf.size.height {
            return None;
        }
        let offset = (y as usize * buf.size.width as usize + x as usize) * VideoFrame::BYTES_PER_PIXEL;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&buf.pixels[offset..offset + 4]);
        Some(rgba)
    }

    /// Read the latest completed draw.
    pub fn sample(&self) -> SurfaceSample {
        let buf = self.inner.lock();
        SurfaceSample {
            generation: buf.generation,
            fingerprint: fnv1a(&buf.pixels),
        }
    }
}

impl RasterSurface for SoftSurface {
    fn size(&self) -> FrameSize {
        self.inner.lock().size
    }

    fn draw_frame(&mut self, frame: &VideoFrame) {
        let mut buf = self.inner.lock();
        let dst = buf.size;
        let src = frame.size;
        let bpp = VideoFrame::BYTES_PER_PIXEL;

        if src == dst && frame.pixels.len() == buf.pixels.len() {
            buf.pixels.copy_from_slice(&frame.pixels);
        } else if !src.is_empty() && frame.pixels.len() >= src.pixel_count() * bpp {
            // Nearest-neighbour scale onto the surface.
            for y in 0..dst.height as usize {
                let sy = y * src.height as usize / dst.height as usize;
                for x in 0..dst.width as usize {
                    let sx = x * src.width as usize / dst.width as usize;
                    let s = (sy * src.width as usize + sx) * bpp;
                    let d = (y * dst.width as usize + x) * bpp;
                    buf.pixels[d..d + bpp].copy_from_slice(&frame.pixels[s..s + bpp]);
                }
            }
        } else {
            return;
        }
        buf.generation += 1;
    }
}

fn fnv1a(data: &[u8]) -> u32 {
    data.iter().fold(0x811c_9dc5u32, |hash, &byte| (hash ^ byte as u32).wrapping_mul(0x0100_0193))
}
