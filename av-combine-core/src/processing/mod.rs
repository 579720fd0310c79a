pub mod chunk_buffer;
pub mod frame_renderer;
pub mod progress;
