//! # av-combine-core
//!
//! Platform-agnostic core for combining a video-only clip with an audio-only
//! clip into one muxed artifact by real-time capture.
//!
//! Both clips are played back together; each displayed video frame is copied
//! onto a raster surface, the surface and the audio playback are tapped as
//! live capture tracks, and a streaming encoder's chunks are assembled into
//! the result. Host runtimes implement the `MediaHost` family of traits and
//! plug into the generic `CombineSession`.
//!
//! ## Architecture
//!
//! ```text
//! av-combine-core (this crate)
//! ├── traits/       ← MediaHost, MediaSource, RasterSurface, StreamEncoder, CombineDelegate
//! ├── models/       ← CombineError, SessionPhase, CombineConfiguration, OutputFormat, MediaFile, etc.
//! ├── processing/   ← FrameRenderer, ChunkBuffer, SessionProgress
//! ├── session/      ← CombineSession + Combiner, loader, encoder negotiation, assembler
//! └── validation    ← upload size/type checks
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;
pub mod validation;

// Re-export key types at crate root for convenience.
pub use models::artifact::{ArtifactMetadata, CombinedArtifact};
pub use models::config::CombineConfiguration;
pub use models::error::CombineError;
pub use models::format::OutputFormat;
pub use models::media::{CombineDiagnostics, FrameSize, MediaFile, MediaKind, MediaMetadata, SourceOptions, VideoFrame};
pub use models::state::SessionPhase;
pub use models::stream::CaptureStream;
pub use processing::chunk_buffer::ChunkBuffer;
pub use processing::frame_renderer::{estimate_total_frames, FrameRenderer, RenderStep};
pub use processing::progress::SessionProgress;
pub use session::combine::{CombineSession, Combiner};
pub use traits::combine_delegate::CombineDelegate;
pub use traits::media_host::MediaHost;
pub use traits::media_source::MediaSource;
pub use traits::raster_surface::RasterSurface;
pub use traits::stream_encoder::{EncoderEvent, StreamEncoder};
