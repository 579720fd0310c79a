//! # av-combine-soft
//!
//! Deterministic software host for av-combine.
//!
//! Provides:
//! - `SoftHost`: `MediaHost` whose playback runs on a `VirtualClock`
//! - `SoftMediaSource`: registered clips described by a `ClipProfile`
//! - `SoftSurface`: shared RGBA raster surface
//! - `SoftEncoder`: timesliced encoder sampling the surface
//! - `download`: saving artifacts with a metadata sidecar
//!
//! ## Usage
//! ```ignore
//! use av_combine_core::{CombineConfiguration, Combiner, MediaFile};
//! use av_combine_soft::{ClipProfile, SoftHost};
//!
//! let host = SoftHost::builder()
//!     .clip("clip.mp4", ClipProfile::video(2.0, 640, 360))
//!     .clip("song.mp3", ClipProfile::audio(2.0))
//!     .build();
//! let mut combiner = Combiner::new(host, CombineConfiguration::default());
//! let artifact = combiner.combine_blocking(&video, &audio)?;
//! ```

pub mod clock;
pub mod download;
pub mod encoder;
pub mod host;
pub mod profile;
pub mod source;
pub mod surface;

pub use clock::VirtualClock;
pub use download::{read_metadata, save_artifact, DownloadError};
pub use encoder::{SoftAudioTrack, SoftEncoder, SoftVideoTrack};
pub use host::{SoftHost, SoftHostBuilder, SoftHostStats};
pub use profile::ClipProfile;
pub use source::SoftMediaSource;
pub use surface::{SoftSurface, SurfaceSample};
