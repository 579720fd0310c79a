//! Software `MediaHost` running on a virtual clock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use av_combine_core::{CaptureStream, CombineError, FrameSize, MediaFile, MediaHost, OutputFormat, SourceOptions};

use crate::clock::VirtualClock;
use crate::encoder::{EncoderBehaviour, SoftAudioTrack, SoftEncoder, SoftVideoTrack};
use crate::profile::ClipProfile;
use crate::source::SoftMediaSource;
use crate::surface::SoftSurface;

/// Display refresh rate used when none is configured.
pub const DEFAULT_REFRESH_RATE: f64 = 60.0;

/// Format reported by the default encoder when no configuration is requested.
pub const DEFAULT_ENCODER_FORMAT: &str = "video/webm";

/// Counters of everything a host created or released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoftHostStats {
    pub sources_opened: u64,
    /// Options of every opened source, in opening order.
    pub opened_options: Vec<SourceOptions>,
    /// Sources whose playback reached the output device.
    pub audible_sources: u64,
    pub sources_released: u64,
    pub surfaces_created: u64,
    pub encoders_created: u64,
    pub refresh_ticks: u64,
}

/// Deterministic host: registered clips play back on a `VirtualClock` that
/// advances one refresh interval each time the host is awaited for a frame.
pub struct SoftHost {
    clock: VirtualClock,
    refresh_rate: f64,
    clips: HashMap<String, ClipProfile>,
    supported_formats: Vec<OutputFormat>,
    accepts_configured_encoders: bool,
    default_encoder_available: bool,
    default_encoder_format: Option<OutputFormat>,
    encoder_behaviour: EncoderBehaviour,
    stats: Arc<Mutex<SoftHostStats>>,
}

impl SoftHost {
    pub fn builder() -> SoftHostBuilder {
        SoftHostBuilder::default()
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn stats(&self) -> SoftHostStats {
        self.stats.lock().clone()
    }

    /// Register (or replace) the profile a file name decodes as.
    pub fn register_clip(&mut self, name: impl Into<String>, profile: ClipProfile) {
        self.clips.insert(name.into(), profile);
    }
}

impl MediaHost for SoftHost {
    type VideoTrack = SoftVideoTrack;
    type AudioTrack = SoftAudioTrack;
    type Source = SoftMediaSource;
    type Surface = SoftSurface;
    type Encoder = SoftEncoder;

    fn open_source(&mut self, file: &MediaFile, options: SourceOptions) -> Result<SoftMediaSource, CombineError> {
        let profile = self.clips.get(&file.name).cloned().ok_or_else(|| {
            CombineError::SourceLoad(format!("{}: no decoder for {:?}", file.name, file.media_type))
        })?;
        {
            let mut stats = self.stats.lock();
            stats.sources_opened += 1;
            stats.opened_options.push(options);
        }
        log::debug!("opened {} as {:?} (muted: {})", file.name, options.kind, options.muted_output);
        Ok(SoftMediaSource::new(
            file.name.clone(),
            Arc::clone(&file.data),
            options,
            profile,
            self.clock.clone(),
            Arc::clone(&self.stats),
        ))
    }

    fn create_surface(&mut self, size: FrameSize) -> Result<SoftSurface, CombineError> {
        if size.is_empty() {
            return Err(CombineError::SourceLoad(format!(
                "cannot create a {}x{} surface",
                size.width, size.height
            )));
        }
        self.stats.lock().surfaces_created += 1;
        Ok(SoftSurface::new(size))
    }

    fn capture_surface(&mut self, surface: &SoftSurface, frame_rate: u32) -> Result<SoftVideoTrack, CombineError> {
        Ok(SoftVideoTrack {
            surface: surface.clone(),
            frame_rate,
        })
    }

    fn is_format_supported(&self, format: &OutputFormat) -> bool {
        self.supported_formats.contains(format)
    }

    fn create_encoder(
        &mut self,
        stream: &CaptureStream<SoftVideoTrack, SoftAudioTrack>,
        format: Option<&OutputFormat>,
    ) -> Result<SoftEncoder, CombineError> {
        let format = match format {
            Some(requested) => {
                if !self.accepts_configured_encoders || !self.is_format_supported(requested) {
                    return Err(CombineError::EncoderStart(format!("{} rejected", requested)));
                }
                Some(requested.clone())
            }
            None => {
                if !self.default_encoder_available {
                    return Err(CombineError::EncoderStart("no default encoder available".into()));
                }
                self.default_encoder_format.clone()
            }
        };

        self.stats.lock().encoders_created += 1;
        Ok(SoftEncoder::new(
            format,
            self.clock.clone(),
            stream.video(),
            stream.has_audio(),
            self.encoder_behaviour,
        ))
    }

    async fn next_frame(&mut self) {
        self.clock.advance(1.0 / self.refresh_rate);
        self.stats.lock().refresh_ticks += 1;
    }
}

/// Builder for `SoftHost`.
///
/// Defaults: 60 Hz refresh, WebM (VP9, VP8, plain) supported, configured
/// encoders accepted, a default encoder reporting `video/webm`.
pub struct SoftHostBuilder {
    refresh_rate: f64,
    clips: HashMap<String, ClipProfile>,
    supported_formats: Vec<OutputFormat>,
    accepts_configured_encoders: bool,
    default_encoder_available: bool,
    default_encoder_format: Option<OutputFormat>,
    encoder_behaviour: EncoderBehaviour,
}

impl Default for SoftHostBuilder {
    fn default() -> Self {
        Self {
            refresh_rate: DEFAULT_REFRESH_RATE,
            clips: HashMap::new(),
            supported_formats: ["video/webm;codecs=vp9", "video/webm;codecs=vp8", "video/webm"]
                .into_iter()
                .map(OutputFormat::new)
                .collect(),
            accepts_configured_encoders: true,
            default_encoder_available: true,
            default_encoder_format: Some(OutputFormat::new(DEFAULT_ENCODER_FORMAT)),
            encoder_behaviour: EncoderBehaviour::default(),
        }
    }
}

impl SoftHostBuilder {
    pub fn clip(mut self, name: impl Into<String>, profile: ClipProfile) -> Self {
        self.clips.insert(name.into(), profile);
        self
    }

    /// Non-positive rates fall back to the default.
    pub fn refresh_rate(mut self, hz: f64) -> Self {
        self.refresh_rate = if hz > 0.0 { hz } else { DEFAULT_REFRESH_RATE };
        self
    }

    pub fn supported_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_formats = formats.into_iter().map(OutputFormat::new).collect();
        self
    }

    /// Reject every explicitly configured encoder, even for supported formats.
    pub fn reject_configured_encoders(mut self) -> Self {
        self.accepts_configured_encoders = false;
        self
    }

    pub fn without_default_encoder(mut self) -> Self {
        self.default_encoder_available = false;
        self
    }

    /// The default encoder does not say what format it produces.
    pub fn unreported_default_format(mut self) -> Self {
        self.default_encoder_format = None;
        self
    }

    /// Encoders report an error once they have recorded for `secs`.
    pub fn encoder_fault_after(mut self, secs: f64) -> Self {
        self.encoder_behaviour.fault_after_secs = Some(secs);
        self
    }

    /// Encoders run but never emit data.
    pub fn discard_encoder_output(mut self) -> Self {
        self.encoder_behaviour.discard_output = true;
        self
    }

    pub fn build(self) -> SoftHost {
        SoftHost {
            clock: VirtualClock::new(),
            refresh_rate: self.refresh_rate,
            clips: self.clips,
            supported_formats: self.supported_formats,
            accepts_configured_encoders: self.accepts_configured_encoders,
            default_encoder_available: self.default_encoder_available,
            default_encoder_format: self.default_encoder_format,
            encoder_behaviour: self.encoder_behaviour,
            stats: Arc::new(Mutex::new(SoftHostStats::default())),
        }
    }
}
