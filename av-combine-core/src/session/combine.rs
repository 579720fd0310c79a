use std::sync::Arc;

use crate::models::artifact::CombinedArtifact;
use crate::models::config::CombineConfiguration;
use crate::models::error::CombineError;
use crate::models::media::{CombineDiagnostics, MediaFile};
use crate::models::state::SessionPhase;
use crate::models::stream::CaptureStream;
use crate::processing::chunk_buffer::ChunkBuffer;
use crate::processing::frame_renderer::{FrameRenderer, RenderStep};
use crate::processing::progress::{self, SessionProgress};
use crate::session::assembler::{self, RecordingSummary};
use crate::session::loader;
use crate::session::negotiation;
use crate::traits::combine_delegate::CombineDelegate;
use crate::traits::media_host::MediaHost;
use crate::traits::media_source::MediaSource;
use crate::traits::stream_encoder::{EncoderEvent, StreamEncoder};

/// Resources owned by one attempt, released when it resolves either way.
struct SessionResources<H: MediaHost> {
    video: Option<H::Source>,
    audio: Option<H::Source>,
    encoder: Option<H::Encoder>,
}

impl<H: MediaHost> SessionResources<H> {
    fn new() -> Self {
        Self {
            video: None,
            audio: None,
            encoder: None,
        }
    }

    fn release(&mut self) {
        if let Some(mut encoder) = self.encoder.take() {
            encoder.stop();
        }
        if let Some(mut video) = self.video.take() {
            video.release();
        }
        if let Some(mut audio) = self.audio.take() {
            audio.release();
        }
    }
}

/// One end-to-end attempt to combine a video clip with an audio clip.
///
/// Created fresh per attempt and consumed by `run`; nothing carries over
/// between attempts. Data flow:
/// ```text
/// [Video Source] → [FrameRenderer] → [RasterSurface] → video track ─┐
///                                                                   ├→ [CaptureStream] → [Encoder] → [ChunkBuffer] → [Assembler]
/// [Audio Source] → playback tap ─────────────────────→ audio track ─┘
/// ```
pub struct CombineSession<'h, H: MediaHost> {
    host: &'h mut H,
    config: CombineConfiguration,
    delegate: Option<Arc<dyn CombineDelegate>>,
    phase: SessionPhase,
    progress: SessionProgress,
    diagnostics: CombineDiagnostics,
}

impl<'h, H: MediaHost> CombineSession<'h, H> {
    pub fn new(host: &'h mut H, config: CombineConfiguration) -> Self {
        Self {
            host,
            config,
            delegate: None,
            phase: SessionPhase::Idle,
            progress: SessionProgress::new(),
            diagnostics: CombineDiagnostics::default(),
        }
    }

    pub fn with_delegate(mut self, delegate: Arc<dyn CombineDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress.value()
    }

    pub fn diagnostics(&self) -> &CombineDiagnostics {
        &self.diagnostics
    }

    /// Run the attempt to completion.
    ///
    /// Resolves with the artifact once the encoder has stopped and produced
    /// data, or with the first fatal error. Audio capture failures are
    /// reported to the delegate and do not fail the attempt.
    pub async fn run(mut self, video: &MediaFile, audio: &MediaFile) -> Result<CombinedArtifact, CombineError> {
        let mut resources = SessionResources::<H>::new();
        let outcome = match self.config.validate() {
            Ok(()) => self.drive(video, audio, &mut resources).await,
            Err(e) => Err(e),
        };
        resources.release();

        match outcome {
            Ok(artifact) => {
                self.set_phase(SessionPhase::Finalized);
                let value = self.progress.complete();
                self.report_progress(value);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_combine_finished(&artifact);
                }
                Ok(artifact)
            }
            Err(err) => {
                log::error!("combination failed: {}", err);
                let value = self.progress.reset();
                self.report_progress(value);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(&err);
                }
                self.set_phase(SessionPhase::Failed(err.clone()));
                Err(err)
            }
        }
    }

    async fn drive(
        &mut self,
        video_file: &MediaFile,
        audio_file: &MediaFile,
        resources: &mut SessionResources<H>,
    ) -> Result<CombinedArtifact, CombineError> {
        // Preparing: sources, metadata, surface, surface capture.
        self.set_phase(SessionPhase::Preparing);
        self.advance(0.0);

        let video = resources.video.insert(loader::open_video(self.host, video_file)?);
        let audio = resources.audio.insert(loader::open_audio(self.host, audio_file)?);
        self.advance(progress::SOURCES_OPENED);

        let loaded = loader::await_metadata(&mut *video, &mut *audio).await?;
        self.advance(progress::METADATA_READY);

        let mut surface = self.host.create_surface(loaded.frame_size)?;
        self.advance(progress::SURFACE_READY);

        let video_track = self.host.capture_surface(&surface, self.config.frame_rate)?;
        let mut stream = CaptureStream::new(video_track);
        self.advance(progress::VIDEO_CAPTURE_READY);

        // AudioAttach: best effort.
        self.set_phase(SessionPhase::AudioAttach);
        match Self::attach_audio(audio, &mut stream).await {
            Ok(()) => {
                log::info!("audio track attached");
                self.diagnostics.audio_attached = true;
            }
            Err(warning) => {
                log::warn!("continuing without audio: {}", warning);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_warning(&warning);
                }
            }
        }
        self.advance(progress::AUDIO_ATTACHED);

        // Encoding.
        self.set_phase(SessionPhase::Encoding);
        stream.seal();
        let (encoder, format) = negotiation::create_encoder(self.host, &stream, &self.config)?;
        let encoder = resources.encoder.insert(encoder);
        encoder
            .start(self.config.chunk_interval)
            .map_err(|e| e.reclassify(CombineError::EncoderStart))?;
        self.diagnostics.format = Some(format.mime().to_string());
        self.advance(progress::ENCODER_STARTED);

        // FrameDriven.
        self.set_phase(SessionPhase::FrameDriven);
        video
            .play()
            .await
            .map_err(|e| e.reclassify(CombineError::VideoPlayback))?;

        let mut renderer = FrameRenderer::new(self.config.frame_rate, loaded.video.duration_secs);
        self.diagnostics.estimated_total_frames = renderer.estimated_total_frames();
        let mut chunks = ChunkBuffer::new();

        loop {
            self.collect_events(encoder, &mut chunks)?;
            match renderer.step(&*video, &mut surface) {
                RenderStep::Rendered { frame_count } => {
                    self.diagnostics.frames_rendered = frame_count;
                    let value = self.progress.frame_driven(renderer.completion());
                    self.report_progress(value);
                    if frame_count % u64::from(renderer.frame_rate()) == 0 {
                        log::debug!("rendered frame {}", frame_count);
                    }
                }
                RenderStep::Finished => break,
            }
            self.host.next_frame().await;
        }
        log::info!(
            "video finished after {} frames (estimated {})",
            renderer.frame_count(),
            renderer.estimated_total_frames()
        );

        // Stopped: flush and wait for the encoder to confirm.
        self.set_phase(SessionPhase::Stopped);
        encoder.stop();
        while !self.collect_events(encoder, &mut chunks)? {
            self.host.next_frame().await;
        }

        let summary = RecordingSummary {
            frame_size: loaded.frame_size,
            frames_rendered: renderer.frame_count(),
            estimated_total_frames: renderer.estimated_total_frames(),
            has_audio: stream.has_audio(),
        };
        assembler::assemble(chunks, format, &summary)
    }

    async fn attach_audio(
        audio: &mut H::Source,
        stream: &mut CaptureStream<H::VideoTrack, H::AudioTrack>,
    ) -> Result<(), CombineError> {
        audio
            .play()
            .await
            .map_err(|e| e.reclassify(CombineError::AudioCapture))?;
        let track = audio
            .capture_audio_track()
            .map_err(|e| e.reclassify(CombineError::AudioCapture))?
            .ok_or_else(|| CombineError::AudioCapture("audio playback yielded no capturable track".into()))?;
        stream.add_audio_track(track)
    }

    /// Drain encoder events into `chunks`. Returns `true` once the encoder has stopped.
    fn collect_events(&mut self, encoder: &mut H::Encoder, chunks: &mut ChunkBuffer) -> Result<bool, CombineError> {
        let mut stopped = false;
        for event in encoder.poll_events() {
            match event {
                EncoderEvent::ChunkReady(bytes) => {
                    let len = bytes.len();
                    if chunks.push(bytes) {
                        self.diagnostics.chunks_received += 1;
                        self.diagnostics.bytes_received += len as u64;
                        log::debug!("chunk {} received ({} bytes)", chunks.len(), len);
                    }
                }
                EncoderEvent::Stopped => stopped = true,
                EncoderEvent::Error(message) => return Err(CombineError::EncoderRuntime(message)),
            }
        }
        Ok(stopped)
    }

    fn advance(&mut self, target: f64) {
        let value = self.progress.advance_to(target);
        self.report_progress(value);
    }

    fn report_progress(&self, value: f64) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_progress(value);
        }
    }

    fn set_phase(&mut self, next: SessionPhase) {
        if !self.phase.can_transition_to(&next) {
            log::warn!("unexpected phase transition {} -> {}", self.phase.label(), next.label());
        }
        log::info!("phase: {} -> {}", self.phase.label(), next.label());
        self.phase = next;
        if let Some(ref delegate) = self.delegate {
            delegate.on_phase_changed(&self.phase);
        }
    }
}

/// Entry point for callers: owns the host and runs one fresh session per request.
pub struct Combiner<H: MediaHost> {
    host: H,
    config: CombineConfiguration,
    delegate: Option<Arc<dyn CombineDelegate>>,
}

impl<H: MediaHost> Combiner<H> {
    pub fn new(host: H, config: CombineConfiguration) -> Self {
        Self {
            host,
            config,
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CombineDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &CombineConfiguration {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Combine `video` and `audio` into one artifact.
    ///
    /// `&mut self` keeps attempts from overlapping. There is no retry; call
    /// again after a failure to make a fresh attempt.
    pub async fn combine(&mut self, video: &MediaFile, audio: &MediaFile) -> Result<CombinedArtifact, CombineError> {
        let mut session = CombineSession::new(&mut self.host, self.config.clone());
        if let Some(ref delegate) = self.delegate {
            session = session.with_delegate(Arc::clone(delegate));
        }
        session.run(video, audio).await
    }

    /// Run `combine` to completion on the current thread.
    pub fn combine_blocking(&mut self, video: &MediaFile, audio: &MediaFile) -> Result<CombinedArtifact, CombineError> {
        futures::executor::block_on(self.combine(video, audio))
    }
}

