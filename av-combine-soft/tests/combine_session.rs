use std::sync::Arc;

use approx::assert_relative_eq;
use futures::executor::block_on;
use parking_lot::Mutex;

use av_combine_core::validation::{validate_audio, validate_video};
use av_combine_core::{
    CombineConfiguration, CombineDelegate, CombineError, CombineSession, CombinedArtifact, Combiner, MediaFile,
    MediaKind, OutputFormat, SessionPhase,
};
use av_combine_soft::encoder::{HEADER_MAGIC, RECORD_LEN};
use av_combine_soft::{ClipProfile, SoftHost, SoftHostBuilder};

#[derive(Default)]
struct RecordingDelegate {
    phases: Mutex<Vec<SessionPhase>>,
    progress: Mutex<Vec<f64>>,
    warnings: Mutex<Vec<CombineError>>,
    errors: Mutex<Vec<CombineError>>,
    finished: Mutex<usize>,
}

impl CombineDelegate for RecordingDelegate {
    fn on_phase_changed(&self, phase: &SessionPhase) {
        self.phases.lock().push(phase.clone());
    }

    fn on_progress(&self, percent: f64) {
        self.progress.lock().push(percent);
    }

    fn on_warning(&self, warning: &CombineError) {
        self.warnings.lock().push(warning.clone());
    }

    fn on_error(&self, error: &CombineError) {
        self.errors.lock().push(error.clone());
    }

    fn on_combine_finished(&self, _artifact: &CombinedArtifact) {
        *self.finished.lock() += 1;
    }
}

impl RecordingDelegate {
    fn last_progress(&self) -> f64 {
        self.progress.lock().last().copied().unwrap_or(f64::NAN)
    }

    fn assert_progress_monotonic_until_end(&self) {
        let progress = self.progress.lock();
        assert!(!progress.is_empty());
        for pair in progress.windows(2) {
            assert!(pair[1] >= pair[0], "progress went backwards: {} -> {}", pair[0], pair[1]);
        }
        assert!(progress.iter().all(|p| (0.0..=100.0).contains(p)));
    }
}

fn video_file() -> MediaFile {
    MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 2048])
}

fn audio_file() -> MediaFile {
    MediaFile::new("song.mp3", "audio/mp3", vec![0u8; 512])
}

fn builder(video: ClipProfile, audio: ClipProfile) -> SoftHostBuilder {
    SoftHost::builder().clip("clip.mp4", video).clip("song.mp3", audio)
}

fn standard_host() -> SoftHost {
    builder(ClipProfile::video(2.0, 16, 9), ClipProfile::audio(2.0)).build()
}

fn combiner_with(host: SoftHost, config: CombineConfiguration) -> (Combiner<SoftHost>, Arc<RecordingDelegate>) {
    let delegate = Arc::new(RecordingDelegate::default());
    let mut combiner = Combiner::new(host, config);
    combiner.set_delegate(delegate.clone());
    (combiner, delegate)
}

fn combiner(host: SoftHost) -> (Combiner<SoftHost>, Arc<RecordingDelegate>) {
    combiner_with(host, CombineConfiguration::default())
}

#[test]
fn successful_run_visits_every_phase_in_order() {
    let (mut combiner, delegate) = combiner(standard_host());
    combiner.combine_blocking(&video_file(), &audio_file()).unwrap();

    let phases = delegate.phases.lock().clone();
    assert_eq!(
        phases,
        vec![
            SessionPhase::Preparing,
            SessionPhase::AudioAttach,
            SessionPhase::Encoding,
            SessionPhase::FrameDriven,
            SessionPhase::Stopped,
            SessionPhase::Finalized,
        ]
    );
    let mut current = SessionPhase::Idle;
    for next in phases {
        assert!(current.can_transition_to(&next));
        current = next;
    }
}

#[test]
fn successful_run_produces_tagged_artifact_with_audio() {
    let (mut combiner, delegate) = combiner(standard_host());
    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();

    assert!(!artifact.is_empty());
    assert_eq!(artifact.format.mime(), "video/webm;codecs=vp9");
    assert_eq!(artifact.metadata.format, artifact.format);
    assert!(artifact.metadata.has_audio);
    assert_eq!(artifact.metadata.byte_length, artifact.len());
    assert_eq!(artifact.metadata.frame_size.width, 16);
    assert!(artifact.metadata.chunk_count >= 4);
    assert!(artifact.metadata.frames_rendered >= artifact.metadata.estimated_total_frames);
    assert_eq!(&artifact.bytes[..4], HEADER_MAGIC);

    // Every record carries the audio flag.
    let mime_len = u16::from_le_bytes([artifact.bytes[4], artifact.bytes[5]]) as usize;
    let records = &artifact.bytes[6 + mime_len..];
    assert_eq!(records.len() % RECORD_LEN, 0);
    assert!(records.chunks(RECORD_LEN).all(|r| r[RECORD_LEN - 1] == 1));

    assert!(delegate.warnings.lock().is_empty());
    assert_eq!(*delegate.finished.lock(), 1);
}

#[test]
fn progress_is_monotonic_and_ends_at_100() {
    let (mut combiner, delegate) = combiner(standard_host());
    combiner.combine_blocking(&video_file(), &audio_file()).unwrap();

    delegate.assert_progress_monotonic_until_end();
    assert_relative_eq!(delegate.last_progress(), 100.0);
    let progress = delegate.progress.lock();
    assert_relative_eq!(progress[0], 0.0);
    assert!(progress.iter().any(|p| (*p - 60.0).abs() < f64::EPSILON));
}

#[test]
fn frame_estimate_follows_duration() {
    let (mut combiner, _delegate) = combiner(standard_host());
    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();
    assert_eq!(artifact.metadata.estimated_total_frames, 60);
}

#[test]
fn fast_refresh_renders_past_the_estimate() {
    let host = builder(ClipProfile::video(2.0, 16, 9), ClipProfile::audio(2.0))
        .refresh_rate(60.0)
        .build();
    let (mut combiner, delegate) = combiner(host);

    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();

    let metadata = &artifact.metadata;
    assert_eq!(metadata.estimated_total_frames, 60);
    assert!(metadata.frames_rendered > metadata.estimated_total_frames);
    assert!(metadata.frames_rendered <= 2 * metadata.estimated_total_frames + 2);
    delegate.assert_progress_monotonic_until_end();
    assert_relative_eq!(delegate.last_progress(), 100.0);
    assert_eq!(delegate.phases.lock().last(), Some(&SessionPhase::Finalized));
}

#[test]
fn slow_refresh_renders_fewer_frames() {
    let host = builder(ClipProfile::video(2.0, 16, 9), ClipProfile::audio(2.0))
        .refresh_rate(10.0)
        .build();
    let (mut combiner, delegate) = combiner(host);

    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();

    let metadata = &artifact.metadata;
    assert_eq!(metadata.estimated_total_frames, 60);
    assert!(metadata.frames_rendered >= 19);
    assert!(metadata.frames_rendered < metadata.estimated_total_frames);
    assert!(!artifact.is_empty());
    delegate.assert_progress_monotonic_until_end();
    assert!(delegate.progress.lock().iter().rev().nth(1).is_some_and(|p| *p < 100.0));
    assert_relative_eq!(delegate.last_progress(), 100.0);
    assert_eq!(delegate.phases.lock().last(), Some(&SessionPhase::Finalized));
}

#[test]
fn sources_play_muted_while_audio_is_captured() {
    let (mut combiner, _delegate) = combiner(standard_host());

    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();

    assert!(artifact.metadata.has_audio);
    let stats = combiner.host().stats();
    assert_eq!(stats.opened_options.len(), 2);
    assert!(stats.opened_options.iter().all(|options| options.muted_output));
    assert_eq!(stats.opened_options[0].kind, MediaKind::Video);
    assert!(stats.opened_options[0].discard_embedded_audio);
    assert_eq!(stats.opened_options[1].kind, MediaKind::Audio);
    assert_eq!(stats.audible_sources, 0);
}

#[test]
fn audio_playback_failure_degrades_to_video_only() {
    let host = builder(ClipProfile::video(1.0, 8, 8), ClipProfile::audio(1.0).failing_playback()).build();
    let (mut combiner, delegate) = combiner(host);

    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();

    assert!(!artifact.metadata.has_audio);
    assert!(!artifact.is_empty());
    let warnings = delegate.warnings.lock();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], CombineError::AudioCapture(_)));
    assert!(delegate.errors.lock().is_empty());
    assert_eq!(delegate.phases.lock().last(), Some(&SessionPhase::Finalized));
}

#[test]
fn missing_audio_track_degrades_to_video_only() {
    let host = builder(ClipProfile::video(1.0, 8, 8), ClipProfile::audio(1.0).without_audio_track()).build();
    let (mut combiner, delegate) = combiner(host);

    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();
    assert!(!artifact.metadata.has_audio);
    assert_eq!(delegate.warnings.lock().len(), 1);
}

#[test]
fn empty_recording_fails_and_resets_progress() {
    let host = builder(ClipProfile::video(1.0, 8, 8), ClipProfile::audio(1.0))
        .discard_encoder_output()
        .build();
    let (mut combiner, delegate) = combiner(host);

    let result = combiner.combine_blocking(&video_file(), &audio_file());

    assert_eq!(result, Err(CombineError::EmptyRecording));
    assert_relative_eq!(delegate.last_progress(), 0.0);
    assert_eq!(
        delegate.phases.lock().last(),
        Some(&SessionPhase::Failed(CombineError::EmptyRecording))
    );
    assert!(delegate.phases.lock().contains(&SessionPhase::Stopped));
    assert_eq!(*delegate.finished.lock(), 0);
}

#[test]
fn encoder_fault_aborts_attempt() {
    let host = builder(ClipProfile::video(2.0, 8, 8), ClipProfile::audio(2.0))
        .encoder_fault_after(0.75)
        .build();
    let (mut combiner, delegate) = combiner(host);

    let result = combiner.combine_blocking(&video_file(), &audio_file());

    assert!(matches!(result, Err(CombineError::EncoderRuntime(_))));
    assert_relative_eq!(delegate.last_progress(), 0.0);
    assert!(!delegate.phases.lock().contains(&SessionPhase::Stopped));
    let stats = combiner.host().stats();
    assert_eq!(stats.sources_released, stats.sources_opened);
}

#[test]
fn no_encoder_configuration_accepted() {
    let host = builder(ClipProfile::video(1.0, 8, 8), ClipProfile::audio(1.0))
        .supported_formats(Vec::<String>::new())
        .without_default_encoder()
        .build();
    let (mut combiner, delegate) = combiner(host);

    let result = combiner.combine_blocking(&video_file(), &audio_file());
    assert!(matches!(result, Err(CombineError::EncoderStart(_))));
    assert_eq!(delegate.errors.lock().len(), 1);
}

#[test]
fn prefers_mp4_when_supported() {
    let host = builder(ClipProfile::video(0.5, 8, 8), ClipProfile::audio(0.5))
        .supported_formats(["video/webm;codecs=vp8", "video/mp4"])
        .build();
    let (mut combiner, _delegate) = combiner(host);

    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();
    assert_eq!(artifact.format, OutputFormat::new("video/mp4"));
}

#[test]
fn rejected_preferred_format_falls_back_to_host_default() {
    let host = builder(ClipProfile::video(0.5, 8, 8), ClipProfile::audio(0.5))
        .reject_configured_encoders()
        .build();
    let (mut combiner, _delegate) = combiner(host);

    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();
    assert_eq!(artifact.format.mime(), "video/webm");
}

#[test]
fn unreported_default_format_uses_configured_fallback() {
    let host = builder(ClipProfile::video(0.5, 8, 8), ClipProfile::audio(0.5))
        .supported_formats(["video/ogg"])
        .unreported_default_format()
        .build();
    let config = CombineConfiguration {
        fallback_format: OutputFormat::new("video/x-matroska"),
        ..Default::default()
    };
    let (mut combiner, _delegate) = combiner_with(host, config);

    let artifact = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();
    assert_eq!(artifact.format.mime(), "video/x-matroska");
    assert_eq!(artifact.format.file_extension(), "mkv");
}

#[test]
fn metadata_failure_is_source_load_error() {
    let host = builder(ClipProfile::video(1.0, 8, 8), ClipProfile::audio(1.0).failing_metadata()).build();
    let (mut combiner, delegate) = combiner(host);

    let result = combiner.combine_blocking(&video_file(), &audio_file());

    assert!(matches!(result, Err(CombineError::SourceLoad(_))));
    assert_eq!(delegate.phases.lock().len(), 2);
    let stats = combiner.host().stats();
    assert_eq!(stats.sources_opened, 2);
    assert_eq!(stats.sources_released, 2);
    assert_eq!(stats.surfaces_created, 0);
}

#[test]
fn unknown_audio_file_releases_video_source() {
    let host = SoftHost::builder().clip("clip.mp4", ClipProfile::video(1.0, 8, 8)).build();
    let (mut combiner, _delegate) = combiner(host);

    let result = combiner.combine_blocking(&video_file(), &audio_file());

    assert!(matches!(result, Err(CombineError::SourceLoad(_))));
    let stats = combiner.host().stats();
    assert_eq!(stats.sources_opened, 1);
    assert_eq!(stats.sources_released, 1);
}

#[test]
fn video_playback_failure_aborts_attempt() {
    let host = builder(ClipProfile::video(1.0, 8, 8).failing_playback(), ClipProfile::audio(1.0)).build();
    let (mut combiner, delegate) = combiner(host);

    let result = combiner.combine_blocking(&video_file(), &audio_file());

    assert!(matches!(result, Err(CombineError::VideoPlayback(_))));
    assert_relative_eq!(delegate.last_progress(), 0.0);
    assert_eq!(combiner.host().stats().encoders_created, 1);
}

#[test]
fn invalid_configuration_is_rejected_before_loading() {
    let config = CombineConfiguration {
        frame_rate: 0,
        ..Default::default()
    };
    let (mut combiner, delegate) = combiner_with(standard_host(), config);

    let result = combiner.combine_blocking(&video_file(), &audio_file());

    assert!(matches!(result, Err(CombineError::Validation(_))));
    assert_eq!(combiner.host().stats().sources_opened, 0);
    assert!(matches!(delegate.phases.lock().as_slice(), [SessionPhase::Failed(_)]));
}

#[test]
fn sequential_attempts_are_independent() {
    let (mut combiner, delegate) = combiner(standard_host());

    let first = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();
    let second = combiner.combine_blocking(&video_file(), &audio_file()).unwrap();

    assert!(!first.is_empty());
    assert!(!second.is_empty());
    assert_ne!(first.metadata.id, second.metadata.id);
    assert!(second.metadata.frames_rendered >= second.metadata.estimated_total_frames);
    assert_eq!(*delegate.finished.lock(), 2);

    let stats = combiner.host().stats();
    assert_eq!(stats.surfaces_created, 2);
    assert_eq!(stats.encoders_created, 2);
    assert_eq!(stats.sources_opened, 4);
    assert_eq!(stats.sources_released, 4);
}

#[test]
fn failed_attempt_does_not_block_a_fresh_one() {
    let host = SoftHost::builder().clip("clip.mp4", ClipProfile::video(0.5, 8, 8)).build();
    let (mut combiner, _delegate) = combiner(host);

    assert!(combiner.combine_blocking(&video_file(), &audio_file()).is_err());

    combiner.host_mut().register_clip("song.mp3", ClipProfile::audio(0.5));
    assert!(combiner.combine_blocking(&video_file(), &audio_file()).is_ok());
}

#[test]
fn session_can_be_driven_directly() {
    let mut host = standard_host();
    let delegate = Arc::new(RecordingDelegate::default());
    let session = CombineSession::new(&mut host, CombineConfiguration::default()).with_delegate(delegate.clone());
    assert!(session.phase().is_idle());
    assert_relative_eq!(session.progress(), 0.0);

    let artifact = block_on(session.run(&video_file(), &audio_file())).unwrap();

    assert!(!artifact.is_empty());
    assert!(host.clock().now() >= 2.0);
    assert_relative_eq!(delegate.last_progress(), 100.0);
}

#[test]
fn size_boundary_validation() {
    let config = CombineConfiguration {
        video_max_bytes: 4096,
        audio_max_bytes: 1024,
        ..Default::default()
    };

    let at_limit = MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 4096]);
    assert!(validate_video(&at_limit, &config).is_ok());

    let over = MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 4097]);
    assert!(matches!(validate_video(&over, &config), Err(CombineError::Validation(_))));

    let audio_over = MediaFile::new("song.mp3", "audio/mp3", vec![0u8; 1025]);
    assert!(matches!(validate_audio(&audio_over, &config), Err(CombineError::Validation(_))));
}
