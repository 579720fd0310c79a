//! Streaming encoder that samples a soft surface on the virtual clock.
//!
//! Output layout: the first chunk starts with a header, then every sampled
//! frame is one fixed-size record.
//! ```text
//! header: b"SAVC" | u16 LE mime length | mime bytes
//! record: u64 LE timestamp (µs since start) | u64 LE surface generation | u32 LE fingerprint | u8 audio flag
//! ```

use std::time::Duration;

use av_combine_core::{CombineError, EncoderEvent, OutputFormat, StreamEncoder};

use crate::clock::VirtualClock;
use crate::surface::SoftSurface;

pub const HEADER_MAGIC: &[u8; 4] = b"SAVC";
pub const RECORD_LEN: usize = 21;

/// The surface tapped as a live video track.
#[derive(Debug, Clone)]
pub struct SoftVideoTrack {
    pub surface: SoftSurface,
    pub frame_rate: u32,
}

/// An audio source's playback tapped as a live track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftAudioTrack {
    pub label: String,
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    Inactive,
    Recording,
    Stopping,
    Stopped,
    Failed,
}

/// Knobs the host passes to every encoder it creates.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EncoderBehaviour {
    pub fault_after_secs: Option<f64>,
    pub discard_output: bool,
}

pub struct SoftEncoder {
    format: Option<OutputFormat>,
    clock: VirtualClock,
    surface: SoftSurface,
    frame_interval: f64,
    has_audio: bool,
    behaviour: EncoderBehaviour,
    state: EncoderState,
    timeslice: f64,
    started_at: f64,
    next_sample_at: f64,
    next_emit_at: f64,
    header_written: bool,
    pending: Vec<u8>,
    frames_sampled: u64,
}

impl SoftEncoder {
    pub(crate) fn new(
        format: Option<OutputFormat>,
        clock: VirtualClock,
        video: &SoftVideoTrack,
        has_audio: bool,
        behaviour: EncoderBehaviour,
    ) -> Self {
        Self {
            format,
            clock,
            surface: video.surface.clone(),
            frame_interval: 1.0 / f64::from(video.frame_rate.max(1)),
            has_audio,
            behaviour,
            state: EncoderState::Inactive,
            timeslice: 0.0,
            started_at: 0.0,
            next_sample_at: 0.0,
            next_emit_at: 0.0,
            header_written: false,
            pending: Vec::new(),
            frames_sampled: 0,
        }
    }

    pub fn frames_sampled(&self) -> u64 {
        self.frames_sampled
    }

    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    pub fn is_recording(&self) -> bool {
        self.state == EncoderState::Recording
    }

    fn sample_until(&mut self, now: f64) {
        while self.next_sample_at <= now {
            let at = self.next_sample_at;
            self.record_frame(at);
            self.next_sample_at += self.frame_interval;
        }
    }

    fn record_frame(&mut self, at: f64) {
        if !self.header_written {
            let mime = self.format.as_ref().map(|f| f.mime()).unwrap_or_default();
            self.pending.extend_from_slice(HEADER_MAGIC);
            self.pending.extend_from_slice(&(mime.len() as u16).to_le_bytes());
            self.pending.extend_from_slice(mime.as_bytes());
            self.header_written = true;
        }

        let sample = self.surface.sample();
        let micros = ((at - self.started_at).max(0.0) * 1_000_000.0).round() as u64;
        self.pending.extend_from_slice(&micros.to_le_bytes());
        self.pending.extend_from_slice(&sample.generation.to_le_bytes());
        self.pending.extend_from_slice(&sample.fingerprint.to_le_bytes());
        self.pending.push(u8::from(self.has_audio));
        self.frames_sampled += 1;
    }

    fn emit(&mut self, events: &mut Vec<EncoderEvent>) {
        if self.pending.is_empty() {
            return;
        }
        let chunk = std::mem::take(&mut self.pending);
        if !self.behaviour.discard_output {
            events.push(EncoderEvent::ChunkReady(chunk));
        }
    }
}

impl StreamEncoder for SoftEncoder {
    fn format(&self) -> Option<OutputFormat> {
        self.format.clone()
    }

    fn start(&mut self, timeslice: Duration) -> Result<(), CombineError> {
        if self.state != EncoderState::Inactive {
            return Err(CombineError::EncoderStart("encoder already started".into()));
        }
        if timeslice.is_zero() {
            return Err(CombineError::EncoderStart("timeslice must be positive".into()));
        }
        let now = self.clock.now();
        self.timeslice = timeslice.as_secs_f64();
        self.started_at = now;
        self.next_sample_at = now;
        self.next_emit_at = now + self.timeslice;
        self.state = EncoderState::Recording;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<EncoderEvent> {
        let mut events = Vec::new();
        match self.state {
            EncoderState::Recording => {
                let now = self.clock.now();
                if let Some(fault) = self.behaviour.fault_after_secs {
                    if now - self.started_at >= fault {
                        self.state = EncoderState::Failed;
                        self.pending.clear();
                        events.push(EncoderEvent::Error("encoder fault".into()));
                        return events;
                    }
                }
                self.sample_until(now);
                while now >= self.next_emit_at {
                    self.emit(&mut events);
                    self.next_emit_at += self.timeslice;
                }
            }
            EncoderState::Stopping => {
                self.emit(&mut events);
                events.push(EncoderEvent::Stopped);
                self.state = EncoderState::Stopped;
            }
            EncoderState::Inactive | EncoderState::Stopped | EncoderState::Failed => {}
        }
        events
    }

    fn stop(&mut self) {
        match self.state {
            EncoderState::Recording => {
                let now = self.clock.now();
                self.sample_until(now);
                self.state = EncoderState::Stopping;
            }
            EncoderState::Inactive => self.state = EncoderState::Stopping,
            EncoderState::Stopping | EncoderState::Stopped | EncoderState::Failed => {}
        }
    }
}
