use std::time::Duration;

use crate::models::error::CombineError;
use crate::models::format::OutputFormat;

/// Event reported by a streaming encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A segment of encoded output, in emission order.
    ChunkReady(Vec<u8>),
    /// The encoder flushed everything and stopped after `stop` was requested.
    Stopped,
    /// The encoder failed; no further events follow.
    Error(String),
}

/// A streaming encoder fed by a capture stream.
pub trait StreamEncoder {
    /// Format this encoder produces, if the host reports it.
    fn format(&self) -> Option<OutputFormat>;

    /// Begin recording, emitting a chunk at least every `timeslice`.
    fn start(&mut self, timeslice: Duration) -> Result<(), CombineError>;

    /// Drain events that became ready since the last poll.
    fn poll_events(&mut self) -> Vec<EncoderEvent>;

    /// Request a flush and stop. Idempotent; completion arrives as `EncoderEvent::Stopped`.
    fn stop(&mut self);
}
