//! Virtual playback clock.
//!
//! Shared by every source and encoder a `SoftHost` creates. Time only moves
//! when the host is awaited for its next display refresh, which makes whole
//! combination runs deterministic.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_secs: Arc<Mutex<f64>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time in seconds.
    pub fn now(&self) -> f64 {
        *self.now_secs.lock()
    }

    /// Move the clock forward by `secs`. Negative values are ignored.
    pub fn advance(&self, secs: f64) {
        if secs > 0.0 {
            *self.now_secs.lock() += secs;
        }
    }
}
