use super::error::CombineError;

/// Combination session state machine.
///
/// State transitions:
/// ```text
/// idle → preparing → audio-attach → encoding → frame-driven → stopped → finalized
///          ↓              ↓             ↓            ↓            ↓
///          └──────────────┴─────────────┴────────────┴────────────┴──→ failed
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    Idle,
    Preparing,
    AudioAttach,
    Encoding,
    FrameDriven,
    Stopped,
    Finalized,
    Failed(CombineError),
}

impl SessionPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Failed(_))
    }

    /// Position along the success path; `None` for `Failed`.
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            Self::Idle => Some(0),
            Self::Preparing => Some(1),
            Self::AudioAttach => Some(2),
            Self::Encoding => Some(3),
            Self::FrameDriven => Some(4),
            Self::Stopped => Some(5),
            Self::Finalized => Some(6),
            Self::Failed(_) => None,
        }
    }

    /// Phases advance one step at a time; any non-terminal phase may fail.
    pub fn can_transition_to(&self, next: &SessionPhase) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.ordinal(), next.ordinal()) {
            (Some(_), None) => true,
            (Some(current), Some(next)) => next == current + 1,
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::AudioAttach => "audio-attach",
            Self::Encoding => "encoding",
            Self::FrameDriven => "frame-driven",
            Self::Stopped => "stopped",
            Self::Finalized => "finalized",
            Self::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_path_is_strictly_sequential() {
        let path = [
            SessionPhase::Idle,
            SessionPhase::Preparing,
            SessionPhase::AudioAttach,
            SessionPhase::Encoding,
            SessionPhase::FrameDriven,
            SessionPhase::Stopped,
            SessionPhase::Finalized,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(&pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
        assert!(!SessionPhase::Preparing.can_transition_to(&SessionPhase::Encoding));
        assert!(!SessionPhase::FrameDriven.can_transition_to(&SessionPhase::AudioAttach));
    }

    #[test]
    fn any_active_phase_may_fail() {
        let failed = SessionPhase::Failed(CombineError::EmptyRecording);
        assert!(SessionPhase::Preparing.can_transition_to(&failed));
        assert!(SessionPhase::Stopped.can_transition_to(&failed));
    }

    #[test]
    fn terminal_phases_are_final() {
        let failed = SessionPhase::Failed(CombineError::EmptyRecording);
        assert!(failed.is_terminal());
        assert!(SessionPhase::Finalized.is_terminal());
        assert!(!SessionPhase::Finalized.can_transition_to(&failed));
        assert!(!failed.can_transition_to(&SessionPhase::Idle));
    }
}
