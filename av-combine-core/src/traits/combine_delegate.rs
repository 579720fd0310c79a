use crate::models::artifact::CombinedArtifact;
use crate::models::error::CombineError;
use crate::models::state::SessionPhase;

/// Event delegate for combination session notifications.
///
/// All methods are called from the session's thread.
pub trait CombineDelegate: Send + Sync {
    /// Called when the session enters a new phase.
    fn on_phase_changed(&self, phase: &SessionPhase);

    /// Called with the overall progress in `[0, 100]` at each phase and render tick.
    fn on_progress(&self, percent: f64);

    /// Called for non-fatal problems, such as proceeding without audio.
    fn on_warning(&self, warning: &CombineError);

    /// Called when the attempt fails.
    fn on_error(&self, error: &CombineError);

    /// Called when the artifact is assembled.
    fn on_combine_finished(&self, artifact: &CombinedArtifact);
}
