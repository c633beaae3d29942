use crate::domain::entity::{CycleId, SessionId, SettingsPatch};

/// Inputs accepted by a [`TimerMachine`]. Events that a state does not handle
/// leave the machine untouched.
///
/// [`TimerMachine`]: crate::domain::timer::TimerMachine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Pause,
    Resume,
    Abandon,
    Restart,
    Tick,
    UpdateSettings(SettingsPatch),
    /// Correlate the run with a persisted cycle.
    AttachCycle(CycleId),
    /// Correlate the current phase with a persisted session.
    AttachSession(SessionId),
    DetachSession,
    /// Force the machine back to idle after a persistence failure.
    Halt,
}
