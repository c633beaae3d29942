use std::time::Duration;

use crate::domain::entity::{CycleId, Phase, PomodoroSettings, SessionId, SettingsPatch};

/// Amount of time consumed by one tick.
pub const TICK_QUANTUM: Duration = Duration::from_secs(1);

/// Working state of a [`TimerMachine`].
///
/// [`TimerMachine`]: crate::domain::timer::TimerMachine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerContext {
    settings: PomodoroSettings,
    completed_sessions: u32,
    time_left: Duration,
    measuring: Phase,
    current_cycle_id: Option<CycleId>,
    current_session_id: Option<SessionId>,
}

impl TimerContext {
    /// Creates a new [`TimerContext`] ready for the first focus phase.
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            settings,
            completed_sessions: 0,
            time_left: settings.duration(Phase::initial()),
            measuring: Phase::initial(),
            current_cycle_id: None,
            current_session_id: None,
        }
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn time_left(&self) -> Duration {
        self.time_left
    }

    pub fn current_cycle_id(&self) -> Option<&CycleId> {
        self.current_cycle_id.as_ref()
    }

    pub fn current_session_id(&self) -> Option<&SessionId> {
        self.current_session_id.as_ref()
    }

    /// Start measuring a phase from its full duration.
    pub(super) fn measure(&mut self, phase: Phase) {
        self.measuring = phase;
        self.time_left = self.settings.duration(phase);
    }

    /// Consume one tick. Returns `true` once no time is left.
    pub(super) fn tick(&mut self) -> bool {
        self.time_left = self.time_left.saturating_sub(TICK_QUANTUM);
        self.time_left.is_zero()
    }

    /// Count one more finished focus session and return the new total.
    pub(super) fn complete_focus(&mut self) -> u32 {
        self.completed_sessions += 1;
        self.completed_sessions
    }

    /// Merge the patch into the settings. A countdown that has not moved
    /// from the old duration of its phase follows the new duration.
    pub(super) fn apply_settings(&mut self, patch: &SettingsPatch) {
        let old = self.settings;
        self.settings = old.merged(patch);
        if self.time_left == old.duration(self.measuring) {
            self.time_left = self.settings.duration(self.measuring);
        }
    }

    pub(super) fn attach_cycle(&mut self, id: CycleId) {
        self.current_cycle_id = Some(id);
    }

    pub(super) fn attach_session(&mut self, id: SessionId) {
        self.current_session_id = Some(id);
    }

    pub(super) fn detach_session(&mut self) {
        self.current_session_id = None;
    }

    /// Forget the whole run: counters, countdown and identifiers.
    pub(super) fn reset(&mut self) {
        self.completed_sessions = 0;
        self.measure(Phase::initial());
        self.current_cycle_id = None;
        self.current_session_id = None;
    }
}
