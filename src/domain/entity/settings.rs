use std::num::NonZeroU32;
use std::time::Duration;

use snafu::prelude::*;

use crate::domain::entity::duration::PhaseDuration;
use crate::domain::entity::phase::Phase;

/// How many focus sessions are completed before a long break is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LongBreakInterval(NonZeroU32);

impl LongBreakInterval {
    /// Try to create a [`LongBreakInterval`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the integer is zero.
    pub fn try_new(sessions: u32) -> Result<Self, TryNewLongBreakIntervalError> {
        let inner = NonZeroU32::new(sessions).context(ZeroSessionsSnafu)?;
        Ok(Self(inner))
    }

    /// Returns the number of sessions.
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// Returns `true` if the focus session numbered `completed` (1-based) is
    /// followed by a long break.
    pub fn is_long_break_after(&self, completed: u32) -> bool {
        completed % self.get() == 0
    }
}

impl TryFrom<u32> for LongBreakInterval {
    type Error = TryNewLongBreakIntervalError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// An error type of creating a [`LongBreakInterval`].
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum TryNewLongBreakIntervalError {
    #[snafu(display("Sessions until long break must be at least one"))]
    #[non_exhaustive]
    ZeroSessions,
}

const DEFAULT_SESSIONS_UNTIL_LONG_BREAK: NonZeroU32 = match NonZeroU32::new(4) {
    Some(sessions) => sessions,
    None => panic!("default interval is non-zero"),
};

/// User configurable timer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroSettings {
    pub focus_duration: PhaseDuration,
    pub short_break_duration: PhaseDuration,
    pub long_break_duration: PhaseDuration,
    pub sessions_until_long_break: LongBreakInterval,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
}

impl PomodoroSettings {
    /// Get the duration configured for a phase.
    pub fn duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Focus => self.focus_duration.get(),
            Phase::ShortBreak => self.short_break_duration.get(),
            Phase::LongBreak => self.long_break_duration.get(),
        }
    }

    /// Whether the given phase starts on its own once the previous one ends.
    pub fn auto_starts(&self, phase: Phase) -> bool {
        if phase.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_pomodoros
        }
    }

    /// Returns a copy with every field present in `patch` replaced.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            focus_duration: patch.focus_duration.unwrap_or(self.focus_duration),
            short_break_duration: patch
                .short_break_duration
                .unwrap_or(self.short_break_duration),
            long_break_duration: patch
                .long_break_duration
                .unwrap_or(self.long_break_duration),
            sessions_until_long_break: patch
                .sessions_until_long_break
                .unwrap_or(self.sessions_until_long_break),
            auto_start_breaks: patch.auto_start_breaks.unwrap_or(self.auto_start_breaks),
            auto_start_pomodoros: patch
                .auto_start_pomodoros
                .unwrap_or(self.auto_start_pomodoros),
        }
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            focus_duration: PhaseDuration::minutes(25),
            short_break_duration: PhaseDuration::minutes(5),
            long_break_duration: PhaseDuration::minutes(15),
            sessions_until_long_break: LongBreakInterval(DEFAULT_SESSIONS_UNTIL_LONG_BREAK),
            auto_start_breaks: true,
            auto_start_pomodoros: true,
        }
    }
}

/// A partial update of [`PomodoroSettings`]. Absent fields are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub focus_duration: Option<PhaseDuration>,
    pub short_break_duration: Option<PhaseDuration>,
    pub long_break_duration: Option<PhaseDuration>,
    pub sessions_until_long_break: Option<LongBreakInterval>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_pomodoros: Option<bool>,
}

impl SettingsPatch {
    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_break_interval_try_new() {
        assert_eq!(LongBreakInterval::try_new(4).unwrap().get(), 4);
        assert_eq!(
            LongBreakInterval::try_new(0),
            Err(TryNewLongBreakIntervalError::ZeroSessions)
        );
        assert_eq!(
            LongBreakInterval::try_from(0),
            Err(TryNewLongBreakIntervalError::ZeroSessions)
        );
    }

    #[test]
    fn long_break_interval_cadence() {
        let interval = LongBreakInterval::try_new(3).unwrap();
        let long: Vec<u32> = (1..=9).filter(|n| interval.is_long_break_after(*n)).collect();
        assert_eq!(long, vec![3, 6, 9]);

        let every = LongBreakInterval::try_new(1).unwrap();
        assert!((1..=5).all(|n| every.is_long_break_after(n)));
    }

    #[test]
    fn settings_default() {
        let settings = PomodoroSettings::default();
        assert_eq!(settings.duration(Phase::Focus), Duration::from_secs(25 * 60));
        assert_eq!(
            settings.duration(Phase::ShortBreak),
            Duration::from_secs(5 * 60)
        );
        assert_eq!(
            settings.duration(Phase::LongBreak),
            Duration::from_secs(15 * 60)
        );
        assert_eq!(settings.sessions_until_long_break.get(), 4);
        assert!(settings.auto_start_breaks);
        assert!(settings.auto_start_pomodoros);
    }

    #[test]
    fn settings_merged() {
        let settings = PomodoroSettings::default();
        let patch = SettingsPatch {
            focus_duration: Some(PhaseDuration::try_from_secs(10).unwrap()),
            auto_start_breaks: Some(false),
            ..Default::default()
        };
        let merged = settings.merged(&patch);

        assert_eq!(merged.duration(Phase::Focus), Duration::from_secs(10));
        assert!(!merged.auto_start_breaks);
        assert_eq!(merged.short_break_duration, settings.short_break_duration);
        assert_eq!(
            merged.sessions_until_long_break,
            settings.sessions_until_long_break
        );
        assert_eq!(settings.merged(&SettingsPatch::default()), settings);
        assert!(SettingsPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn settings_auto_starts() {
        let settings = PomodoroSettings {
            auto_start_breaks: false,
            ..Default::default()
        };
        assert!(!settings.auto_starts(Phase::ShortBreak));
        assert!(!settings.auto_starts(Phase::LongBreak));
        assert!(settings.auto_starts(Phase::Focus));
    }
}
