use std::time::Duration;

use snafu::prelude::*;

/// The length of one timed phase. Always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhaseDuration(Duration);

impl PhaseDuration {
    /// Try to create a [`PhaseDuration`] from milliseconds.
    ///
    /// # Errors
    ///
    /// This function will return an error if the integer is zero.
    pub fn try_from_millis(millis: u64) -> Result<Self, TryNewPhaseDurationError> {
        ensure!(millis > 0, ZeroSnafu);
        Ok(Self(Duration::from_millis(millis)))
    }

    /// Try to create a [`PhaseDuration`] from seconds.
    ///
    /// # Errors
    ///
    /// This function will return an error if the integer is zero.
    pub fn try_from_secs(seconds: u64) -> Result<Self, TryNewPhaseDurationError> {
        ensure!(seconds > 0, ZeroSnafu);
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Creates a [`PhaseDuration`] of whole minutes. Panics on zero, so it is
    /// only meant for constants.
    pub(crate) const fn minutes(minutes: u64) -> Self {
        assert!(minutes > 0);
        Self(Duration::from_secs(minutes * 60))
    }

    /// Returns the inner [`Duration`].
    pub fn get(&self) -> Duration {
        self.0
    }
}

impl From<PhaseDuration> for Duration {
    fn from(value: PhaseDuration) -> Self {
        value.0
    }
}

/// An error type of creating a [`PhaseDuration`].
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum TryNewPhaseDurationError {
    #[snafu(display("Duration must be greater than zero"))]
    #[non_exhaustive]
    Zero,
}
