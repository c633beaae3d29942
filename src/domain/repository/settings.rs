use std::error::Error as StdError;

use snafu::prelude::*;

use crate::domain::entity::duration::TryNewPhaseDurationError;
use crate::domain::entity::settings::{PomodoroSettings, TryNewLongBreakIntervalError};

/// An abstract interface for accessing the initial timer settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SettingsRepository: Send + Sync + 'static {
    /// Get the settings the timer starts with.
    ///
    /// # Errors
    ///
    /// This function will return an error if the stored settings are missing
    /// or invalid.
    async fn settings(&self) -> Result<PomodoroSettings, GetSettingsError>;
}

/// An error type of accessing the repository of [`PomodoroSettings`].
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum GetSettingsError {
    #[snafu(display("Invalid duration for {key}"))]
    #[non_exhaustive]
    InvalidDuration {
        key: String,
        source: TryNewPhaseDurationError,
    },
    #[snafu(display("Invalid number of sessions until long break"))]
    #[non_exhaustive]
    InvalidInterval { source: TryNewLongBreakIntervalError },
    #[snafu(whatever, display("Load settings failed: {message}"))]
    #[non_exhaustive]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError + Send + Sync>, Some)))]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}
