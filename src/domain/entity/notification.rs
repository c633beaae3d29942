use std::fmt::{Display, Formatter, Result as FmtResult};

use snafu::prelude::*;

/// Essential information in one user facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    summary: String,
    body: Option<String>,
}

impl NotificationMessage {
    /// Try to create a [`NotificationMessage`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the summary is empty.
    pub fn try_new(
        summary: String,
        body: Option<String>,
    ) -> Result<Self, TryNewNotificationMessageError> {
        ensure!(!summary.trim().is_empty(), EmptySummarySnafu);
        Ok(Self { summary, body })
    }

    /// Returns a reference to the summary of this [`NotificationMessage`].
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the body of this [`NotificationMessage`].
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl From<Failure> for NotificationMessage {
    fn from(value: Failure) -> Self {
        Self {
            summary: value.to_string(),
            body: None,
        }
    }
}

/// Milestones of a running cycle which the user is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    FocusEnded,
    ShortBreakEnded,
    CycleCompleted,
}

impl Notice {
    /// Every notice, in the order they occur within a cycle.
    pub const ALL: [Notice; 3] = [Self::FocusEnded, Self::ShortBreakEnded, Self::CycleCompleted];

    /// The message used when nothing else is configured.
    pub fn default_message(self) -> NotificationMessage {
        let (summary, body) = match self {
            Self::FocusEnded => ("Focus session completed!", "Time for a break!"),
            Self::ShortBreakEnded => ("Break completed!", "Time to focus!"),
            Self::CycleCompleted => ("Pomodoro cycle completed!", "Great work today!"),
        };
        NotificationMessage {
            summary: summary.to_owned(),
            body: Some(body.to_owned()),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::FocusEnded => f.write_str("focus"),
            Self::ShortBreakEnded => f.write_str("short_break"),
            Self::CycleCompleted => f.write_str("cycle"),
        }
    }
}

/// Persistence steps whose failure is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    StartCycle,
    StartSession,
    CompleteSession,
    CompleteCycle,
    AbandonSession,
    AbandonCycle,
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::StartCycle => f.write_str("Failed to start pomodoro cycle. Timer stopped."),
            Self::StartSession => f.write_str("Failed to start session. Timer stopped."),
            Self::CompleteSession => f.write_str("Failed to complete session. Timer stopped."),
            Self::CompleteCycle => f.write_str("Failed to complete pomodoro cycle."),
            Self::AbandonSession => f.write_str("Failed to close abandoned session."),
            Self::AbandonCycle => f.write_str("Failed to mark pomodoro cycle as abandoned."),
        }
    }
}

/// An error type of creating a [`NotificationMessage`].
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum TryNewNotificationMessageError {
    #[snafu(display("Summary of a notification must be non-empty."))]
    #[non_exhaustive]
    EmptySummary,
}
