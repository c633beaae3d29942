use chrono::NaiveDate;
use tokio::time::Duration;

use crate::domain::entity::{CycleId, PomodoroSettings, SettingsPatch};
use crate::domain::repository::PersistenceError;

/// What a start-or-resume request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Resumed,
    AlreadyRunning,
}

/// What a pause request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Paused,
    NotRunning,
}

/// What an abandon request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonOutcome {
    Abandoned,
    NothingToAbandon,
}

/// A public port for starting a cycle or resuming a paused phase.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StartOrResumePort: Send + Sync + 'static {
    /// Do the start-or-resume operation.
    async fn start_or_resume(&self) -> StartOutcome;
}

/// A public port for suspending the running phase.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PausePort: Send + Sync + 'static {
    /// Do the pause operation.
    async fn pause(&self) -> PauseOutcome;
}

/// A public port for giving up the current cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AbandonPort: Send + Sync + 'static {
    /// Do the abandon operation.
    async fn abandon(&self) -> AbandonOutcome;
}

/// A public port for restarting the focus phase of the current cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RestartPort: Send + Sync + 'static {
    /// Do the restart operation.
    async fn restart(&self);
}

/// A public port for changing the timer settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UpdateSettingsPort: Send + Sync + 'static {
    /// Merge the patch into the current settings.
    async fn update_settings(&self, patch: SettingsPatch);
}

/// A public port for querying the current state.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait QueryPort: Send + Sync + 'static {
    /// Do the query operation.
    async fn query(&self) -> QueryResponse;
}

/// A public port for reading statistics from the journal.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StatsPort: Send + Sync + 'static {
    /// Minutes of completed focus sessions started on the given day.
    ///
    /// # Errors
    ///
    /// This function will return an error if the journal is unreachable.
    async fn focus_minutes(&self, date: NaiveDate) -> Result<u32, PersistenceError>;
}

/// The state of the timer as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub mode: String,
    pub clock: String,
    pub remaining: Duration,
    pub running: bool,
    pub paused: bool,
    pub completed_sessions: u32,
    pub settings: PomodoroSettings,
    pub cycle_id: Option<CycleId>,
}
