use std::error::Error as StdError;

use chrono::NaiveDate;
use snafu::prelude::*;

use crate::domain::entity::{
    Cycle, CycleId, CycleStatus, PomodoroSettings, SessionId, SessionType,
};

/// An abstract interface for the store that owns cycle and session records.
/// The timer only ever keeps identifiers of the records it creates here.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CycleRepository: Send + Sync + 'static {
    /// Create a cycle with status [`CycleStatus::InProgress`], taking a
    /// snapshot of the settings it runs with.
    ///
    /// # Errors
    ///
    /// This function will return an error if the record could not be stored.
    async fn create_cycle(&self, settings: &PomodoroSettings) -> Result<CycleId, PersistenceError>;

    /// Create an open session belonging to a cycle.
    ///
    /// # Errors
    ///
    /// This function will return an error if the cycle is unknown or the
    /// record could not be stored.
    async fn create_session(
        &self,
        cycle_id: &CycleId,
        session_type: SessionType,
        duration_minutes: u32,
    ) -> Result<SessionId, PersistenceError>;

    /// Close a session. Repeating the call for the same session is harmless.
    ///
    /// # Errors
    ///
    /// This function will return an error if the session is unknown or the
    /// record could not be stored.
    async fn complete_session(
        &self,
        session_id: &SessionId,
        was_completed: bool,
    ) -> Result<(), PersistenceError>;

    /// Change the status of a cycle.
    ///
    /// # Errors
    ///
    /// This function will return an error if the cycle is unknown or the
    /// record could not be stored.
    async fn update_cycle_status(
        &self,
        cycle_id: &CycleId,
        status: CycleStatus,
    ) -> Result<(), PersistenceError>;

    /// Get the most recently started cycle which is still in progress.
    ///
    /// # Errors
    ///
    /// This function will return an error if the store is unreachable.
    async fn current_cycle(&self) -> Result<Option<Cycle>, PersistenceError>;

    /// Sum of planned minutes of completed focus sessions started on `date`
    /// (local time).
    ///
    /// # Errors
    ///
    /// This function will return an error if the store is unreachable.
    async fn focus_minutes_on(&self, date: NaiveDate) -> Result<u32, PersistenceError>;
}

/// An error type of accessing the repository of cycles and sessions.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum PersistenceError {
    #[snafu(display("Could not find {kind} {id}"))]
    #[non_exhaustive]
    NotFound { kind: &'static str, id: String },
    #[snafu(display("Could not access storage: {message}"))]
    #[non_exhaustive]
    Storage {
        message: String,
        source: Box<dyn StdError + Send + Sync>,
    },
    #[snafu(whatever, display("Persistence failed: {message}"))]
    #[non_exhaustive]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError + Send + Sync>, Some)))]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockall::predicate::eq;

    #[tokio::test]
    async fn cycle_repository_operation() {
        let mock = init_mock();
        let settings = PomodoroSettings::default();

        let cycle = mock.create_cycle(&settings).await.unwrap();
        assert_eq!(cycle, CycleId::new("c-1"));
        assert!(matches!(
            mock.create_session(&cycle, SessionType::Focus, 25).await,
            Err(PersistenceError::NotFound { kind: "cycle", .. })
        ));
        assert!(mock.current_cycle().await.unwrap().is_none());
    }

    fn init_mock() -> MockCycleRepository {
        let mut mock = MockCycleRepository::new();
        mock.expect_create_cycle()
            .returning(|_| Ok(CycleId::new("c-1")));
        mock.expect_create_session()
            .with(eq(CycleId::new("c-1")), eq(SessionType::Focus), eq(25))
            .returning(|id, _, _| {
                NotFoundSnafu {
                    kind: "cycle",
                    id: id.to_string(),
                }
                .fail()
            });
        mock.expect_current_cycle().returning(|| Ok(None));
        mock
    }
}
