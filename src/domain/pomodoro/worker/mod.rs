mod handle;
mod routine;
mod sync;
#[cfg(test)]
mod testing;

pub use handle::{TimerSnapshot, WorkerHandle};

use std::collections::HashMap;
use std::sync::Arc;

use snafu::prelude::*;

use crate::domain::entity::Notice;
use crate::domain::pomodoro::outbound::NotifyPort;
use crate::domain::repository::{
    CycleRepository, GetNotificationError, GetSettingsError, NotificationRepository,
    SettingsRepository,
};
use crate::domain::timer::TimerMachine;

use routine::WorkerRoutine;
use sync::Synchronizer;

/// Load the configuration, pick up a cycle left in progress and spawn the
/// background worker.
///
/// # Errors
///
/// This function will return an error if the settings or a notification
/// message could not be loaded.
pub async fn spawn(
    settings_repository: Arc<dyn SettingsRepository>,
    notification_repository: Arc<dyn NotificationRepository>,
    cycle_repository: Arc<dyn CycleRepository>,
    notifier: Arc<dyn NotifyPort>,
) -> Result<WorkerHandle, SpawnWorkerError> {
    let settings = settings_repository.settings().await.context(SettingsSnafu)?;

    let mut messages = HashMap::new();
    for notice in Notice::ALL {
        let message = notification_repository
            .notification(notice)
            .await
            .context(NotificationSnafu { notice })?;
        messages.insert(notice, message);
    }

    let (requester, commands) = tokio::sync::mpsc::channel(1);
    let sync = Synchronizer::new(
        TimerMachine::new(settings),
        cycle_repository,
        notifier,
        messages,
    );
    WorkerRoutine::spawn(sync, commands);
    Ok(WorkerHandle::new(requester))
}

/// An error for spawning the background worker.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SpawnWorkerError {
    #[snafu(display("Could not load timer settings from repository"))]
    Settings { source: GetSettingsError },
    #[snafu(display("Could not load notification for {notice} from repository"))]
    Notification {
        notice: Notice,
        source: GetNotificationError,
    },
}
