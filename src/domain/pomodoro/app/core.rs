use std::sync::Arc;

use snafu::prelude::*;

use crate::domain::pomodoro::app::service::{
    AbandonService, PauseService, QueryService, RestartService, StartOrResumeService,
    StatsService, UpdateSettingsService,
};
use crate::domain::pomodoro::inbound::{
    AbandonPort, PausePort, QueryPort, RestartPort, StartOrResumePort, StatsPort,
    UpdateSettingsPort,
};
use crate::domain::pomodoro::outbound::NotifyPort;
use crate::domain::pomodoro::worker::{self, SpawnWorkerError};
use crate::domain::repository::{CycleRepository, NotificationRepository, SettingsRepository};

/// Entrance to the domain logic, providing ports for external adapters.
pub struct ApplicationCore {
    pub start_or_resume: Arc<dyn StartOrResumePort>,
    pub pause: Arc<dyn PausePort>,
    pub abandon: Arc<dyn AbandonPort>,
    pub restart: Arc<dyn RestartPort>,
    pub update_settings: Arc<dyn UpdateSettingsPort>,
    pub query: Arc<dyn QueryPort>,
    pub stats: Arc<dyn StatsPort>,
}

impl ApplicationCore {
    /// Initialize the application by injecting external repositories and
    /// adapters.
    ///
    /// # Errors
    ///
    /// This function will return an error if initialization failed.
    pub async fn setup(
        notify_port: Arc<dyn NotifyPort>,
        settings_repository: Arc<dyn SettingsRepository>,
        notification_repository: Arc<dyn NotificationRepository>,
        cycle_repository: Arc<dyn CycleRepository>,
    ) -> Result<ApplicationCore, SetupApplicationCoreError> {
        let worker = worker::spawn(
            settings_repository,
            notification_repository,
            Arc::clone(&cycle_repository),
            notify_port,
        )
        .await
        .context(WorkerSnafu)?;
        let worker = Arc::new(worker);

        Ok(ApplicationCore {
            start_or_resume: Arc::new(StartOrResumeService::new(Arc::clone(&worker))),
            pause: Arc::new(PauseService::new(Arc::clone(&worker))),
            abandon: Arc::new(AbandonService::new(Arc::clone(&worker))),
            restart: Arc::new(RestartService::new(Arc::clone(&worker))),
            update_settings: Arc::new(UpdateSettingsService::new(Arc::clone(&worker))),
            query: Arc::new(QueryService::new(worker)),
            stats: Arc::new(StatsService::new(cycle_repository)),
        })
    }
}

/// An error for initializing the application.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SetupApplicationCoreError {
    #[snafu(display("Could not spawn a background worker"))]
    Worker { source: SpawnWorkerError },
}
