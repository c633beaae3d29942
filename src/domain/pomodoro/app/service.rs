use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entity::SettingsPatch;
use crate::domain::pomodoro::inbound::{
    AbandonOutcome, AbandonPort, PauseOutcome, PausePort, QueryPort, QueryResponse, RestartPort,
    StartOrResumePort, StartOutcome, StatsPort, UpdateSettingsPort,
};
use crate::domain::pomodoro::worker::{TimerSnapshot, WorkerHandle};
use crate::domain::repository::{CycleRepository, PersistenceError};
use crate::domain::timer::format_clock;

#[derive(Debug)]
pub struct StartOrResumeService {
    worker: Arc<WorkerHandle>,
}

impl StartOrResumeService {
    pub fn new(worker: Arc<WorkerHandle>) -> Self {
        Self { worker }
    }
}

#[async_trait::async_trait]
impl StartOrResumePort for StartOrResumeService {
    async fn start_or_resume(&self) -> StartOutcome {
        self.worker.start_or_resume().await
    }
}

#[derive(Debug)]
pub struct PauseService {
    worker: Arc<WorkerHandle>,
}

impl PauseService {
    pub fn new(worker: Arc<WorkerHandle>) -> Self {
        Self { worker }
    }
}

#[async_trait::async_trait]
impl PausePort for PauseService {
    async fn pause(&self) -> PauseOutcome {
        self.worker.pause().await
    }
}

#[derive(Debug)]
pub struct AbandonService {
    worker: Arc<WorkerHandle>,
}

impl AbandonService {
    pub fn new(worker: Arc<WorkerHandle>) -> Self {
        Self { worker }
    }
}

#[async_trait::async_trait]
impl AbandonPort for AbandonService {
    async fn abandon(&self) -> AbandonOutcome {
        self.worker.abandon().await
    }
}

#[derive(Debug)]
pub struct RestartService {
    worker: Arc<WorkerHandle>,
}

impl RestartService {
    pub fn new(worker: Arc<WorkerHandle>) -> Self {
        Self { worker }
    }
}

#[async_trait::async_trait]
impl RestartPort for RestartService {
    async fn restart(&self) {
        self.worker.restart().await
    }
}

#[derive(Debug)]
pub struct UpdateSettingsService {
    worker: Arc<WorkerHandle>,
}

impl UpdateSettingsService {
    pub fn new(worker: Arc<WorkerHandle>) -> Self {
        Self { worker }
    }
}

#[async_trait::async_trait]
impl UpdateSettingsPort for UpdateSettingsService {
    async fn update_settings(&self, patch: SettingsPatch) {
        if patch.is_empty() {
            return;
        }
        self.worker.update_settings(patch).await
    }
}

#[derive(Debug)]
pub struct QueryService {
    worker: Arc<WorkerHandle>,
}

impl QueryService {
    pub fn new(worker: Arc<WorkerHandle>) -> Self {
        Self { worker }
    }
}

#[async_trait::async_trait]
impl QueryPort for QueryService {
    async fn query(&self) -> QueryResponse {
        present(self.worker.query().await)
    }
}

fn present(snapshot: TimerSnapshot) -> QueryResponse {
    let TimerSnapshot {
        state,
        time_left,
        completed_sessions,
        settings,
        cycle_id,
        ..
    } = snapshot;
    QueryResponse {
        mode: state.label().to_owned(),
        clock: format_clock(time_left),
        remaining: time_left,
        running: state.is_running(),
        paused: state.is_paused(),
        completed_sessions,
        settings,
        cycle_id,
    }
}

pub struct StatsService {
    repository: Arc<dyn CycleRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn CycleRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl StatsPort for StatsService {
    async fn focus_minutes(&self, date: NaiveDate) -> Result<u32, PersistenceError> {
        self.repository.focus_minutes_on(date).await
    }
}
