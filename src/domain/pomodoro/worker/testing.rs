use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

use crate::domain::entity::{
    Cycle, CycleId, CycleStatus, PhaseDuration, PomodoroSettings, SessionId, SessionType,
};
use crate::domain::pomodoro::outbound::{NotifyError, NotifyPort, NotifyRequest};
use crate::domain::repository::{CycleRepository, PersistenceError};

pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<NotifyRequest>>>,
}

impl RecordingNotifier {
    pub fn new() -> (Arc<dyn NotifyPort>, Arc<Mutex<Vec<NotifyRequest>>>) {
        let notifications = Arc::new(Mutex::new(Vec::new()));
        let res = Self {
            notifications: Arc::clone(&notifications),
        };
        (Arc::new(res), notifications)
    }
}

#[async_trait::async_trait]
impl NotifyPort for RecordingNotifier {
    async fn notify_impl(&self, request: NotifyRequest) -> Result<(), NotifyError> {
        self.notifications.lock().unwrap().push(request);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateCycle,
    CreateSession(CycleId, SessionType, u32),
    CompleteSession(SessionId, bool),
    UpdateCycleStatus(CycleId, CycleStatus),
}

/// Repository that hands out sequential ids and records every write.
pub struct RecordingRepository {
    calls: Arc<Mutex<Vec<Call>>>,
    current: Option<Cycle>,
    cycles: Mutex<u32>,
    sessions: Mutex<u32>,
}

impl RecordingRepository {
    pub fn new() -> (Arc<dyn CycleRepository>, Arc<Mutex<Vec<Call>>>) {
        Self::with_current(None)
    }

    pub fn with_current(
        current: Option<Cycle>,
    ) -> (Arc<dyn CycleRepository>, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let res = Self {
            calls: Arc::clone(&calls),
            current,
            cycles: Mutex::new(0),
            sessions: Mutex::new(0),
        };
        (Arc::new(res), calls)
    }
}

#[async_trait::async_trait]
impl CycleRepository for RecordingRepository {
    async fn create_cycle(&self, _: &PomodoroSettings) -> Result<CycleId, PersistenceError> {
        let mut cycles = self.cycles.lock().unwrap();
        *cycles += 1;
        self.calls.lock().unwrap().push(Call::CreateCycle);
        Ok(CycleId::new(format!("cycle-{cycles}")))
    }

    async fn create_session(
        &self,
        cycle_id: &CycleId,
        session_type: SessionType,
        duration_minutes: u32,
    ) -> Result<SessionId, PersistenceError> {
        let mut sessions = self.sessions.lock().unwrap();
        *sessions += 1;
        self.calls.lock().unwrap().push(Call::CreateSession(
            cycle_id.clone(),
            session_type,
            duration_minutes,
        ));
        Ok(SessionId::new(format!("session-{sessions}")))
    }

    async fn complete_session(
        &self,
        session_id: &SessionId,
        was_completed: bool,
    ) -> Result<(), PersistenceError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::CompleteSession(session_id.clone(), was_completed));
        Ok(())
    }

    async fn update_cycle_status(
        &self,
        cycle_id: &CycleId,
        status: CycleStatus,
    ) -> Result<(), PersistenceError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::UpdateCycleStatus(cycle_id.clone(), status));
        Ok(())
    }

    async fn current_cycle(&self) -> Result<Option<Cycle>, PersistenceError> {
        Ok(self.current.clone())
    }

    async fn focus_minutes_on(&self, _: NaiveDate) -> Result<u32, PersistenceError> {
        Ok(0)
    }
}

pub fn in_progress_cycle(id: &str) -> Cycle {
    let now = Utc::now();
    Cycle {
        id: CycleId::new(id),
        status: CycleStatus::InProgress,
        settings: PomodoroSettings::default(),
        started_at: now,
        completed_at: None,
        updated_at: now,
    }
}

/// Settings measured in seconds so tests stay short.
pub fn settings(focus: u64, short_break: u64, long_break: u64, sessions: u32) -> PomodoroSettings {
    PomodoroSettings {
        focus_duration: PhaseDuration::try_from_secs(focus).unwrap(),
        short_break_duration: PhaseDuration::try_from_secs(short_break).unwrap(),
        long_break_duration: PhaseDuration::try_from_secs(long_break).unwrap(),
        sessions_until_long_break: sessions.try_into().unwrap(),
        ..PomodoroSettings::default()
    }
}
