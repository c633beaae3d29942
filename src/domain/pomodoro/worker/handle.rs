use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, Sender as OneshotSender};
use tokio::time::Duration;

use crate::domain::entity::{CycleId, PomodoroSettings, SessionId, SettingsPatch};
use crate::domain::pomodoro::inbound::{AbandonOutcome, PauseOutcome, StartOutcome};
use crate::domain::timer::TimerState;

/// Snapshot of the machine taken by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub time_left: Duration,
    pub completed_sessions: u32,
    pub settings: PomodoroSettings,
    pub cycle_id: Option<CycleId>,
    pub session_id: Option<SessionId>,
}

/// Actions that a [`WorkerRoutine`] runs.
///
/// [`WorkerRoutine`]: super::routine::WorkerRoutine
#[derive(Debug)]
pub enum Command {
    StartOrResume {
        responder: OneshotSender<StartOutcome>,
    },
    Pause {
        responder: OneshotSender<PauseOutcome>,
    },
    Abandon {
        responder: OneshotSender<AbandonOutcome>,
    },
    Restart,
    UpdateSettings(SettingsPatch),
    Query {
        responder: OneshotSender<TimerSnapshot>,
    },
}

/// Handle that controls a [`WorkerRoutine`].
///
/// [`WorkerRoutine`]: super::routine::WorkerRoutine
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    requester: Sender<Command>,
}

impl WorkerHandle {
    /// Creates a new [`WorkerHandle`].
    pub fn new(requester: Sender<Command>) -> Self {
        Self { requester }
    }

    /// Send [`Command::StartOrResume`] and wait until it is handled.
    pub async fn start_or_resume(&self) -> StartOutcome {
        let (responder, receiver) = oneshot::channel();
        self.send(Command::StartOrResume { responder }).await;
        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => unreachable!("Worker should not be shutted down"),
        }
    }

    /// Send [`Command::Pause`] to the background worker and pause the timer.
    pub async fn pause(&self) -> PauseOutcome {
        let (responder, receiver) = oneshot::channel();
        self.send(Command::Pause { responder }).await;
        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => unreachable!("Worker should not be shutted down"),
        }
    }

    /// Send [`Command::Abandon`] to the background worker and give up the
    /// current cycle.
    pub async fn abandon(&self) -> AbandonOutcome {
        let (responder, receiver) = oneshot::channel();
        self.send(Command::Abandon { responder }).await;
        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => unreachable!("Worker should not be shutted down"),
        }
    }

    /// Send [`Command::Restart`] to the background worker.
    pub async fn restart(&self) {
        self.send(Command::Restart).await
    }

    /// Send [`Command::UpdateSettings`] to the background worker.
    pub async fn update_settings(&self, patch: SettingsPatch) {
        self.send(Command::UpdateSettings(patch)).await
    }

    /// Send [`Command::Query`] to the background worker to get the current
    /// state. Commands sent earlier are handled before the query.
    pub async fn query(&self) -> TimerSnapshot {
        let (responder, receiver) = oneshot::channel();
        self.send(Command::Query { responder }).await;
        match receiver.await {
            Ok(snapshot) => snapshot,
            Err(_) => unreachable!("Worker should not be shutted down"),
        }
    }

    async fn send(&self, command: Command) {
        if self.requester.send(command).await.is_err() {
            unreachable!("Worker should not be shutted down");
        }
    }
}
