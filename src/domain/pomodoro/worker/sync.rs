use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entity::{CycleStatus, Failure, Notice, NotificationMessage, SessionId};
use crate::domain::pomodoro::outbound::NotifyPort;
use crate::domain::pomodoro::worker::handle::TimerSnapshot;
use crate::domain::repository::{CycleRepository, PersistenceError};
use crate::domain::timer::{Event, TimerMachine, Transition};
use crate::tracing_report;

/// Keeps the persisted cycle and session records in step with the machine.
///
/// Every event goes through [`Synchronizer::dispatch`], which runs the pure
/// transition and then issues the persistence calls the transition calls
/// for. Any failure of a call needed to keep the run consistent halts the
/// timer and tells the user once.
pub struct Synchronizer {
    machine: TimerMachine,
    repository: Arc<dyn CycleRepository>,
    notifier: Arc<dyn NotifyPort>,
    messages: HashMap<Notice, NotificationMessage>,
}

impl Synchronizer {
    /// Creates a new [`Synchronizer`] driving the given machine.
    pub fn new(
        machine: TimerMachine,
        repository: Arc<dyn CycleRepository>,
        notifier: Arc<dyn NotifyPort>,
        messages: HashMap<Notice, NotificationMessage>,
    ) -> Self {
        Self {
            machine,
            repository,
            notifier,
            messages,
        }
    }

    pub fn machine(&self) -> &TimerMachine {
        &self.machine
    }

    /// Take a snapshot of the machine for queries.
    pub fn snapshot(&self) -> TimerSnapshot {
        let context = self.machine.context();
        TimerSnapshot {
            state: self.machine.state(),
            time_left: context.time_left(),
            completed_sessions: context.completed_sessions(),
            settings: *context.settings(),
            cycle_id: context.current_cycle_id().cloned(),
            session_id: context.current_session_id().cloned(),
        }
    }

    /// Pick up a cycle left in progress by an earlier run.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&mut self) {
        match self.repository.current_cycle().await {
            Ok(Some(cycle)) => {
                tracing::info!(cycle = %cycle.id, "Resuming cycle left in progress");
                self.machine.send(Event::AttachCycle(cycle.id));
            }
            Ok(None) => {}
            Err(err) => tracing_report!(err, "Could not look up the current cycle"),
        }
    }

    /// Feed an event into the machine and carry out its side effects.
    #[tracing::instrument(skip(self))]
    pub async fn dispatch(&mut self, event: Event) {
        match event {
            Event::Abandon => self.abandon().await,
            Event::Restart => {
                if self.close_open_session(false).await {
                    self.apply(Event::Restart).await;
                }
            }
            Event::Start if self.machine.state().is_paused() => {
                if self.close_open_session(false).await {
                    self.apply(Event::Start).await;
                }
            }
            event => self.apply(event).await,
        }
    }

    async fn apply(&mut self, event: Event) {
        let outgoing = self.machine.context().current_session_id().cloned();
        let cycle = self.machine.context().current_cycle_id().cloned();
        let transition = self.machine.send(event);

        if transition.from != transition.to {
            tracing::debug!(from = ?transition.from, to = ?transition.to, "Transition");
        }

        if transition.completed.is_some() && !self.finish_phase(&transition, outgoing).await {
            return;
        }

        if transition.is_cycle_complete() {
            if let Some(cycle) = cycle {
                tracing::info!(%cycle, "Cycle completed");
                if let Err(err) = self
                    .repository
                    .update_cycle_status(&cycle, CycleStatus::Completed)
                    .await
                {
                    tracing_report!(err, "Could not complete the cycle");
                    self.notify(&Failure::CompleteCycle.into()).await;
                }
            }
        }

        for notice in &transition.notices {
            let message = self
                .messages
                .get(notice)
                .cloned()
                .unwrap_or_else(|| notice.default_message());
            self.notify(&message).await;
        }

        self.ensure_records().await;
    }

    /// Close the session of the phase whose countdown just ran out. Returns
    /// `false` if the timer had to be halted.
    async fn finish_phase(&mut self, transition: &Transition, outgoing: Option<SessionId>) -> bool {
        let Some(session) = outgoing else {
            tracing::warn!(phase = ?transition.completed, "Phase ended without a session");
            return true;
        };

        match self.repository.complete_session(&session, true).await {
            Ok(()) => {
                self.machine.send(Event::DetachSession);
                true
            }
            Err(err) => {
                self.halt(Failure::CompleteSession, err).await;
                false
            }
        }
    }

    /// Create the cycle and session records a running phase needs, unless
    /// they already exist.
    async fn ensure_records(&mut self) {
        let Some(phase) = self.machine.state().running_phase() else {
            return;
        };

        let cycle = match self.machine.context().current_cycle_id() {
            Some(cycle) => cycle.clone(),
            None => {
                let settings = *self.machine.context().settings();
                match self.repository.create_cycle(&settings).await {
                    Ok(cycle) => {
                        tracing::info!(%cycle, "Started cycle");
                        self.machine.send(Event::AttachCycle(cycle.clone()));
                        cycle
                    }
                    Err(err) => return self.halt(Failure::StartCycle, err).await,
                }
            }
        };

        if self.machine.context().current_session_id().is_some() {
            return;
        }

        let minutes = self.machine.context().time_left().as_secs() / 60;
        let minutes = u32::try_from(minutes).unwrap_or(u32::MAX);
        match self.repository.create_session(&cycle, phase, minutes).await {
            Ok(session) => {
                tracing::info!(%session, ?phase, "Started session");
                self.machine.send(Event::AttachSession(session));
            }
            Err(err) => self.halt(Failure::StartSession, err).await,
        }
    }

    /// Close the open session before the current phase is thrown away.
    /// Returns `false` if the timer had to be halted.
    async fn close_open_session(&mut self, was_completed: bool) -> bool {
        let Some(session) = self.machine.context().current_session_id().cloned() else {
            return true;
        };

        match self.repository.complete_session(&session, was_completed).await {
            Ok(()) => {
                self.machine.send(Event::DetachSession);
                true
            }
            Err(err) => {
                self.halt(Failure::CompleteSession, err).await;
                false
            }
        }
    }

    /// Abandoning always succeeds locally. Remote failures are reported
    /// with at most one notification.
    async fn abandon(&mut self) {
        if self.machine.state().is_idle() {
            return;
        }

        let context = self.machine.context();
        let session = context.current_session_id().cloned();
        let cycle = context.current_cycle_id().cloned();
        let mut failure = None;

        if let Some(session) = session {
            if let Err(err) = self.repository.complete_session(&session, false).await {
                tracing_report!(err, "Could not close the abandoned session");
                failure = Some(Failure::AbandonSession);
            }
        }

        if let Some(cycle) = cycle {
            tracing::info!(%cycle, "Abandoning cycle");
            if let Err(err) = self
                .repository
                .update_cycle_status(&cycle, CycleStatus::Abandoned)
                .await
            {
                tracing_report!(err, "Could not abandon the cycle");
                failure = Some(Failure::AbandonCycle);
            }
        }

        self.machine.send(Event::Abandon);
        if let Some(failure) = failure {
            self.notify(&failure.into()).await;
        }
    }

    async fn halt(&mut self, failure: Failure, err: PersistenceError) {
        tracing_report!(err, failure);
        self.machine.send(Event::Halt);
        self.notify(&failure.into()).await;
    }

    async fn notify(&self, message: &NotificationMessage) {
        if let Err(err) = self.notifier.notify(message).await {
            tracing_report!(err);
        }
    }
}
