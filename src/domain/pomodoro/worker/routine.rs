use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval};

use crate::domain::pomodoro::inbound::{AbandonOutcome, PauseOutcome, StartOutcome};
use crate::domain::pomodoro::worker::handle::Command;
use crate::domain::pomodoro::worker::sync::Synchronizer;
use crate::domain::timer::{Event, TICK_QUANTUM};

enum Input {
    Tick,
    Command(Command),
}

/// A type responsible for driving the timer. A [`WorkerRoutine`] runs on
/// background, receiving [`Command`]s from [`WorkerHandle`] and ticking the
/// machine once per second while a phase is running.
///
/// [`WorkerHandle`]: super::handle::WorkerHandle
pub struct WorkerRoutine {
    sync: Synchronizer,
    commands: Receiver<Command>,
    ticker: Option<Interval>,
}

impl WorkerRoutine {
    /// Spawn a running [`WorkerRoutine`] on background.
    pub fn spawn(sync: Synchronizer, commands: Receiver<Command>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut worker = Self {
                sync,
                commands,
                ticker: None,
            };
            worker.sync.restore().await;
            worker.run().await;
        })
    }

    async fn run(&mut self) {
        while let Some(input) = self.next_input().await {
            match input {
                Input::Tick => self.sync.dispatch(Event::Tick).await,
                Input::Command(command) => self.handle_command(command).await,
            }
            self.adjust_ticker();
        }
        tracing::debug!("All handles dropped, worker exits");
    }

    async fn next_input(&mut self) -> Option<Input> {
        match self.ticker.as_mut() {
            Some(ticker) => tokio::select! {
                biased;
                command = self.commands.recv() => command.map(Input::Command),
                _ = ticker.tick() => Some(Input::Tick),
            },
            None => self.commands.recv().await.map(Input::Command),
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::StartOrResume { responder } => {
                let state = self.sync.machine().state();
                let outcome = if state.is_paused() {
                    self.sync.dispatch(Event::Resume).await;
                    StartOutcome::Resumed
                } else if state.is_idle() {
                    self.sync.dispatch(Event::Start).await;
                    StartOutcome::Started
                } else {
                    StartOutcome::AlreadyRunning
                };
                let _ = responder.send(outcome);
            }
            Command::Pause { responder } => {
                let outcome = if self.sync.machine().state().is_running() {
                    self.sync.dispatch(Event::Pause).await;
                    PauseOutcome::Paused
                } else {
                    PauseOutcome::NotRunning
                };
                let _ = responder.send(outcome);
            }
            Command::Abandon { responder } => {
                let outcome = if self.sync.machine().state().is_idle() {
                    AbandonOutcome::NothingToAbandon
                } else {
                    self.sync.dispatch(Event::Abandon).await;
                    AbandonOutcome::Abandoned
                };
                let _ = responder.send(outcome);
            }
            Command::Restart => {
                // The restarted phase counts whole seconds from now.
                self.ticker = None;
                self.sync.dispatch(Event::Restart).await;
            }
            Command::UpdateSettings(patch) => {
                self.sync.dispatch(Event::UpdateSettings(patch)).await
            }
            Command::Query { responder } => {
                let _ = responder.send(self.sync.snapshot());
            }
        }
    }

    /// The ticker only exists while a phase is running, so nothing is
    /// scheduled once the machine leaves the running states.
    fn adjust_ticker(&mut self) {
        let running = self.sync.machine().state().is_running();
        match (running, self.ticker.is_some()) {
            (true, false) => {
                self.ticker = Some(tokio::time::interval_at(
                    Instant::now() + TICK_QUANTUM,
                    TICK_QUANTUM,
                ));
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Arc;

    use tokio::time::Duration;

    use crate::domain::entity::{Phase, PomodoroSettings, SettingsPatch};
    use crate::domain::pomodoro::outbound::NotifyPort;
    use crate::domain::pomodoro::worker::handle::WorkerHandle;
    use crate::domain::pomodoro::worker::testing::{
        settings, Call, RecordingNotifier, RecordingRepository,
    };
    use crate::domain::repository::CycleRepository;
    use crate::domain::timer::TimerMachine;

    #[tokio::test(start_paused = true)]
    async fn two_second_focus_moves_to_break() {
        let (repository, calls) = RecordingRepository::new();
        let (notifier, notifications) = RecordingNotifier::new();
        let handle = spawn_worker(settings(2, 5, 10, 2), repository, notifier);

        assert_eq!(handle.start_or_resume().await, StartOutcome::Started);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let snapshot = handle.query().await;
        assert_eq!(snapshot.state.running_phase(), Some(Phase::Focus));
        assert_eq!(snapshot.time_left, Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(1)).await;
        let snapshot = handle.query().await;
        assert_eq!(snapshot.state.running_phase(), Some(Phase::ShortBreak));
        assert_eq!(snapshot.time_left, Duration::from_secs(5));
        assert_eq!(snapshot.completed_sessions, 1);
        assert_eq!(notifications.lock().unwrap().len(), 1);
        assert_eq!(calls.lock().unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn start_or_resume_outcomes() {
        let (repository, _) = RecordingRepository::new();
        let (notifier, _) = RecordingNotifier::new();
        let handle = spawn_worker(settings(60, 5, 10, 2), repository, notifier);

        assert_eq!(handle.start_or_resume().await, StartOutcome::Started);
        assert_eq!(handle.start_or_resume().await, StartOutcome::AlreadyRunning);
        assert_eq!(handle.pause().await, PauseOutcome::Paused);
        assert_eq!(handle.pause().await, PauseOutcome::NotRunning);
        assert_eq!(handle.start_or_resume().await, StartOutcome::Resumed);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_abandon_while_idle_do_nothing() {
        let (repository, calls) = RecordingRepository::new();
        let (notifier, _) = RecordingNotifier::new();
        let handle = spawn_worker(settings(60, 5, 10, 2), repository, notifier);

        assert_eq!(handle.pause().await, PauseOutcome::NotRunning);
        assert_eq!(handle.abandon().await, AbandonOutcome::NothingToAbandon);
        assert!(handle.query().await.state.is_idle());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn paused_timer_does_not_tick() {
        let (repository, calls) = RecordingRepository::new();
        let (notifier, _) = RecordingNotifier::new();
        let handle = spawn_worker(settings(60, 5, 10, 2), repository, notifier);

        handle.start_or_resume().await;
        tokio::time::sleep(Duration::from_millis(3500)).await;
        handle.pause().await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        let snapshot = handle.query().await;
        assert!(snapshot.state.is_paused());
        assert_eq!(snapshot.time_left, Duration::from_secs(57));

        handle.start_or_resume().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.query().await.time_left, Duration::from_secs(56));
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn abandon_stops_ticking() {
        let (repository, calls) = RecordingRepository::new();
        let (notifier, notifications) = RecordingNotifier::new();
        let handle = spawn_worker(settings(2, 5, 10, 2), repository, notifier);

        handle.start_or_resume().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.abandon().await, AbandonOutcome::Abandoned);
        tokio::time::sleep(Duration::from_secs(10)).await;

        let snapshot = handle.query().await;
        assert!(snapshot.state.is_idle());
        assert_eq!(snapshot.time_left, Duration::from_secs(2));
        assert!(snapshot.cycle_id.is_none());
        assert!(notifications.lock().unwrap().is_empty());
        assert!(matches!(
            calls.lock().unwrap().last(),
            Some(Call::UpdateCycleStatus(_, _))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn settings_update_applies_to_untouched_countdown() {
        let (repository, _) = RecordingRepository::new();
        let (notifier, _) = RecordingNotifier::new();
        let handle = spawn_worker(settings(60, 5, 10, 2), repository, notifier);

        let patch = SettingsPatch {
            focus_duration: Some(settings(30, 5, 10, 2).focus_duration),
            ..SettingsPatch::default()
        };
        handle.update_settings(patch).await;

        let snapshot = handle.query().await;
        assert_eq!(snapshot.time_left, Duration::from_secs(30));
        assert_eq!(snapshot.settings, settings(30, 5, 10, 2));
    }

    fn spawn_worker(
        settings: PomodoroSettings,
        repository: Arc<dyn CycleRepository>,
        notifier: Arc<dyn NotifyPort>,
    ) -> WorkerHandle {
        let (requester, commands) = tokio::sync::mpsc::channel(1);
        let sync = Synchronizer::new(
            TimerMachine::new(settings),
            repository,
            notifier,
            HashMap::new(),
        );
        WorkerRoutine::spawn(sync, commands);
        WorkerHandle::new(requester)
    }
}
