use std::time::Duration;

use crate::domain::entity::{Notice, Phase, PomodoroSettings};
use crate::domain::timer::context::TimerContext;
use crate::domain::timer::event::Event;
use crate::domain::timer::state::{Effects, StateHandle, TimerState};

/// What happened while one [`Event`] was processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: TimerState,
    pub to: TimerState,
    pub notices: Vec<Notice>,
    /// Set when the countdown of this phase ran out on a tick.
    pub completed: Option<Phase>,
}

impl Transition {
    /// Returns `true` if a long break ran out and closed the cycle.
    pub fn is_cycle_complete(&self) -> bool {
        self.completed == Some(Phase::LongBreak)
    }
}

/// Deterministic Pomodoro state machine. Every transition is total: events a
/// state does not handle are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerMachine {
    state: TimerState,
    context: TimerContext,
}

impl TimerMachine {
    /// Creates a new idle [`TimerMachine`].
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            state: TimerState::initial(),
            context: TimerContext::new(settings),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Returns a reference to the working context.
    pub fn context(&self) -> &TimerContext {
        &self.context
    }

    /// Feed one event into the machine.
    pub fn send(&mut self, event: Event) -> Transition {
        let from = self.state;
        let mut effects = Effects::default();

        self.state = match event {
            Event::UpdateSettings(patch) => {
                self.context.apply_settings(&patch);
                from
            }
            Event::AttachCycle(id) => {
                self.context.attach_cycle(id);
                from
            }
            Event::AttachSession(id) => {
                self.context.attach_session(id);
                from
            }
            Event::DetachSession => {
                self.context.detach_session();
                from
            }
            Event::Restart => TimerState::restart(&mut self.context),
            Event::Halt => TimerState::reset(&mut self.context),
            event => from.handle(&event, &mut self.context, &mut effects),
        };

        let Effects { notices, completed } = effects;
        Transition {
            from,
            to: self.state,
            notices,
            completed,
        }
    }
}

/// Formats a remaining time as `MM:SS`. Zero renders as `00:00`.
pub fn format_clock(time_left: Duration) -> String {
    let seconds = time_left.as_secs();
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::entity::{
        CycleId, LongBreakInterval, PhaseDuration, SessionId, SettingsPatch,
    };
    use crate::domain::timer::state::{
        FocusState, IdleState, LongBreakState, PausedState, ShortBreakState,
    };

    fn settings(focus_ms: u64, sessions: u32) -> PomodoroSettings {
        PomodoroSettings {
            focus_duration: PhaseDuration::try_from_millis(focus_ms).unwrap(),
            short_break_duration: PhaseDuration::try_from_millis(3000).unwrap(),
            long_break_duration: PhaseDuration::try_from_millis(5000).unwrap(),
            sessions_until_long_break: LongBreakInterval::try_new(sessions).unwrap(),
            auto_start_breaks: true,
            auto_start_pomodoros: true,
        }
    }

    fn ticks(machine: &mut TimerMachine, count: usize) -> Vec<Transition> {
        (0..count).map(|_| machine.send(Event::Tick)).collect()
    }

    /// Tick until the running phase changes and return the transition.
    fn finish_phase(machine: &mut TimerMachine) -> Transition {
        let phase = machine.state();
        loop {
            let transition = machine.send(Event::Tick);
            if transition.to != phase {
                return transition;
            }
        }
    }

    #[test]
    fn machine_initial() {
        let machine = TimerMachine::new(settings(2000, 2));
        assert_eq!(machine.state(), IdleState.into());
        assert_eq!(machine.context().time_left(), Duration::from_millis(2000));
        assert_eq!(machine.context().completed_sessions(), 0);
        assert_eq!(machine.context().current_cycle_id(), None);
    }

    #[test]
    fn machine_start() {
        let mut machine = TimerMachine::new(settings(2000, 2));
        let transition = machine.send(Event::Start);

        assert_eq!(transition.to, FocusState.into());
        assert_eq!(transition.from, IdleState.into());
        assert!(transition.notices.is_empty());
        assert_eq!(machine.context().time_left(), Duration::from_millis(2000));
    }

    #[test]
    fn machine_focus_leaves_after_exact_ticks() {
        for (focus_ms, sessions) in [(1000, 1), (2000, 2), (5000, 3), (60_000, 4)] {
            let mut machine = TimerMachine::new(settings(focus_ms, sessions));
            machine.send(Event::Start);

            let count = (focus_ms / 1000) as usize;
            let transitions = ticks(&mut machine, count);
            let (last, before) = transitions.split_last().unwrap();

            assert!(before.iter().all(|t| t.to == FocusState.into()));
            assert!(before.iter().all(|t| t.completed.is_none()));
            assert_eq!(last.completed, Some(Phase::Focus));
            assert_ne!(last.to, FocusState.into());
        }
    }

    #[test]
    fn machine_partial_second_never_negative() {
        let mut machine = TimerMachine::new(settings(2500, 2));
        machine.send(Event::Start);
        ticks(&mut machine, 2);
        assert_eq!(machine.context().time_left(), Duration::from_millis(500));

        let transition = machine.send(Event::Tick);
        assert_eq!(transition.to, ShortBreakState.into());
        assert_eq!(machine.context().time_left(), Duration::from_millis(3000));
    }

    #[test]
    fn machine_long_break_cadence() {
        for sessions in 1..=5u32 {
            let mut machine = TimerMachine::new(settings(1000, sessions));
            machine.send(Event::Start);

            let mut long_breaks = Vec::new();
            for completed in 1..=(sessions * 2) {
                let transition = finish_phase(&mut machine);
                assert_eq!(transition.completed, Some(Phase::Focus));
                if transition.to == LongBreakState.into() {
                    long_breaks.push(completed);
                    // Start over so the counter keeps growing across cycles.
                    machine.send(Event::Restart);
                } else {
                    assert_eq!(transition.to, ShortBreakState.into());
                    let back = finish_phase(&mut machine);
                    assert_eq!(back.to, FocusState.into());
                }
            }

            assert_eq!(long_breaks, vec![sessions, sessions * 2]);
        }
    }

    #[test]
    fn machine_full_cycle_scenario() {
        let mut machine = TimerMachine::new(settings(2000, 2));
        machine.send(Event::Start);
        assert_eq!(machine.context().time_left(), Duration::from_millis(2000));

        let transitions = ticks(&mut machine, 2);
        assert_eq!(transitions[0].to, FocusState.into());
        assert_eq!(transitions[1].to, ShortBreakState.into());
        assert_eq!(transitions[1].notices, vec![Notice::FocusEnded]);
        assert_eq!(machine.context().completed_sessions(), 1);
        assert_eq!(machine.context().time_left(), Duration::from_millis(3000));

        let transition = finish_phase(&mut machine);
        assert_eq!(transition.to, FocusState.into());
        assert_eq!(transition.completed, Some(Phase::ShortBreak));
        assert_eq!(transition.notices, vec![Notice::ShortBreakEnded]);
        assert_eq!(machine.context().completed_sessions(), 1);
        assert_eq!(machine.context().time_left(), Duration::from_millis(2000));

        let transition = finish_phase(&mut machine);
        assert_eq!(transition.to, LongBreakState.into());
        assert_eq!(machine.context().completed_sessions(), 2);
        assert_eq!(machine.context().time_left(), Duration::from_millis(5000));

        let transition = finish_phase(&mut machine);
        assert_eq!(transition.to, IdleState.into());
        assert!(transition.is_cycle_complete());
        assert_eq!(transition.notices, vec![Notice::CycleCompleted]);
        assert_eq!(machine.context().completed_sessions(), 0);
        assert_eq!(machine.context().time_left(), Duration::from_millis(2000));
    }

    #[test]
    fn machine_cycle_complete_clears_ids() {
        let mut machine = TimerMachine::new(settings(1000, 1));
        machine.send(Event::Start);
        machine.send(Event::AttachCycle(CycleId::new("c")));
        machine.send(Event::AttachSession(SessionId::new("s")));
        finish_phase(&mut machine);
        finish_phase(&mut machine);

        assert!(machine.state().is_idle());
        assert_eq!(machine.context().current_cycle_id(), None);
        assert_eq!(machine.context().current_session_id(), None);
    }

    #[test]
    fn machine_abandon_idle_is_noop() {
        let mut machine = TimerMachine::new(settings(2000, 2));
        machine.send(Event::AttachCycle(CycleId::new("restored")));
        let before = machine.clone();

        let transition = machine.send(Event::Abandon);
        assert_eq!(transition.from, transition.to);
        assert_eq!(machine, before);
    }

    #[test]
    fn machine_abandon_resets_from_every_active_state() {
        let prepare: [fn(&mut TimerMachine); 4] = [
            |_| {},
            |m| {
                finish_phase(m);
            },
            |m| {
                finish_phase(m);
                finish_phase(m);
                finish_phase(m);
            },
            |m| {
                m.send(Event::Tick);
                m.send(Event::Pause);
            },
        ];

        for prepare in prepare {
            let mut machine = TimerMachine::new(settings(2000, 2));
            machine.send(Event::Start);
            machine.send(Event::AttachCycle(CycleId::new("c")));
            machine.send(Event::AttachSession(SessionId::new("s")));
            prepare(&mut machine);
            assert!(!machine.state().is_idle());

            machine.send(Event::Abandon);
            assert_eq!(machine.state(), IdleState.into());
            assert_eq!(machine.context().completed_sessions(), 0);
            assert_eq!(machine.context().time_left(), Duration::from_millis(2000));
            assert_eq!(machine.context().current_cycle_id(), None);
            assert_eq!(machine.context().current_session_id(), None);
        }
    }

    #[test]
    fn machine_pause_resume_keeps_time() {
        let mut machine = TimerMachine::new(settings(5000, 2));
        machine.send(Event::Start);
        ticks(&mut machine, 2);
        let time_left = machine.context().time_left();

        machine.send(Event::Pause);
        assert_eq!(
            machine.state(),
            PausedState {
                resume_to: Phase::Focus
            }
            .into()
        );
        machine.send(Event::Tick);
        machine.send(Event::Resume);

        assert_eq!(machine.state(), FocusState.into());
        assert_eq!(machine.context().time_left(), time_left);
    }

    #[test]
    fn machine_resume_returns_to_interrupted_break() {
        let mut machine = TimerMachine::new(settings(1000, 2));
        machine.send(Event::Start);
        finish_phase(&mut machine);
        machine.send(Event::Tick);
        machine.send(Event::Pause);
        assert_eq!(machine.state().label(), "Short Break");

        machine.send(Event::Resume);
        assert_eq!(machine.state(), ShortBreakState.into());
        assert_eq!(machine.context().time_left(), Duration::from_millis(2000));
    }

    #[test]
    fn machine_start_while_paused_restarts_focus() {
        let mut machine = TimerMachine::new(settings(5000, 2));
        machine.send(Event::Start);
        ticks(&mut machine, 3);
        machine.send(Event::Pause);
        machine.send(Event::Start);

        assert_eq!(machine.state(), FocusState.into());
        assert_eq!(machine.context().time_left(), Duration::from_millis(5000));
    }

    #[test]
    fn machine_unhandled_events_are_noops() {
        let mut machine = TimerMachine::new(settings(5000, 2));
        for event in [Event::Pause, Event::Resume, Event::Tick] {
            let before = machine.clone();
            machine.send(event);
            assert_eq!(machine, before);
        }

        machine.send(Event::Start);
        ticks(&mut machine, 1);
        for event in [Event::Start, Event::Resume] {
            let before = machine.clone();
            machine.send(event);
            assert_eq!(machine, before);
        }
    }

    #[test]
    fn machine_restart_from_any_state() {
        let mut machine = TimerMachine::new(settings(2000, 3));
        machine.send(Event::Restart);
        assert_eq!(machine.state(), FocusState.into());

        finish_phase(&mut machine);
        machine.send(Event::Tick);
        machine.send(Event::Restart);
        assert_eq!(machine.state(), FocusState.into());
        assert_eq!(machine.context().time_left(), Duration::from_millis(2000));
        assert_eq!(machine.context().completed_sessions(), 1);
    }

    #[test]
    fn machine_update_settings_before_countdown() {
        let mut machine = TimerMachine::new(settings(2000, 2));
        machine.send(Event::UpdateSettings(SettingsPatch {
            focus_duration: Some(PhaseDuration::try_from_millis(4000).unwrap()),
            ..Default::default()
        }));
        assert!(machine.state().is_idle());
        assert_eq!(machine.context().time_left(), Duration::from_millis(4000));

        machine.send(Event::Start);
        assert_eq!(machine.context().time_left(), Duration::from_millis(4000));
    }

    #[test]
    fn machine_update_settings_mid_countdown() {
        let mut machine = TimerMachine::new(settings(5000, 2));
        machine.send(Event::Start);
        ticks(&mut machine, 1);
        machine.send(Event::UpdateSettings(SettingsPatch {
            focus_duration: Some(PhaseDuration::try_from_millis(9000).unwrap()),
            ..Default::default()
        }));

        assert_eq!(machine.context().time_left(), Duration::from_millis(4000));
        assert_eq!(machine.state(), FocusState.into());

        // The new duration applies to the next focus phase.
        finish_phase(&mut machine);
        finish_phase(&mut machine);
        assert_eq!(machine.context().time_left(), Duration::from_millis(9000));
    }

    #[test]
    fn machine_update_cadence_takes_effect_on_next_completion() {
        let mut machine = TimerMachine::new(settings(1000, 4));
        machine.send(Event::Start);
        machine.send(Event::UpdateSettings(SettingsPatch {
            sessions_until_long_break: Some(LongBreakInterval::try_new(1).unwrap()),
            ..Default::default()
        }));

        let transition = finish_phase(&mut machine);
        assert_eq!(transition.to, LongBreakState.into());
    }

    #[test]
    fn machine_without_auto_start_waits_for_user() {
        let mut machine = TimerMachine::new(PomodoroSettings {
            auto_start_breaks: false,
            auto_start_pomodoros: false,
            ..settings(1000, 2)
        });
        machine.send(Event::Start);

        let transition = machine.send(Event::Tick);
        assert_eq!(
            transition.to,
            PausedState {
                resume_to: Phase::ShortBreak
            }
            .into()
        );
        assert_eq!(machine.context().time_left(), Duration::from_millis(3000));

        machine.send(Event::Resume);
        finish_phase(&mut machine);
        assert_eq!(
            machine.state(),
            PausedState {
                resume_to: Phase::Focus
            }
            .into()
        );
        assert_eq!(machine.state().label(), "Focus");
    }

    #[test]
    fn machine_halt_resets_everything() {
        let mut machine = TimerMachine::new(settings(2000, 2));
        machine.send(Event::AttachCycle(CycleId::new("c")));
        machine.send(Event::Halt);
        assert_eq!(machine, TimerMachine::new(settings(2000, 2)));

        machine.send(Event::Start);
        finish_phase(&mut machine);
        machine.send(Event::Halt);
        assert_eq!(machine, TimerMachine::new(settings(2000, 2)));
    }

    #[test]
    fn machine_session_ids() {
        let mut machine = TimerMachine::new(settings(2000, 2));
        machine.send(Event::AttachSession(SessionId::new("s")));
        assert_eq!(
            machine.context().current_session_id(),
            Some(&SessionId::new("s"))
        );
        machine.send(Event::DetachSession);
        assert_eq!(machine.context().current_session_id(), None);
    }

    #[test]
    fn state_label() {
        assert_eq!(TimerState::initial().label(), "Ready");
        assert_eq!(TimerState::from(FocusState).label(), "Focus");
        assert_eq!(TimerState::from(LongBreakState).label(), "Long Break");
        assert_eq!(
            TimerState::from(PausedState {
                resume_to: Phase::ShortBreak
            })
            .label(),
            "Short Break"
        );
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_millis(999)), "00:00");
        assert_eq!(format_clock(Duration::from_secs(65)), "01:05");
        assert_eq!(format_clock(Duration::from_secs(25 * 60)), "25:00");
        assert_eq!(format_clock(Duration::from_secs(100 * 60 + 1)), "100:01");
    }
}
