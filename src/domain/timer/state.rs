use crate::domain::entity::{Notice, Phase};
use crate::domain::timer::context::TimerContext;
use crate::domain::timer::event::Event;

/// Things a transition reports to whoever drives the machine.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Effects {
    pub notices: Vec<Notice>,
    /// The phase whose countdown ran out during this transition.
    pub completed: Option<Phase>,
}

#[enum_dispatch::enum_dispatch]
pub(super) trait StateHandle {
    fn handle(
        self,
        event: &Event,
        context: &mut TimerContext,
        effects: &mut Effects,
    ) -> TimerState;
}

/// The state of the timer. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[enum_dispatch::enum_dispatch(StateHandle)]
pub enum TimerState {
    Idle(IdleState),
    Focus(FocusState),
    ShortBreak(ShortBreakState),
    LongBreak(LongBreakState),
    Paused(PausedState),
}

impl TimerState {
    /// The state a fresh machine starts in.
    pub fn initial() -> Self {
        IdleState.into()
    }

    /// The phase that is counting down right now, if any.
    pub fn running_phase(&self) -> Option<Phase> {
        match self {
            Self::Focus(_) => Some(Phase::Focus),
            Self::ShortBreak(_) => Some(Phase::ShortBreak),
            Self::LongBreak(_) => Some(Phase::LongBreak),
            Self::Idle(_) | Self::Paused(_) => None,
        }
    }

    /// Returns `true` while ticks should be delivered.
    pub fn is_running(&self) -> bool {
        self.running_phase().is_some()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused(_))
    }

    /// Label shown to the user. A paused timer keeps the label of the phase
    /// it interrupted.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle(_) => "Ready",
            Self::Paused(PausedState { resume_to }) => resume_to.label(),
            _ => self.running_phase().map_or("Ready", Phase::label),
        }
    }

    /// Running state counting down the given phase.
    fn running(phase: Phase) -> Self {
        match phase {
            Phase::Focus => FocusState.into(),
            Phase::ShortBreak => ShortBreakState.into(),
            Phase::LongBreak => LongBreakState.into(),
        }
    }

    /// Enter the next phase, either running or waiting for the user when the
    /// settings forbid starting it automatically.
    fn enter(phase: Phase, context: &mut TimerContext) -> Self {
        context.measure(phase);
        if context.settings().auto_starts(phase) {
            Self::running(phase)
        } else {
            PausedState { resume_to: phase }.into()
        }
    }

    /// Restart the focus phase of the current cycle.
    pub(super) fn restart(context: &mut TimerContext) -> Self {
        context.measure(Phase::Focus);
        FocusState.into()
    }

    /// Drop everything and go back to idle.
    pub(super) fn reset(context: &mut TimerContext) -> Self {
        context.reset();
        IdleState.into()
    }
}

/// Nothing is running. Both the initial and the resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleState;

impl StateHandle for IdleState {
    fn handle(self, event: &Event, context: &mut TimerContext, _: &mut Effects) -> TimerState {
        match event {
            Event::Start => {
                context.measure(Phase::initial());
                FocusState.into()
            }
            _ => self.into(),
        }
    }
}

/// Counting down a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState;

impl StateHandle for FocusState {
    fn handle(
        self,
        event: &Event,
        context: &mut TimerContext,
        effects: &mut Effects,
    ) -> TimerState {
        match event {
            Event::Pause => PausedState {
                resume_to: Phase::Focus,
            }
            .into(),
            Event::Abandon => TimerState::reset(context),
            Event::Tick => self.handle_tick(context, effects),
            _ => self.into(),
        }
    }
}

impl FocusState {
    fn handle_tick(self, context: &mut TimerContext, effects: &mut Effects) -> TimerState {
        if context.tick() {
            self.handle_expired(context, effects)
        } else {
            self.into()
        }
    }

    fn handle_expired(self, context: &mut TimerContext, effects: &mut Effects) -> TimerState {
        let completed = context.complete_focus();
        let next = if context
            .settings()
            .sessions_until_long_break
            .is_long_break_after(completed)
        {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        };

        effects.completed = Some(Phase::Focus);
        effects.notices.push(Notice::FocusEnded);
        TimerState::enter(next, context)
    }
}

/// Counting down a short break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortBreakState;

impl StateHandle for ShortBreakState {
    fn handle(
        self,
        event: &Event,
        context: &mut TimerContext,
        effects: &mut Effects,
    ) -> TimerState {
        match event {
            Event::Pause => PausedState {
                resume_to: Phase::ShortBreak,
            }
            .into(),
            Event::Abandon => TimerState::reset(context),
            Event::Tick => self.handle_tick(context, effects),
            _ => self.into(),
        }
    }
}

impl ShortBreakState {
    fn handle_tick(self, context: &mut TimerContext, effects: &mut Effects) -> TimerState {
        if !context.tick() {
            return self.into();
        }

        effects.completed = Some(Phase::ShortBreak);
        effects.notices.push(Notice::ShortBreakEnded);
        TimerState::enter(Phase::Focus, context)
    }
}

/// Counting down the long break which closes a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongBreakState;

impl StateHandle for LongBreakState {
    fn handle(
        self,
        event: &Event,
        context: &mut TimerContext,
        effects: &mut Effects,
    ) -> TimerState {
        match event {
            Event::Pause => PausedState {
                resume_to: Phase::LongBreak,
            }
            .into(),
            Event::Abandon => TimerState::reset(context),
            Event::Tick => self.handle_tick(context, effects),
            _ => self.into(),
        }
    }
}

impl LongBreakState {
    fn handle_tick(self, context: &mut TimerContext, effects: &mut Effects) -> TimerState {
        if !context.tick() {
            return self.into();
        }

        effects.completed = Some(Phase::LongBreak);
        effects.notices.push(Notice::CycleCompleted);
        TimerState::reset(context)
    }
}

/// A phase is interrupted and its countdown frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PausedState {
    pub resume_to: Phase,
}

impl StateHandle for PausedState {
    fn handle(self, event: &Event, context: &mut TimerContext, _: &mut Effects) -> TimerState {
        match event {
            Event::Resume => TimerState::running(self.resume_to),
            Event::Start => TimerState::restart(context),
            Event::Abandon => TimerState::reset(context),
            _ => self.into(),
        }
    }
}
