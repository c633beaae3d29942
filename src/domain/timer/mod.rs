//! The Pomodoro timer as a pure state machine.
//!
//! ```text
//! idle --START--> focus --TICK--> shortBreak --TICK--> focus --TICK--> longBreak --TICK--> idle
//!                   |  \________________ PAUSE / RESUME ________________/   |
//!                   +-------------------------- ABANDON ----------------------+--> idle
//! ```
//!
//! The machine performs no IO. Callers feed [`Event`]s through
//! [`TimerMachine::send`] and react to the returned [`Transition`].

mod context;
mod event;
mod machine;
mod state;

pub use context::{TimerContext, TICK_QUANTUM};
pub use event::Event;
pub use machine::{format_clock, TimerMachine, Transition};
pub use state::{FocusState, IdleState, LongBreakState, PausedState, ShortBreakState, TimerState};
