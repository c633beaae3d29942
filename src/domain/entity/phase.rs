use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// The kind of timed activity that is currently measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// The phase every cycle starts with.
    pub fn initial() -> Self {
        Self::Focus
    }

    /// Returns `true` if this is one of the break phases.
    pub fn is_break(self) -> bool {
        !matches!(self, Self::Focus)
    }

    /// Human readable label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Focus => "Focus",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Focus => f.write_str("FOCUS"),
            Self::ShortBreak => f.write_str("SHORT_BREAK"),
            Self::LongBreak => f.write_str("LONG_BREAK"),
        }
    }
}

/// Type of a persisted session record. Each session records one [`Phase`].
pub type SessionType = Phase;
