use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::phase::SessionType;
use crate::domain::entity::settings::PomodoroSettings;

/// Identifier of a persisted [`Cycle`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(String);

/// Identifier of a persisted [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

macro_rules! record_id {
    ($name:ident) => {
        impl $name {
            /// Wraps an identifier issued by the persistence layer.
            pub fn new<S: Into<String>>(id: S) -> Self {
                Self(id.into())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(&self.0)
            }
        }
    };
}

record_id!(CycleId);
record_id!(SessionId);

/// Lifecycle status of a [`Cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl CycleStatus {
    /// Returns `true` if the cycle can no longer change.
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl Display for CycleStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InProgress => f.write_str("IN_PROGRESS"),
            Self::Completed => f.write_str("COMPLETED"),
            Self::Abandoned => f.write_str("ABANDONED"),
        }
    }
}

/// One full run from the first focus session to a finished long break or an
/// abandonment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub id: CycleId,
    pub status: CycleStatus,
    pub settings: PomodoroSettings,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// One timed phase instance belonging to a [`Cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub cycle_id: CycleId,
    pub session_type: SessionType,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub is_completed: bool,
}

impl Session {
    /// Minutes this session adds to the focus time of the day it started.
    pub fn focused_minutes(&self) -> u32 {
        if self.session_type == SessionType::Focus && self.is_completed {
            self.duration_minutes
        } else {
            0
        }
    }
}
