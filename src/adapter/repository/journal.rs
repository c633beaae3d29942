use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entity::{
    Cycle, CycleId, CycleStatus, LongBreakInterval, PhaseDuration, PomodoroSettings, Session,
    SessionId, SessionType,
};
use crate::domain::repository::cycle::{NotFoundSnafu, PersistenceError, StorageSnafu};
use crate::domain::repository::CycleRepository;

/// A [`CycleRepository`] implementation which keeps every cycle and session
/// in a JSON file.
///
/// The whole journal is held in memory. A change is first written to disk
/// and only then becomes visible, so the file and memory never disagree.
pub struct JournalRepository {
    path: PathBuf,
    journal: Mutex<Journal>,
}

impl JournalRepository {
    /// Open the journal at `path`. A missing file is an empty journal.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file exists but could not
    /// be read or parsed.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let journal: Journal = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .boxed()
                .context(StorageSnafu {
                    message: format!("Parsing {}", path.display()),
                })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Starting a new journal");
                Journal::default()
            }
            Err(err) => {
                return Err(err).boxed().context(StorageSnafu {
                    message: format!("Reading {}", path.display()),
                })
            }
        };

        Ok(Self {
            path,
            journal: Mutex::new(journal),
        })
    }

    /// Apply `change` to a copy of the journal and keep it once it is on
    /// disk.
    async fn commit<T, F>(&self, change: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Journal) -> Result<T, PersistenceError>,
    {
        let mut journal = self.journal.lock().await;
        let mut next = journal.clone();
        let res = change(&mut next)?;
        self.persist(&next).await?;
        *journal = next;
        Ok(res)
    }

    async fn persist(&self, journal: &Journal) -> Result<(), PersistenceError> {
        let content = serde_json::to_string_pretty(journal)
            .boxed()
            .context(StorageSnafu {
                message: "Serializing journal",
            })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .boxed()
                .context(StorageSnafu {
                    message: format!("Creating {}", parent.display()),
                })?;
        }

        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, content)
            .await
            .boxed()
            .context(StorageSnafu {
                message: format!("Writing {}", staging.display()),
            })?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .boxed()
            .context(StorageSnafu {
                message: format!("Replacing {}", self.path.display()),
            })
    }
}

#[async_trait::async_trait]
impl CycleRepository for JournalRepository {
    async fn create_cycle(&self, settings: &PomodoroSettings) -> Result<CycleId, PersistenceError> {
        let now = Utc::now();
        let id = CycleId::new(Uuid::new_v4().to_string());
        let record = CycleRecord {
            id: id.clone(),
            status: CycleStatus::InProgress,
            settings: SettingsRecord::from(settings),
            started_at: now,
            completed_at: None,
            updated_at: now,
        };
        self.commit(|journal| {
            journal.cycles.push(record);
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn create_session(
        &self,
        cycle_id: &CycleId,
        session_type: SessionType,
        duration_minutes: u32,
    ) -> Result<SessionId, PersistenceError> {
        let id = SessionId::new(Uuid::new_v4().to_string());
        let record = SessionRecord {
            id: id.clone(),
            cycle_id: cycle_id.clone(),
            session_type,
            started_at: Utc::now(),
            completed_at: None,
            duration_minutes,
            is_completed: false,
        };
        self.commit(|journal| {
            ensure!(
                journal.cycles.iter().any(|cycle| &cycle.id == cycle_id),
                NotFoundSnafu {
                    kind: "cycle",
                    id: cycle_id.to_string(),
                }
            );
            journal.sessions.push(record);
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn complete_session(
        &self,
        session_id: &SessionId,
        was_completed: bool,
    ) -> Result<(), PersistenceError> {
        self.commit(|journal| {
            let session = journal
                .sessions
                .iter_mut()
                .find(|session| &session.id == session_id)
                .context(NotFoundSnafu {
                    kind: "session",
                    id: session_id.to_string(),
                })?;
            if session.completed_at.is_none() {
                session.completed_at = Some(Utc::now());
                session.is_completed = was_completed;
            }
            Ok(())
        })
        .await
    }

    async fn update_cycle_status(
        &self,
        cycle_id: &CycleId,
        status: CycleStatus,
    ) -> Result<(), PersistenceError> {
        self.commit(|journal| {
            let cycle = journal
                .cycles
                .iter_mut()
                .find(|cycle| &cycle.id == cycle_id)
                .context(NotFoundSnafu {
                    kind: "cycle",
                    id: cycle_id.to_string(),
                })?;
            let now = Utc::now();
            cycle.status = status;
            cycle.updated_at = now;
            if status.is_finished() {
                cycle.completed_at = Some(now);
            }
            Ok(())
        })
        .await
    }

    async fn current_cycle(&self) -> Result<Option<Cycle>, PersistenceError> {
        let journal = self.journal.lock().await;
        journal
            .cycles
            .iter()
            .filter(|cycle| cycle.status == CycleStatus::InProgress)
            .max_by_key(|cycle| cycle.started_at)
            .map(Cycle::try_from)
            .transpose()
    }

    async fn focus_minutes_on(&self, date: NaiveDate) -> Result<u32, PersistenceError> {
        let journal = self.journal.lock().await;
        let minutes = journal
            .sessions
            .iter()
            .filter(|record| record.started_at.with_timezone(&Local).date_naive() == date)
            .map(|record| Session::from(record).focused_minutes())
            .fold(0, u32::saturating_add);
        Ok(minutes)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Journal {
    cycles: Vec<CycleRecord>,
    sessions: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CycleRecord {
    id: CycleId,
    status: CycleStatus,
    settings: SettingsRecord,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    id: SessionId,
    cycle_id: CycleId,
    session_type: SessionType,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    duration_minutes: u32,
    is_completed: bool,
}

/// Settings snapshot as stored in the journal, durations in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsRecord {
    focus_duration: u64,
    short_break_duration: u64,
    long_break_duration: u64,
    sessions_until_long_break: u32,
    auto_start_breaks: bool,
    auto_start_pomodoros: bool,
}

impl From<&PomodoroSettings> for SettingsRecord {
    fn from(value: &PomodoroSettings) -> Self {
        let millis = |duration: PhaseDuration| {
            u64::try_from(duration.get().as_millis()).unwrap_or(u64::MAX)
        };
        Self {
            focus_duration: millis(value.focus_duration),
            short_break_duration: millis(value.short_break_duration),
            long_break_duration: millis(value.long_break_duration),
            sessions_until_long_break: value.sessions_until_long_break.get(),
            auto_start_breaks: value.auto_start_breaks,
            auto_start_pomodoros: value.auto_start_pomodoros,
        }
    }
}

impl TryFrom<&SettingsRecord> for PomodoroSettings {
    type Error = PersistenceError;

    fn try_from(value: &SettingsRecord) -> Result<Self, Self::Error> {
        let duration = |millis| {
            PhaseDuration::try_from_millis(millis)
                .boxed()
                .context(StorageSnafu {
                    message: "Corrupted settings in journal",
                })
        };
        Ok(Self {
            focus_duration: duration(value.focus_duration)?,
            short_break_duration: duration(value.short_break_duration)?,
            long_break_duration: duration(value.long_break_duration)?,
            sessions_until_long_break: LongBreakInterval::try_new(
                value.sessions_until_long_break,
            )
            .boxed()
            .context(StorageSnafu {
                message: "Corrupted settings in journal",
            })?,
            auto_start_breaks: value.auto_start_breaks,
            auto_start_pomodoros: value.auto_start_pomodoros,
        })
    }
}

impl From<&SessionRecord> for Session {
    fn from(value: &SessionRecord) -> Self {
        Self {
            id: value.id.clone(),
            cycle_id: value.cycle_id.clone(),
            session_type: value.session_type,
            started_at: value.started_at,
            completed_at: value.completed_at,
            duration_minutes: value.duration_minutes,
            is_completed: value.is_completed,
        }
    }
}

impl TryFrom<&CycleRecord> for Cycle {
    type Error = PersistenceError;

    fn try_from(value: &CycleRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.clone(),
            status: value.status,
            settings: PomodoroSettings::try_from(&value.settings)?,
            started_at: value.started_at,
            completed_at: value.completed_at,
            updated_at: value.updated_at,
        })
    }
}
