pub mod duration;
pub mod notification;
pub mod phase;
pub mod record;
pub mod settings;

pub use duration::PhaseDuration;
pub use notification::{Failure, Notice, NotificationMessage};
pub use phase::{Phase, SessionType};
pub use record::{Cycle, CycleId, CycleStatus, Session, SessionId};
pub use settings::{LongBreakInterval, PomodoroSettings, SettingsPatch};
