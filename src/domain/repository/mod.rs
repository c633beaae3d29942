pub mod cycle;
pub mod notification;
pub mod settings;

pub use cycle::{CycleRepository, PersistenceError};
pub use notification::{GetNotificationError, NotificationRepository};
pub use settings::{GetSettingsError, SettingsRepository};
