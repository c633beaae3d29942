mod journal;
mod notification;
mod settings;

pub use journal::JournalRepository;
pub use notification::NotificationConfiguration;
pub use settings::SettingsConfiguration;
