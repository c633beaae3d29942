use std::path::PathBuf;

use serde::Deserialize;

/// Parsed content of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    pub timer: TimerContent,
    pub notification: NotificationContent,
    #[serde(default)]
    pub storage: StorageContent,
}

/// Phase durations in seconds and the cadence of long breaks.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerContent {
    pub focus: u64,
    pub short_break: u64,
    pub long_break: u64,
    pub sessions_until_long_break: u32,
    #[serde(default = "enabled")]
    pub auto_start_breaks: bool,
    #[serde(default = "enabled")]
    pub auto_start_pomodoros: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationContent {
    pub focus: MessageContent,
    pub short_break: MessageContent,
    pub cycle: MessageContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageContent {
    pub summary: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageContent {
    pub journal: Option<PathBuf>,
}

fn enabled() -> bool {
    true
}
