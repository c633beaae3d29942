use std::sync::Arc;

use snafu::prelude::*;

use crate::adapter::config::Configuration;
use crate::domain::entity::{LongBreakInterval, PhaseDuration, PomodoroSettings};
use crate::domain::repository::settings::{
    GetSettingsError, InvalidDurationSnafu, InvalidIntervalSnafu,
};
use crate::domain::repository::SettingsRepository;

/// A [`SettingsRepository`] implementation which reads configuration files.
pub struct SettingsConfiguration {
    config: Arc<Configuration>,
}

impl SettingsConfiguration {
    /// Creates a new [`SettingsConfiguration`].
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl SettingsRepository for SettingsConfiguration {
    async fn settings(&self) -> Result<PomodoroSettings, GetSettingsError> {
        let timer = &self.config.timer;
        let duration = |key: &str, seconds: u64| {
            PhaseDuration::try_from_secs(seconds).context(InvalidDurationSnafu { key })
        };

        Ok(PomodoroSettings {
            focus_duration: duration("timer.focus", timer.focus)?,
            short_break_duration: duration("timer.short_break", timer.short_break)?,
            long_break_duration: duration("timer.long_break", timer.long_break)?,
            sessions_until_long_break: LongBreakInterval::try_new(
                timer.sessions_until_long_break,
            )
            .context(InvalidIntervalSnafu)?,
            auto_start_breaks: timer.auto_start_breaks,
            auto_start_pomodoros: timer.auto_start_pomodoros,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::adapter::config::default_configuration;

    #[tokio::test]
    async fn settings_from_default_configuration() {
        let repository = SettingsConfiguration::new(Arc::new(default_configuration()));
        let settings = repository.settings().await.unwrap();
        assert_eq!(settings, PomodoroSettings::default());
        assert_eq!(settings.focus_duration.get(), Duration::from_secs(1500));
    }

    #[tokio::test]
    async fn settings_reject_zero_duration() {
        let mut config = default_configuration();
        config.timer.short_break = 0;
        let repository = SettingsConfiguration::new(Arc::new(config));
        assert!(matches!(
            repository.settings().await,
            Err(GetSettingsError::InvalidDuration { key, .. }) if key == "timer.short_break"
        ));
    }

    #[tokio::test]
    async fn settings_reject_zero_interval() {
        let mut config = default_configuration();
        config.timer.sessions_until_long_break = 0;
        let repository = SettingsConfiguration::new(Arc::new(config));
        assert!(matches!(
            repository.settings().await,
            Err(GetSettingsError::InvalidInterval { .. })
        ));
    }
}
