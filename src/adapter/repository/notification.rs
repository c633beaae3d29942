use std::sync::Arc;

use snafu::prelude::*;

use crate::adapter::config::{Configuration, MessageContent};
use crate::domain::entity::{Notice, NotificationMessage};
use crate::domain::repository::notification::{GetNotificationError, InvalidSnafu};
use crate::domain::repository::NotificationRepository;

/// A [`NotificationRepository`] implementation which reads configuration files.
pub struct NotificationConfiguration {
    config: Arc<Configuration>,
}

impl NotificationConfiguration {
    /// Creates a new [`NotificationConfiguration`].
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    fn section(&self, notice: Notice) -> &MessageContent {
        let notification = &self.config.notification;
        match notice {
            Notice::FocusEnded => &notification.focus,
            Notice::ShortBreakEnded => &notification.short_break,
            Notice::CycleCompleted => &notification.cycle,
        }
    }
}

#[async_trait::async_trait]
impl NotificationRepository for NotificationConfiguration {
    async fn notification(
        &self,
        notice: Notice,
    ) -> Result<NotificationMessage, GetNotificationError> {
        let MessageContent { summary, body } = self.section(notice).clone();
        NotificationMessage::try_new(summary, body).context(InvalidSnafu)
    }
}
