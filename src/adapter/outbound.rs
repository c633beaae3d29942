use notify_rust::Notification;
use snafu::prelude::*;

use crate::domain::pomodoro::outbound::{NotifyError, NotifyPort, NotifyRequest};

/// Shows timer milestones and failures as desktop notifications under the
/// application's name.
#[derive(Debug, Clone)]
pub struct NotifyService {
    app_name: String,
}

impl NotifyService {
    pub fn new(app_name: String) -> Self {
        Self { app_name }
    }

    fn build(&self, request: &NotifyRequest) -> Notification {
        let mut notification = Notification::new();
        notification.appname(&self.app_name).summary(&request.summary);
        if let Some(body) = &request.body {
            notification.body(body);
        }
        notification
    }
}

#[async_trait::async_trait]
impl NotifyPort for NotifyService {
    async fn notify_impl(&self, request: NotifyRequest) -> Result<(), NotifyError> {
        tracing::debug!(summary = %request.summary, "Showing notification");
        let _ = whatever!(
            self.build(&request).show_async().await,
            "Could not show notification {:?}",
            request.summary
        );
        Ok(())
    }
}
