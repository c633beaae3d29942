use std::error::Error as StdError;

use snafu::prelude::*;

use crate::domain::entity::notification::NotificationMessage;

/// Outbound port through which the worker reaches the user: phase and cycle
/// milestones as well as persistence failures.
#[async_trait::async_trait]
pub trait NotifyPort: Send + Sync + 'static {
    /// Deliver a message to the user. Adapters implement
    /// [`NotifyPort::notify_impl`] instead.
    ///
    /// # Errors
    ///
    /// This function will return an error if the message could not be shown.
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        self.notify_impl(message.into()).await
    }

    /// Show one owned request.
    ///
    /// # Errors
    ///
    /// This function will return an error if the message could not be shown.
    async fn notify_impl(&self, request: NotifyRequest) -> Result<(), NotifyError>;
}

/// Owned copy of a [`NotificationMessage`] handed to adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyRequest {
    pub summary: String,
    pub body: Option<String>,
}

impl From<&NotificationMessage> for NotifyRequest {
    fn from(value: &NotificationMessage) -> Self {
        Self {
            summary: value.summary().to_owned(),
            body: value.body().map(ToOwned::to_owned),
        }
    }
}

/// An error type of delivering a notification.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum NotifyError {
    #[snafu(whatever, display("Could not emit a notification: {message}"))]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError + Send + Sync>, Some)))]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::domain::entity::Failure;

    #[derive(Default)]
    struct LastRequest(Mutex<Option<NotifyRequest>>);

    #[async_trait::async_trait]
    impl NotifyPort for LastRequest {
        async fn notify_impl(&self, request: NotifyRequest) -> Result<(), NotifyError> {
            *self.0.lock().unwrap() = Some(request);
            Ok(())
        }
    }

    #[tokio::test]
    async fn notify_forwards_message() {
        let port = LastRequest::default();
        let message =
            NotificationMessage::try_new("Break over".to_owned(), Some("Focus".to_owned()))
                .unwrap();
        port.notify(&message).await.unwrap();
        assert_eq!(
            port.0.lock().unwrap().take(),
            Some(NotifyRequest {
                summary: "Break over".to_owned(),
                body: Some("Focus".to_owned()),
            })
        );

        port.notify(&Failure::StartSession.into()).await.unwrap();
        let request = port.0.lock().unwrap().take().unwrap();
        assert_eq!(request.summary, "Failed to start session. Timer stopped.");
        assert_eq!(request.body, None);
    }
}
