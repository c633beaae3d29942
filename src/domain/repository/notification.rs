use std::error::Error as StdError;

use snafu::prelude::*;

use crate::domain::entity::notification::{
    Notice, NotificationMessage, TryNewNotificationMessageError,
};

/// An abstract interface for accessing the messages shown for each
/// [`Notice`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NotificationRepository: Send + Sync + 'static {
    /// Get the message for a notice.
    ///
    /// # Errors
    ///
    /// This function will return an error if the message is invalid.
    async fn notification(&self, notice: Notice)
        -> Result<NotificationMessage, GetNotificationError>;
}

/// An error type of accessing the repository of [`NotificationMessage`]s.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum GetNotificationError {
    #[snafu(display("Could not create an invalid message"))]
    #[non_exhaustive]
    Invalid {
        source: TryNewNotificationMessageError,
    },
    #[snafu(whatever, display("Load notification failed: {message}"))]
    #[non_exhaustive]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError + Send + Sync>, Some)))]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}
