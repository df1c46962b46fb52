use crate::domain::notification::{FailureNotification, SuccessNotification};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynNotificationDispatcher = Arc<dyn NotificationDispatcherTrait + Send + Sync>;

/// Outcome delivery to the user and the operator. Strictly best-effort:
/// implementations log delivery problems and never return an error, so a
/// broken notification channel can never block settlement processing.
#[async_trait]
pub trait NotificationDispatcherTrait {
    async fn notify_success(&self, notification: &SuccessNotification);

    async fn notify_failure(&self, notification: &FailureNotification);
}
