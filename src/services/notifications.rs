//! Console notifications addressed to users

use crate::models::{report::Notification, user::User};

#[derive(Clone, Default)]
pub struct NotificationService;

impl NotificationService {
    pub fn new() -> Self {
        Self
    }

    /// Build a notification for `user`. Delivery is the caller printing it.
    pub fn notify(&self, user: &User, message: &str) -> Notification {
        tracing::info!(recipient = %user.username, "Notification sent");
        Notification {
            recipient: user.username.clone(),
            message: message.to_string(),
        }
    }
}
