use std::sync::Arc;

use grantdeck_application::{Notification, Notifier};
use grantdeck_infrastructure::InMemoryNotificationCenter;

/// Prints notifications to stderr as they are raised and keeps them in a
/// notification center until they expire.
pub struct ConsoleNotifier {
    center: Arc<InMemoryNotificationCenter>,
}

impl ConsoleNotifier {
    pub fn new(center: Arc<InMemoryNotificationCenter>) -> Self {
        Self { center }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("[{}] {}", notification.severity.as_str(), notification.message);
        self.center.notify(notification);
    }
}
