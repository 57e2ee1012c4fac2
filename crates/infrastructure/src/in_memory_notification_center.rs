use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use grantdeck_application::{Notification, NotificationSeverity, Notifier};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct NotificationEntry {
    id: Uuid,
    notification: Notification,
    expires_at: Instant,
}

/// Notification still on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    /// Handle used to dismiss the notification.
    pub id: Uuid,
    /// Text shown to the operator.
    pub message: String,
    /// Severity controlling presentation.
    pub severity: NotificationSeverity,
    /// Time left before it expires.
    pub remaining: Duration,
}

/// Stack of notifications that expire independently.
///
/// Raising never blocks on I/O and never fails. Expired entries are
/// dropped whenever a notification is raised or read.
pub struct InMemoryNotificationCenter {
    entries: Mutex<Vec<NotificationEntry>>,
    ttl: Duration,
}

impl InMemoryNotificationCenter {
    /// Creates an empty center whose notifications live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            ttl,
        }
    }

    /// Notifications still visible now, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<ActiveNotification> {
        self.active_at(Instant::now())
    }

    /// Notifications visible at `now`, oldest first. Expired ones are dropped.
    #[must_use]
    pub fn active_at(&self, now: Instant) -> Vec<ActiveNotification> {
        let mut entries = self.entries();
        entries.retain(|entry| entry.expires_at > now);
        entries
            .iter()
            .map(|entry| ActiveNotification {
                id: entry.id,
                message: entry.notification.message.clone(),
                severity: entry.notification.severity,
                remaining: entry.expires_at.saturating_duration_since(now),
            })
            .collect()
    }

    /// Dismisses one notification; returns whether it was still visible.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    fn push_at(&self, notification: Notification, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        let mut entries = self.entries();
        entries.retain(|entry| entry.expires_at > now);
        entries.push(NotificationEntry {
            id,
            notification,
            expires_at,
        });
        id
    }

    fn entries(&self) -> MutexGuard<'_, Vec<NotificationEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for InMemoryNotificationCenter {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            severity = notification.severity.as_str(),
            message = %notification.message,
            "notification raised"
        );
        self.push_at(notification, Instant::now());
    }
}
