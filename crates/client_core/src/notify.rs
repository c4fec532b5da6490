//! Transient user-facing messages: the surface trait plus an in-memory
//! stacking implementation with per-notification dismissal.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Message severity, mirrored in how a front-end styles the toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Surface for transient messages. Implementations must stack concurrent
/// notifications rather than overwrite them.
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    async fn notify(&self, message: &str, severity: Severity);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub Uuid);

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone)]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissed(NotificationId),
}

struct CenterInner {
    auto_dismiss_after: Duration,
    active: Mutex<Vec<Notification>>,
    events: broadcast::Sender<NotificationEvent>,
}

/// In-memory notification stack. Every notification auto-dismisses after a
/// fixed duration and can be dismissed individually before that.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

impl NotificationCenter {
    pub const DEFAULT_AUTO_DISMISS: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self::with_auto_dismiss(Self::DEFAULT_AUTO_DISMISS)
    }

    pub fn with_auto_dismiss(auto_dismiss_after: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(CenterInner {
                auto_dismiss_after,
                active: Mutex::new(Vec::new()),
                events,
            }),
        }
    }

    pub async fn show(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let notification = Notification {
            id: NotificationId(Uuid::new_v4()),
            message: message.into(),
            severity,
        };
        let id = notification.id;

        self.inner.active.lock().await.push(notification.clone());
        let _ = self
            .inner
            .events
            .send(NotificationEvent::Shown(notification));

        let center = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(center.inner.auto_dismiss_after).await;
            center.dismiss(id).await;
        });

        id
    }

    /// Remove one notification from the stack. Returns false when it was
    /// already gone (auto-dismiss and manual dismissal can race benignly).
    pub async fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut active = self.inner.active.lock().await;
            let before = active.len();
            active.retain(|notification| notification.id != id);
            active.len() != before
        };
        if removed {
            debug!(notification_id = %id.0, "notification dismissed");
            let _ = self.inner.events.send(NotificationEvent::Dismissed(id));
        }
        removed
    }

    pub async fn active(&self) -> Vec<Notification> {
        self.inner.active.lock().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.events.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSurface for NotificationCenter {
    async fn notify(&self, message: &str, severity: Severity) {
        let _ = self.show(message, severity).await;
    }
}

#[cfg(test)]
#[path = "tests/notify_tests.rs"]
mod tests;
