// ── Transient notifications ──
//
// Controllers emit notifications as data; the presentation layer decides
// how and for how long to show them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use strum::Display;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }
}

/// Handle to a notification that is still on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

type Visible = Vec<(NotificationId, Notification)>;

/// Queue of visible notifications, observable through a watch channel.
#[derive(Debug, Clone)]
pub struct Notifications {
    next_id: Arc<AtomicU64>,
    visible: Arc<watch::Sender<Visible>>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifications {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            next_id: Arc::new(AtomicU64::new(0)),
            visible: Arc::new(tx),
        }
    }

    pub fn push(&self, notification: Notification) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.visible.send_modify(|v| v.push((id, notification)));
        id
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.visible.send_if_modified(|v| {
            let before = v.len();
            v.retain(|(nid, _)| *nid != id);
            v.len() != before
        })
    }

    /// Take every visible notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        let mut drained = Vec::new();
        self.visible.send_if_modified(|v| {
            drained = v.drain(..).map(|(_, n)| n).collect();
            !drained.is_empty()
        });
        drained
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.visible
            .borrow()
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<(NotificationId, Notification)>> {
        self.visible.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_dismiss_drain() {
        let center = Notifications::new();
        let first = center.push(Notification::success("Product added successfully!"));
        center.push(Notification::error("Something went wrong!"));
        assert_eq!(center.visible().len(), 2);

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));

        let rest = center.drain();
        assert_eq!(rest, vec![Notification::error("Something went wrong!")]);
        assert!(center.visible().is_empty());
    }
}
