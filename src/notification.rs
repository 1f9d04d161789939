//! Transient success/failure toasts.

use std::time::{Duration, Instant};

use log::{info, warn};

pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: Option<String>,
    pub shown_at: Instant,
}

#[derive(Debug, Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(str::to_string)
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_success(&mut self, title: Option<&str>, message: Option<&str>) {
        info!("notify ok: {}", message.unwrap_or_default());
        self.push(NotificationKind::Success, title, message);
    }

    pub fn show_fail(&mut self, title: Option<&str>, message: Option<&str>) {
        warn!("notify fail: {}", message.unwrap_or_default());
        self.push(NotificationKind::Failure, title, message);
    }

    fn push(&mut self, kind: NotificationKind, title: Option<&str>, message: Option<&str>) {
        self.items.push(Notification {
            kind,
            title: non_empty(title),
            message: non_empty(message),
            shown_at: Instant::now(),
        });
    }

    /// Drops toasts older than [`TOAST_LIFETIME`].
    pub fn prune(&mut self, now: Instant) {
        self.items
            .retain(|n| now.saturating_duration_since(n.shown_at) < TOAST_LIFETIME);
    }

    pub fn dismiss(&mut self, position: usize) {
        if position < self.items.len() {
            self.items.remove(position);
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }
}
