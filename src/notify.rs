// src/notify.rs

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Oldest entries are dropped beyond this many.
pub const NOTIFICATION_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// A transient message for the person using the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Bounded queue of pending notifications, drained by the UI.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: Mutex<VecDeque<Notification>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, level: Level, message: impl Into<String>) {
        let notification = Notification {
            level,
            message: message.into(),
            created_at: Utc::now(),
        };
        let mut queue = self.queue.lock().await;
        if queue.len() == NOTIFICATION_CAPACITY {
            queue.pop_front();
        }
        queue.push_back(notification);
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.push(Level::Info, message).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.push(Level::Error, message).await;
    }

    /// Removes and returns everything queued, oldest first.
    pub async fn drain(&self) -> Vec<Notification> {
        self.queue.lock().await.drain(..).collect()
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_empties_the_queue() {
        let notifications = Notifications::new();
        notifications.info("Deleted").await;
        notifications.error("Failed").await;

        let drained = notifications.drain().await;
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, Level::Info);
        assert_eq!(drained[1].message, "Failed");
        assert!(notifications.is_empty().await);
    }

    #[tokio::test]
    async fn keeps_only_the_newest_entries() {
        let notifications = Notifications::new();
        for i in 0..NOTIFICATION_CAPACITY + 5 {
            notifications.info(format!("n{}", i)).await;
        }
        let drained = notifications.drain().await;
        assert_eq!(drained.len(), NOTIFICATION_CAPACITY);
        assert_eq!(drained[0].message, "n5");
    }
}
