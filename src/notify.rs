// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Transient user notifications.
//!
//! One `Notifier` lives in `AppState`. Handlers publish short human-readable
//! messages; each dashboard tab holds a `Subscription` (via the SSE endpoint)
//! and only sees messages for its own account or broadcast ones. Dropping the
//! subscription unsubscribes.

use crate::session::ClientId;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A message shown briefly in the dashboard.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// RFC 3339 timestamp
    pub at: String,
    /// Target account; `None` reaches every subscriber.
    #[serde(skip)]
    pub audience: Option<String>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now().to_rfc3339(),
            audience: None,
        }
    }

    pub fn for_account(mut self, client_id: &ClientId) -> Self {
        self.audience = Some(client_id.as_str().to_string());
        self
    }
}

/// Publish/subscribe hub for notifications.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to current subscribers. Returns how many received it.
    pub fn publish(&self, notification: Notification) -> usize {
        // No subscribers is not an error; the message is simply dropped.
        self.sender.send(notification).unwrap_or(0)
    }

    /// Subscribe on behalf of one account.
    pub fn subscribe(&self, client_id: &ClientId) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            client_id: client_id.as_str().to_string(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A live subscription. Drop to unsubscribe.
pub struct Subscription {
    receiver: broadcast::Receiver<Notification>,
    client_id: String,
}

impl Subscription {
    /// Next notification addressed to this subscriber, or `None` once the
    /// notifier is gone.
    pub async fn next(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) => {
                    let visible = notification
                        .audience
                        .as_deref()
                        .map_or(true, |audience| audience == self.client_id);
                    if visible {
                        return Some(notification);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str) -> ClientId {
        ClientId::new(id)
    }

    #[tokio::test]
    async fn test_subscribers_receive_own_and_broadcast_messages() {
        let notifier = Notifier::default();
        let alice = client("1");
        let mut sub = notifier.subscribe(&alice);

        notifier.publish(Notification::new(NotificationLevel::Info, "other").for_account(&client("2")));
        notifier.publish(Notification::new(NotificationLevel::Error, "mine").for_account(&alice));
        notifier.publish(Notification::new(NotificationLevel::Info, "everyone"));

        assert_eq!(sub.next().await.unwrap().message, "mine");
        assert_eq!(sub.next().await.unwrap().message, "everyone");
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let notifier = Notifier::default();
        let sub = notifier.subscribe(&client("1"));
        assert_eq!(notifier.subscriber_count(), 1);

        drop(sub);
        assert_eq!(notifier.subscriber_count(), 0);
        assert_eq!(
            notifier.publish(Notification::new(NotificationLevel::Info, "nobody")),
            0
        );
    }

    #[tokio::test]
    async fn test_closed_notifier_ends_subscription() {
        let notifier = Notifier::default();
        let mut sub = notifier.subscribe(&client("1"));
        drop(notifier);
        assert!(sub.next().await.is_none());
    }
}
