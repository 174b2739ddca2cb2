//! Live notification hub
//!
//! Connected clients subscribe to their own user topic and receive every
//! notification created for them as a JSON frame. One broadcast channel
//! exists per topic; publishing to a topic with no subscribers is a no-op.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use crate::models::notification::Notification;

const CHANNEL_CAPACITY: usize = 256;

type ChannelsMap = Arc<RwLock<HashMap<String, broadcast::Sender<Notification>>>>;

/// Topic name for one user's notification stream
pub fn user_topic(user_id: i64) -> String {
    format!("user:{}", user_id)
}

#[derive(Clone, Default)]
pub struct NotificationHub {
    channels: ChannelsMap,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Publish a notification to its user's topic
    pub async fn publish(&self, notification: Notification) {
        let topic = user_topic(notification.user_id);
        let channels = self.channels.read().await;

        if let Some(sender) = channels.get(&topic) {
            // Receivers may have dropped between lookup and send
            let _ = sender.send(notification);
        }
    }

    /// Subscribe to a user's notification topic
    pub async fn subscribe(&self, user_id: i64) -> broadcast::Receiver<Notification> {
        let topic = user_topic(user_id);
        let mut channels = self.channels.write().await;

        let sender = channels
            .entry(topic)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);

        sender.subscribe()
    }

    /// Drop topics without any live subscriber
    pub async fn prune(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Count of active topics
    pub async fn topic_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_notification(user_id: i64) -> Notification {
        Notification {
            id: 1,
            user_id,
            title: "Registration confirmed".to_string(),
            message: "See you there".to_string(),
            kind: "registration_confirmed".to_string(),
            event_id: Some(5),
            is_read: false,
            is_dismissed: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_notification() {
        let hub = NotificationHub::new();
        let mut rx = hub.subscribe(7).await;

        hub.publish(sample_notification(7)).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.user_id, 7);
        assert_eq!(received.title, "Registration confirmed");
    }

    #[tokio::test]
    async fn test_other_users_do_not_receive() {
        let hub = NotificationHub::new();
        let mut rx = hub.subscribe(7).await;

        hub.publish(sample_notification(8)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let hub = NotificationHub::new();
        hub.publish(sample_notification(9)).await;
        assert_eq!(hub.topic_count().await, 0);
    }

    #[tokio::test]
    async fn test_prune_removes_dead_topics() {
        let hub = NotificationHub::new();
        {
            let _rx = hub.subscribe(7).await;
            assert_eq!(hub.topic_count().await, 1);
        }
        hub.prune().await;
        assert_eq!(hub.topic_count().await, 0);
    }
}
