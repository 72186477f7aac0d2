//! In-process topic map for relay delivery.
//!
//! One topic per user; every open session for that user holds a subscriber
//! and receives every frame published to the topic, so multiple devices all
//! see the same traffic.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};
use uuid::Uuid;

/// Unique id per subscription; allows precise cleanup when a session closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

struct Subscriber {
    id: SubscriberId,
    sender: UnboundedSender<String>,
}

#[derive(Default, Clone)]
pub struct SessionRegistry {
    // user_id -> sessions subscribed to that user's topic
    inner: Arc<RwLock<HashMap<Uuid, Vec<Subscriber>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, user_id: Uuid) -> (SubscriberId, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        let subscriber_id = SubscriberId::new();

        let mut guard = self.inner.write().await;
        guard.entry(user_id).or_default().push(Subscriber {
            id: subscriber_id,
            sender: tx,
        });

        tracing::debug!(
            %user_id,
            subscribers = guard.get(&user_id).map(|v| v.len()).unwrap_or(0),
            "Registry subscribe"
        );

        (subscriber_id, rx)
    }

    /// Must be called when a session closes, or its sender leaks until the
    /// next publish prunes it.
    pub async fn unsubscribe(&self, user_id: Uuid, subscriber_id: SubscriberId) {
        let mut guard = self.inner.write().await;

        if let Some(subscribers) = guard.get_mut(&user_id) {
            subscribers.retain(|s| s.id != subscriber_id);
            if subscribers.is_empty() {
                guard.remove(&user_id);
            }
        }
    }

    /// Send a frame to every live session on the user's topic. Dead senders
    /// are pruned as a side effect.
    pub async fn publish(&self, user_id: Uuid, frame: &str) {
        let mut guard = self.inner.write().await;

        if let Some(subscribers) = guard.get_mut(&user_id) {
            subscribers.retain(|s| s.sender.send(frame.to_string()).is_ok());
            if subscribers.is_empty() {
                guard.remove(&user_id);
            }
        }
    }

    pub async fn subscriber_count(&self, user_id: Uuid) -> usize {
        self.inner
            .read()
            .await
            .get(&user_id)
            .map(|v| v.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let registry = SessionRegistry::new();
        let user = Uuid::new_v4();

        let (_id1, mut rx1) = registry.subscribe(user).await;
        let (_id2, mut rx2) = registry.subscribe(user).await;

        registry.publish(user, "hello").await;

        assert_eq!(rx1.recv().await.unwrap(), "hello");
        assert_eq!(rx2.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_publish_to_other_topic_is_not_delivered() {
        let registry = SessionRegistry::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        let (_id, mut rx) = registry.subscribe(user).await;
        registry.publish(other, "hello").await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsubscribe_removes_only_that_session() {
        let registry = SessionRegistry::new();
        let user = Uuid::new_v4();

        let (id1, _rx1) = registry.subscribe(user).await;
        let (_id2, _rx2) = registry.subscribe(user).await;
        assert_eq!(registry.subscriber_count(user).await, 2);

        registry.unsubscribe(user, id1).await;
        assert_eq!(registry.subscriber_count(user).await, 1);
    }

    #[tokio::test]
    async fn test_dead_subscribers_are_pruned_on_publish() {
        let registry = SessionRegistry::new();
        let user = Uuid::new_v4();

        let (_id, rx) = registry.subscribe(user).await;
        drop(rx);

        registry.publish(user, "hello").await;
        assert_eq!(registry.subscriber_count(user).await, 0);
    }
}
