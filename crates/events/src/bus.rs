//! Per-conversation push bus backed by `tokio::sync::broadcast` channels.
//!
//! [`ConversationBus`] is the delivery half of the message channel: when a
//! message is appended, it is published to every live viewer of that
//! conversation. The contract is at-least-once with per-conversation
//! ordering — a subscriber that lags past the channel buffer observes
//! `RecvError::Lagged` and is expected to re-fetch the history, and clients
//! append idempotently by message id. There is no cross-conversation
//! ordering and no replay for disconnected viewers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

use annunci_core::types::DbId;
use annunci_db::models::message::Message;

/// Buffer capacity for each conversation's broadcast channel. Viewers that
/// fall further behind than this re-fetch instead of replaying.
const CHANNEL_CAPACITY: usize = 64;

/// A new-message push delivered to live viewers of one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePush {
    pub conversation_id: DbId,
    pub message: Message,
}

/// Per-conversation fan-out hub.
///
/// Designed to be shared via `Arc<ConversationBus>` across the application.
/// Channels are created lazily on first subscribe or publish and pruned once
/// their last receiver is gone.
pub struct ConversationBus {
    channels: RwLock<HashMap<DbId, broadcast::Sender<MessagePush>>>,
}

impl ConversationBus {
    /// Create a new, empty bus.
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to pushes for one conversation.
    pub async fn subscribe(&self, conversation_id: DbId) -> broadcast::Receiver<MessagePush> {
        let mut channels = self.channels.write().await;
        channels
            .entry(conversation_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish a push to every live viewer of the conversation.
    ///
    /// Returns the number of receivers the push reached. A publish with no
    /// viewers is silently dropped — disconnected participants pick the
    /// message up from their next list or history query.
    pub async fn publish(&self, push: MessagePush) -> usize {
        let conversation_id = push.conversation_id;

        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&conversation_id) {
                if sender.receiver_count() > 0 {
                    return sender.send(push).unwrap_or(0);
                }
            } else {
                return 0;
            }
        }

        // The channel exists but its last receiver is gone: prune it.
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(&conversation_id) {
            if sender.receiver_count() == 0 {
                channels.remove(&conversation_id);
                tracing::trace!(conversation_id, "Pruned idle conversation channel");
            }
        }
        0
    }

    /// Number of conversations with at least one channel allocated.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Default for ConversationBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn push(conversation_id: DbId, id: DbId, body: &str) -> MessagePush {
        let now = Utc::now();
        MessagePush {
            conversation_id,
            message: Message {
                id,
                conversation_id,
                sender_id: 1,
                body: body.to_string(),
                is_read: false,
                read_at: None,
                created_at: now,
                expires_at: now + chrono::Duration::days(30),
            },
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_message() {
        let bus = ConversationBus::new();
        let mut rx = bus.subscribe(10).await;

        let reached = bus.publish(push(10, 1, "interested")).await;
        assert_eq!(reached, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.message.id, 1);
        assert_eq!(received.message.body, "interested");
    }

    #[tokio::test]
    async fn test_pushes_are_ordered_per_conversation() {
        let bus = ConversationBus::new();
        let mut rx = bus.subscribe(10).await;

        bus.publish(push(10, 1, "first")).await;
        bus.publish(push(10, 2, "second")).await;
        bus.publish(push(10, 3, "third")).await;

        assert_eq!(rx.recv().await.unwrap().message.id, 1);
        assert_eq!(rx.recv().await.unwrap().message.id, 2);
        assert_eq!(rx.recv().await.unwrap().message.id, 3);
    }

    #[tokio::test]
    async fn test_conversations_are_isolated() {
        let bus = ConversationBus::new();
        let mut rx_a = bus.subscribe(10).await;
        let mut rx_b = bus.subscribe(20).await;

        bus.publish(push(10, 1, "for a")).await;

        assert_eq!(rx_a.recv().await.unwrap().conversation_id, 10);
        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_publish_without_viewers_is_dropped() {
        let bus = ConversationBus::new();
        let reached = bus.publish(push(10, 1, "nobody home")).await;
        assert_eq!(reached, 0);
    }

    #[tokio::test]
    async fn test_both_participants_receive_the_push() {
        let bus = ConversationBus::new();
        let mut rx_buyer = bus.subscribe(10).await;
        let mut rx_seller = bus.subscribe(10).await;

        let reached = bus.publish(push(10, 1, "hello")).await;
        assert_eq!(reached, 2);
        assert_eq!(rx_buyer.recv().await.unwrap().message.id, 1);
        assert_eq!(rx_seller.recv().await.unwrap().message.id, 1);
    }

    #[tokio::test]
    async fn test_idle_channel_is_pruned() {
        let bus = ConversationBus::new();
        {
            let _rx = bus.subscribe(10).await;
            assert_eq!(bus.channel_count().await, 1);
        }
        // Receiver dropped: the next publish prunes the channel.
        bus.publish(push(10, 1, "gone")).await;
        assert_eq!(bus.channel_count().await, 0);
    }
}
