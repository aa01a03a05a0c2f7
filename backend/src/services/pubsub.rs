//! In-memory pub/sub for the live feeds
//!
//! Two typed topics, `newLink` and `newVote`, each backed by a broadcast
//! channel. Publishing without subscribers is fine; subscribers that fall
//! behind by more than the channel capacity skip the missed events.

use futures::Stream;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::db::{LinkRecord, VoteRecord};

/// A named broadcast channel carrying one payload type
pub struct Topic<T> {
    name: &'static str,
    sender: broadcast::Sender<T>,
}

impl<T> Topic<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { name, sender }
    }

    /// Publish an event, returning how many subscribers received it
    pub fn publish(&self, payload: T) -> usize {
        let delivered = self.sender.send(payload).unwrap_or(0);
        tracing::debug!(topic = self.name, subscribers = delivered, "Published event");
        delivered
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Stream of every event published after this call
    pub fn subscribe(&self) -> impl Stream<Item = T> + Send + 'static {
        let name = self.name;
        BroadcastStream::new(self.sender.subscribe()).filter_map(move |result| match result {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(topic = name, error = %e, "Subscriber lagged, events dropped");
                None
            }
        })
    }
}

/// Channel registry shared by resolvers through the schema data
pub struct PubSub {
    pub new_link: Topic<LinkRecord>,
    pub new_vote: Topic<VoteRecord>,
}

impl PubSub {
    pub fn new(capacity: usize) -> Self {
        Self {
            new_link: Topic::new("newLink", capacity),
            new_vote: Topic::new("newVote", capacity),
        }
    }
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn link(id: i64) -> LinkRecord {
        LinkRecord {
            id,
            created_at: Utc::now(),
            description: format!("link {}", id),
            url: format!("https://example.com/{}", id),
            posted_by_id: None,
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let pubsub = PubSub::default();
        assert_eq!(pubsub.new_link.publish(link(1)), 0);
        assert_eq!(pubsub.new_vote.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_fan_out_to_every_subscriber() {
        let pubsub = PubSub::default();
        let mut first = Box::pin(pubsub.new_link.subscribe());
        let mut second = Box::pin(pubsub.new_link.subscribe());
        assert_eq!(pubsub.new_link.receiver_count(), 2);

        assert_eq!(pubsub.new_link.publish(link(1)), 2);

        assert_eq!(first.next().await.map(|l| l.id), Some(1));
        assert_eq!(second.next().await.map(|l| l.id), Some(1));
    }

    #[tokio::test]
    async fn test_topics_are_independent() {
        let pubsub = PubSub::default();
        let mut votes = Box::pin(pubsub.new_vote.subscribe());

        pubsub.new_link.publish(link(1));
        pubsub.new_vote.publish(VoteRecord {
            id: 5,
            link_id: 1,
            user_id: 2,
        });

        assert_eq!(votes.next().await.map(|v| v.id), Some(5));
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_missed_events() {
        let pubsub = PubSub::new(2);
        let mut stream = Box::pin(pubsub.new_link.subscribe());

        for id in 1..=4 {
            pubsub.new_link.publish(link(id));
        }

        assert_eq!(stream.next().await.map(|l| l.id), Some(3));
        assert_eq!(stream.next().await.map(|l| l.id), Some(4));
    }
}
