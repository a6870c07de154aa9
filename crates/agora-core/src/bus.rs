//! Named publish/subscribe channel bus.
//!
//! One `ChannelBus` is constructed at startup and shared by handle. Each
//! channel owns a subscriber set keyed by [`ConnectionId`]; every subscriber
//! holds the receiving half of an unbounded mpsc queue and the bus holds the
//! sender. `publish` fans a line out to every connection subscribed at call
//! time; connections subscribing afterwards see nothing (no replay, no
//! buffering for late subscribers).
//!
//! Delivery failures are isolated per subscriber: a receiver that has been
//! dropped is removed from the set without affecting the other deliveries.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use agora_types::participant::ConnectionId;

/// Multi-channel publish/subscribe bus.
///
/// All operations are safe under concurrent invocation from arbitrary tasks;
/// subscriber-set mutations are serialized per shard by the underlying map.
pub struct ChannelBus {
    channels: DashMap<String, ChannelTopic>,
}

struct ChannelTopic {
    subscribers: DashMap<ConnectionId, mpsc::UnboundedSender<Arc<str>>>,
}

impl ChannelTopic {
    fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }
}

/// A live subscription to one channel.
///
/// Dropping the subscription ends delivery; the bus notices the dead queue on
/// the next publish and removes the entry.
pub struct Subscription {
    channel: String,
    connection_id: ConnectionId,
    receiver: mpsc::UnboundedReceiver<Arc<str>>,
}

impl Subscription {
    /// Receive the next published line, or `None` once the bus has dropped
    /// this subscriber.
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.receiver.recv().await
    }

    /// Non-blocking receive; `None` when nothing is pending.
    pub fn try_recv(&mut self) -> Option<Arc<str>> {
        self.receiver.try_recv().ok()
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }
}

impl ChannelBus {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe a connection to a channel.
    ///
    /// Subscribing the same connection twice replaces the previous queue;
    /// the old receiver sees end-of-stream.
    pub fn subscribe(&self, connection_id: ConnectionId, channel: &str) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.channels
            .entry(channel.to_string())
            .or_insert_with(ChannelTopic::new)
            .subscribers
            .insert(connection_id, sender);

        Subscription {
            channel: channel.to_string(),
            connection_id,
            receiver,
        }
    }

    /// Remove a connection from a channel's subscriber set. Idempotent.
    pub fn unsubscribe(&self, connection_id: ConnectionId, channel: &str) {
        if let Some(topic) = self.channels.get(channel) {
            topic.subscribers.remove(&connection_id);
        }
        // Guard above is dropped; now reap the channel if it emptied out.
        self.channels
            .remove_if(channel, |_, topic| topic.subscribers.is_empty());
    }

    /// Fan `text` out to every connection currently subscribed to `channel`.
    ///
    /// Publishing to a channel with zero subscribers is a no-op. A send that
    /// fails (subscriber dropped its receiver) marks that entry stale and
    /// removes it after the fan-out; other deliveries are unaffected.
    pub fn publish(&self, channel: &str, text: &str) {
        let Some(topic) = self.channels.get(channel) else {
            return;
        };

        let line: Arc<str> = Arc::from(text);
        let mut stale: Vec<ConnectionId> = Vec::new();
        for entry in topic.subscribers.iter() {
            if entry.value().send(line.clone()).is_err() {
                stale.push(*entry.key());
            }
        }
        for connection_id in stale {
            topic.subscribers.remove(&connection_id);
            tracing::debug!(%connection_id, channel, "removed stale subscriber");
        }
    }

    /// Number of connections currently subscribed to `channel`.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|topic| topic.subscribers.len())
            .unwrap_or(0)
    }
}

impl Default for ChannelBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChannelBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelBus")
            .field("channel_count", &self.channels.len())
            .finish()
    }
}
