// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Internal typed event bus for rede.
//!
//! Publishing never blocks and never fails: a bus with no subscribers
//! simply drops the event, and slow subscribers lag rather than stalling
//! the session loop.

pub mod events;

pub use events::{BusEnvelope, RedeEvent};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Default broadcast channel capacity.
const CHANNEL_CAPACITY: usize = 256;

/// Shared reference to an [`EventBus`].
pub type SharedEventBus = Arc<EventBus>;

/// Broadcast bus of [`RedeEvent`]s.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<BusEnvelope>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a shared reference to this event bus.
    pub fn shared(self) -> SharedEventBus {
        Arc::new(self)
    }

    /// Publishes `event`, stamped as committed at `at`.
    pub fn publish(&self, at: DateTime<Utc>, event: RedeEvent) -> Uuid {
        let id = Uuid::new_v4();
        let event_type = event.event_type();
        match self.sender.send(BusEnvelope { id, at, event }) {
            Ok(receivers) => debug!(event_type, %id, receivers, "event published"),
            Err(_) => debug!(event_type, %id, "event published (no receivers)"),
        }
        id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rede_core::{AvailabilityLevel, ConversationKey, Status, UserId};

    fn created(at: DateTime<Utc>) -> RedeEvent {
        RedeEvent::SessionCreated {
            key: ConversationKey::new("g", "c"),
            creator: UserId::new("alice"),
            status: Status::new(AvailabilityLevel::Available, at),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let now = Utc::now();
        let id = bus.publish(now, created(now));

        for rx in [&mut first, &mut second] {
            let envelope = rx.recv().await.unwrap();
            assert_eq!(envelope.id, id);
            assert_eq!(envelope.at, now);
            assert_eq!(envelope.event.event_type(), "session_created");
        }
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = EventBus::new();
        let now = Utc::now();
        bus.publish(now, created(now));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn events_are_tagged_by_type() {
        let now = Utc::now();
        let json = serde_json::to_value(created(now)).unwrap();
        assert_eq!(json["type"], "session_created");
        assert_eq!(json["key"]["channel"], "c");
        assert_eq!(created(now).key(), Some(&ConversationKey::new("g", "c")));
    }
}
