use crate::broker::identity::IdentitySet;
use crate::event::TickEvent;
use crate::subscription::{PositionUpdate, ServerMessage};
use crate::world::World;
use futures::future::join_all;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::time::timeout;
use tracing::debug;

/// Capacity of each subscriber's tick queue. One slot: a subscriber either has
/// room for the current tick or misses it.
pub const TICK_QUEUE_CAPACITY: usize = 1;

/// Receiving halves handed to a new subscriber
pub struct SubscriberQueues {
    pub ticks: mpsc::Receiver<PositionUpdate>,
    pub notices: mpsc::Receiver<ServerMessage>,
}

struct SubscriberSlot {
    ticks: mpsc::Sender<PositionUpdate>,
    notices: mpsc::Sender<ServerMessage>,
}

/// Outcome counts of one broadcast round
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub delivered: usize,
    /// Subscriber too slow within the patience window
    pub dropped: usize,
    /// Subscriber already hung up
    pub closed: usize,
}

enum Outcome {
    Delivered,
    Dropped,
    Closed,
}

impl RoundReport {
    fn tally(outcomes: Vec<Outcome>) -> Self {
        let mut report = RoundReport::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Delivered => report.delivered += 1,
                Outcome::Dropped => report.dropped += 1,
                Outcome::Closed => report.closed += 1,
            }
        }
        report
    }
}

/// Live subscriber queues, keyed by connection identity.
///
/// Owned by the coordinator task; it is never shared, so add/remove/broadcast
/// are serialized by construction.
pub struct SubscriberRegistry {
    subscribers: HashMap<String, SubscriberSlot>,
    patience: Duration,
    notice_capacity: usize,
}

impl SubscriberRegistry {
    pub fn new(patience: Duration, notice_capacity: usize) -> Self {
        Self {
            subscribers: HashMap::new(),
            patience,
            notice_capacity: notice_capacity.max(1),
        }
    }

    /// Register a subscriber and return its receiving queues.
    ///
    /// Re-adding a known id replaces its queues; the old receivers observe a
    /// closed channel.
    pub fn add(&mut self, id: &str) -> SubscriberQueues {
        let (ticks_tx, ticks_rx) = mpsc::channel(TICK_QUEUE_CAPACITY);
        let (notices_tx, notices_rx) = mpsc::channel(self.notice_capacity);

        self.subscribers.insert(
            id.to_string(),
            SubscriberSlot {
                ticks: ticks_tx,
                notices: notices_tx,
            },
        );

        SubscriberQueues {
            ticks: ticks_rx,
            notices: notices_rx,
        }
    }

    /// Unregister a subscriber. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.subscribers.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Run one tick round.
    ///
    /// Each subscriber is reported a uniformly random identity from
    /// `identities` (its own id if the set is empty). The entity only advances
    /// once a queue slot has been secured, and every subscriber is attempted
    /// concurrently so the round lasts at most one patience window.
    pub async fn broadcast(
        &self,
        event: &TickEvent,
        identities: &IdentitySet,
        world: &World,
    ) -> RoundReport {
        if self.subscribers.is_empty() {
            return RoundReport::default();
        }

        let targets: Vec<(&str, &SubscriberSlot, String)> = {
            let mut rng = rand::thread_rng();
            self.subscribers
                .iter()
                .map(|(id, slot)| {
                    let report_id = identities.choose(&mut rng).unwrap_or(id.as_str()).to_string();
                    (id.as_str(), slot, report_id)
                })
                .collect()
        };

        let patience = self.patience;
        let time = event.payload.as_str();
        let deliveries = targets.into_iter().map(|(id, slot, report_id)| async move {
            match timeout(patience, slot.ticks.reserve()).await {
                Ok(Ok(permit)) => {
                    let entity = world.advance(&report_id);
                    permit.send(PositionUpdate::new(report_id, time, entity.x, entity.y));
                    Outcome::Delivered
                }
                Ok(Err(_)) => Outcome::Closed,
                Err(_) => {
                    debug!(connection_id = %id, "Skipping client");
                    Outcome::Dropped
                }
            }
        });

        RoundReport::tally(join_all(deliveries).await)
    }

    /// Send a notice to every registered subscriber, with the same patience rule
    pub async fn notify_all(&self, message: &ServerMessage) -> RoundReport {
        let patience = self.patience;
        let deliveries = self.subscribers.iter().map(|(id, slot)| async move {
            match slot.notices.send_timeout(message.clone(), patience).await {
                Ok(()) => Outcome::Delivered,
                Err(SendTimeoutError::Closed(_)) => Outcome::Closed,
                Err(SendTimeoutError::Timeout(_)) => {
                    debug!(connection_id = %id, kind = message.kind(), "Skipping client notice");
                    Outcome::Dropped
                }
            }
        });

        RoundReport::tally(join_all(deliveries).await)
    }

    /// Queue a notice for one subscriber without waiting
    pub fn notify(&self, id: &str, message: ServerMessage) -> bool {
        match self.subscribers.get(id) {
            Some(slot) => slot.notices.try_send(message).is_ok(),
            None => false,
        }
    }
}
