use crate::broker::coordinator::{Broker, BrokerOptions, Command};
use crate::broker::stats::{BrokerStats, StatsSnapshot};
use crate::error::BroadcastError;
use crate::event::TickEvent;
use crate::subscription::Subscription;
use crate::world::World;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Cloneable entry point to the broker.
///
/// All operations are messages to the coordinator task; nothing here touches
/// the subscriber set directly.
#[derive(Clone)]
pub struct BrokerHandle {
    commands: mpsc::UnboundedSender<Command>,
    ticks: mpsc::Sender<TickEvent>,
    world: Arc<World>,
    stats: Arc<BrokerStats>,
}

impl BrokerHandle {
    /// Start the coordinator task. Must be called inside a tokio runtime.
    pub fn spawn(options: BrokerOptions, world: Arc<World>) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        // One pending tick at most; publishers wait while a round is in flight
        let (ticks_tx, ticks_rx) = mpsc::channel(1);
        let stats = Arc::new(BrokerStats::new());

        let broker = Broker::new(
            &options,
            Arc::clone(&world),
            Arc::clone(&stats),
            commands_tx.downgrade(),
        );
        tokio::spawn(broker.run(commands_rx, ticks_rx));

        Self {
            commands: commands_tx,
            ticks: ticks_tx,
            world,
            stats,
        }
    }

    /// Register a new subscriber.
    ///
    /// The subscription's notice queue already holds its `newConnection`
    /// announcement when this returns.
    pub async fn subscribe(&self) -> Result<Subscription, BroadcastError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Subscribe { reply })
            .map_err(|_| BroadcastError::BrokerClosed)?;
        response.await.map_err(|_| BroadcastError::BrokerClosed)
    }

    /// Unregister a subscriber by identity. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: &str) -> Result<(), BroadcastError> {
        self.commands
            .send(Command::Unsubscribe { id: id.to_string() })
            .map_err(|_| BroadcastError::BrokerClosed)
    }

    /// Hand a tick to the broker, waiting while the previous one is still queued
    pub async fn publish(&self, event: TickEvent) -> Result<(), BroadcastError> {
        self.ticks
            .send(event)
            .await
            .map_err(|_| BroadcastError::BrokerClosed)
    }

    /// Registered subscribers, after every command sent before this call
    pub async fn count(&self) -> Result<usize, BroadcastError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Count { reply })
            .map_err(|_| BroadcastError::BrokerClosed)?;
        response.await.map_err(|_| BroadcastError::BrokerClosed)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }
}
