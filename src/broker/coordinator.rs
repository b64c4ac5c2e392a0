use crate::broker::identity::IdentitySet;
use crate::broker::registry::SubscriberRegistry;
use crate::broker::stats::BrokerStats;
use crate::config::HeraldConfig;
use crate::event::TickEvent;
use crate::subscription::{ServerMessage, Subscription};
use crate::world::World;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Membership and query commands handled by the coordinator task
pub(crate) enum Command {
    Subscribe {
        reply: oneshot::Sender<Subscription>,
    },
    Unsubscribe {
        id: String,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
}

/// Tunables for the coordinator
#[derive(Debug, Clone)]
pub struct BrokerOptions {
    /// How long a round waits on one subscriber's full queue before dropping
    pub patience: Duration,
    /// Capacity of each subscriber's notice queue
    pub notice_capacity: usize,
    /// Remove a subscriber's entity from the world when it disconnects
    pub prune_on_disconnect: bool,
}

impl Default for BrokerOptions {
    fn default() -> Self {
        Self {
            patience: Duration::from_millis(20),
            notice_capacity: 16,
            prune_on_disconnect: true,
        }
    }
}

impl From<&HeraldConfig> for BrokerOptions {
    fn from(config: &HeraldConfig) -> Self {
        Self {
            patience: Duration::from_millis(config.broker.patience_ms),
            notice_capacity: config.broker.notice_capacity,
            prune_on_disconnect: config.world.prune_on_disconnect,
        }
    }
}

/// Single owner of the live subscriber set.
///
/// Runs as one task; every membership change and every broadcast round is a
/// message processed in order, so the registry is never mutated while a round
/// iterates it.
pub(crate) struct Broker {
    registry: SubscriberRegistry,
    identities: IdentitySet,
    world: Arc<World>,
    stats: Arc<BrokerStats>,
    prune_on_disconnect: bool,
    /// Weak so that live subscriptions alone keep the coordinator running,
    /// but the coordinator never keeps itself alive.
    commands: mpsc::WeakUnboundedSender<Command>,
}

impl Broker {
    pub(crate) fn new(
        options: &BrokerOptions,
        world: Arc<World>,
        stats: Arc<BrokerStats>,
        commands: mpsc::WeakUnboundedSender<Command>,
    ) -> Self {
        Self {
            registry: SubscriberRegistry::new(options.patience, options.notice_capacity),
            identities: IdentitySet::new(),
            world,
            stats,
            prune_on_disconnect: options.prune_on_disconnect,
            commands,
        }
    }

    /// Process commands and ticks until every handle and subscription is gone.
    ///
    /// Membership commands take priority over ticks so a round always sees the
    /// freshest subscriber set.
    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut ticks: mpsc::Receiver<TickEvent>,
    ) {
        info!("Broker listening");

        loop {
            tokio::select! {
                biased;

                Some(command) = commands.recv() => self.handle_command(command).await,
                Some(event) = ticks.recv() => self.publish(event).await,
                else => break,
            }
        }

        info!("Broker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Subscribe { reply } => self.add_subscriber(reply).await,
            Command::Unsubscribe { id } => self.remove_subscriber(&id).await,
            Command::Count { reply } => {
                let _ = reply.send(self.registry.count());
            }
        }
    }

    async fn add_subscriber(&mut self, reply: oneshot::Sender<Subscription>) {
        let Some(commands) = self.commands.upgrade() else {
            warn!("Subscribe request after broker shutdown");
            return;
        };

        // UUIDv7: time-ordered, unique per connection
        let id = uuid::Uuid::now_v7().to_string();
        let queues = self.registry.add(&id);
        self.identities.insert(&id);
        self.stats.record_connection();

        // Fresh queue, cannot be full
        self.registry.notify(&id, ServerMessage::new_connection(&id));

        let clients = self.registry.count();
        info!(connection_id = %id, clients = clients, "Client added");

        if let Err(subscription) = reply.send(Subscription::new(id, queues, commands)) {
            // Requester went away; dropping the subscription queues an unsubscribe
            debug!(connection_id = %subscription.id(), "Subscriber abandoned before delivery");
            drop(subscription);
        }

        self.registry
            .notify_all(&ServerMessage::num_clients(clients))
            .await;
    }

    async fn remove_subscriber(&mut self, id: &str) {
        if !self.registry.remove(id) {
            return;
        }
        self.identities.remove(id);
        if self.prune_on_disconnect {
            self.world.remove(id);
        }

        let clients = self.registry.count();
        info!(connection_id = %id, clients = clients, "Removed client");

        self.registry
            .notify_all(&ServerMessage::remove_connection(id))
            .await;
        self.registry
            .notify_all(&ServerMessage::num_clients(clients))
            .await;
    }

    async fn publish(&mut self, event: TickEvent) {
        let report = self
            .registry
            .broadcast(&event, &self.identities, &self.world)
            .await;
        self.stats.record_round(report.delivered, report.dropped);

        if report.dropped > 0 {
            debug!(
                delivered = report.delivered,
                dropped = report.dropped,
                "Tick dropped for slow clients"
            );
        }
    }
}
