use crate::broker::{Command, SubscriberQueues};
use crate::subscription::protocol::{PositionUpdate, ServerMessage};
use tokio::sync::mpsc;

/// One live subscriber as seen by its delivery loop.
///
/// Dropping the subscription unregisters it from the broker, which is how a
/// transport reports that its connection has gone away.
pub struct Subscription {
    id: String,
    queues: SubscriberQueues,
    commands: mpsc::UnboundedSender<Command>,
}

impl Subscription {
    pub(crate) fn new(
        id: String,
        queues: SubscriberQueues,
        commands: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self {
            id,
            queues,
            commands,
        }
    }

    /// Connection identity assigned at subscribe time
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Next message for this subscriber, notices first.
    ///
    /// Returns None once both queues are closed (unsubscribed or broker gone).
    pub async fn next(&mut self) -> Option<ServerMessage> {
        tokio::select! {
            biased;

            Some(notice) = self.queues.notices.recv() => Some(notice),
            Some(update) = self.queues.ticks.recv() => Some(ServerMessage::Position(update)),
            else => None,
        }
    }

    /// Wait for the next position update only
    pub async fn recv_position(&mut self) -> Option<PositionUpdate> {
        self.queues.ticks.recv().await
    }

    /// Wait for the next membership notice only
    pub async fn recv_notice(&mut self) -> Option<ServerMessage> {
        self.queues.notices.recv().await
    }

    /// Non-blocking poll of the tick queue
    pub fn try_recv_position(&mut self) -> Option<PositionUpdate> {
        self.queues.ticks.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Broker may already be gone; nothing left to unregister from then.
        let _ = self.commands.send(Command::Unsubscribe {
            id: self.id.clone(),
        });
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
