// Fan-out broker: one coordinating task owning the subscriber set

mod coordinator;
mod handle;
mod identity;
mod registry;
mod stats;

pub(crate) use coordinator::Command;
pub use coordinator::BrokerOptions;
pub use handle::BrokerHandle;
pub use identity::IdentitySet;
pub use registry::{RoundReport, SubscriberQueues, SubscriberRegistry, TICK_QUEUE_CAPACITY};
pub use stats::{BrokerStats, StatsSnapshot};
