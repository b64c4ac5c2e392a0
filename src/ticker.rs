use crate::broker::BrokerHandle;
use crate::event::TickEvent;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, trace};

/// Periodically push a timestamp tick into the broker.
///
/// Runs until aborted or the broker stops accepting ticks. `publish` waits
/// while the previous tick is still queued, so a slow round delays the next
/// tick rather than piling ticks up.
pub async fn run_ticker(broker: BrokerHandle, period: Duration) {
    let mut ticker = interval(period);

    // Skip missed ticks to prevent backlog under load
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_ms = period.as_millis() as u64, "Ticker started");

    loop {
        ticker.tick().await;

        let event = TickEvent::now();
        trace!(time = %event.payload, "Receiving event");

        if broker.publish(event).await.is_err() {
            info!("Broker closed, ticker stopping");
            break;
        }
    }
}
