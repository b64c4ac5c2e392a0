use super::HeraldConfig;
use std::str::FromStr;
use tracing::warn;

impl HeraldConfig {
    /// Override fields from `HERALD_*` env vars. Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("HERALD_BIND_ADDRESS") {
            self.server.bind_address = v;
        }
        override_parsed(&lookup, "HERALD_PORT", &mut self.server.port);
        override_parsed(&lookup, "HERALD_TICK_INTERVAL_MS", &mut self.ticker.interval_ms);
        override_parsed(&lookup, "HERALD_PATIENCE_MS", &mut self.broker.patience_ms);
        override_parsed(&lookup, "HERALD_WORLD_WIDTH", &mut self.world.width);
        override_parsed(&lookup, "HERALD_WORLD_HEIGHT", &mut self.world.height);
    }
}

fn override_parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn!(key = key, value = %raw, "Ignoring unparseable environment override"),
    }
}
