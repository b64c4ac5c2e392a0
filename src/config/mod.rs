mod env;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Complete Herald configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeraldConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub world: WorldConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Interval between SSE keep-alive comments
    #[serde(default = "default_keep_alive_seconds")]
    pub keep_alive_seconds: u64,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_keep_alive_seconds() -> u64 {
    15
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            keep_alive_seconds: default_keep_alive_seconds(),
        }
    }
}

/// Fan-out configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// How long a broadcast waits on a slow subscriber before skipping it
    #[serde(default = "default_patience_ms")]
    pub patience_ms: u64,
    /// Pending membership notices buffered per subscriber
    #[serde(default = "default_notice_capacity")]
    pub notice_capacity: usize,
}

fn default_patience_ms() -> u64 {
    20
}

fn default_notice_capacity() -> usize {
    16
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            patience_ms: default_patience_ms(),
            notice_capacity: default_notice_capacity(),
        }
    }
}

/// Tick source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_ticker_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_ticker_enabled() -> bool {
    true
}

fn default_interval_ms() -> u64 {
    20
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            enabled: default_ticker_enabled(),
            interval_ms: default_interval_ms(),
        }
    }
}

/// Simulation grid configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_dimension")]
    pub width: u32,
    #[serde(default = "default_dimension")]
    pub height: u32,
    /// Drop a subscriber's entity as soon as it disconnects
    #[serde(default = "default_prune_on_disconnect")]
    pub prune_on_disconnect: bool,
}

fn default_dimension() -> u32 {
    500
}

fn default_prune_on_disconnect() -> bool {
    true
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
            prune_on_disconnect: default_prune_on_disconnect(),
        }
    }
}

impl HeraldConfig {
    /// Reject values the broker cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.world.width == 0 || self.world.height == 0 {
            bail!(
                "world dimensions must be positive, got {}x{}",
                self.world.width,
                self.world.height
            );
        }
        if self.ticker.interval_ms == 0 {
            bail!("ticker.interval_ms must be positive");
        }
        if self.broker.notice_capacity == 0 {
            bail!("broker.notice_capacity must be positive");
        }
        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<HeraldConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: HeraldConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}
