//! Configuration - loaded from `config.toml`
//!
//! All trading parameters are runtime-configurable. The strategies section
//! seeds the engine registry at startup; the coins section drives the
//! electrum bootstrap against the daemon.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::types::{Pair, Quantity, Side, Spread};
use crate::strategy::MarketMakingStrategy;

/// Trading daemon connection and process settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// JSON-RPC endpoint of the locally-run daemon
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// RPC password, sent in every request envelope
    pub userpass: String,
    /// Daemon binary path (only used when `manage_process` is set)
    #[serde(default)]
    pub binary: PathBuf,
    /// Working directory the daemon is launched from
    #[serde(default)]
    pub working_dir: PathBuf,
    /// Launch and supervise the daemon process ourselves
    #[serde(default)]
    pub manage_process: bool,
    /// Seconds to wait at startup; the daemon still running afterwards
    /// counts as a successful launch
    #[serde(default = "default_startup_wait")]
    pub startup_wait_secs: u64,
    /// Seconds to wait for a graceful stop before killing the process
    #[serde(default = "default_stop_timeout")]
    pub stop_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:7783".to_string()
}
fn default_startup_wait() -> u64 {
    5
}
fn default_stop_timeout() -> u64 {
    2
}

/// Refresh loop cadence.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Milliseconds between re-quote sweeps
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Consecutive sweeps where every pair fails on transport before the
    /// loop gives up on the daemon
    #[serde(default = "default_max_failed_sweeps")]
    pub max_failed_sweeps: u32,
}

fn default_interval_ms() -> u64 {
    1_000
}
fn default_max_failed_sweeps() -> u32 {
    3
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_failed_sweeps: default_max_failed_sweeps(),
        }
    }
}

/// One coin to activate on the daemon at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinConfig {
    pub ticker: String,
    pub electrum_servers: Vec<String>,
    #[serde(default)]
    pub tx_history: bool,
}

/// One quoting strategy, keyed by its pair.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    pub base: String,
    pub quote: String,
    /// Fractional spread off the mid (0.01 = 1%)
    pub spread: Decimal,
    pub quantity: Decimal,
    pub side: Side,
}

impl StrategyConfig {
    pub fn to_strategy(&self) -> MarketMakingStrategy {
        MarketMakingStrategy {
            pair: Pair::of(self.base.clone(), self.quote.clone()),
            spread: Spread::new(self.spread),
            quantity: Quantity::new(self.quantity),
            side: self.side,
        }
    }
}

/// Top-level config file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub coins: Vec<CoinConfig>,
    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,
}

impl Config {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> crate::core::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::core::Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            crate::core::Error::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load from the default location (project root config.toml).
    pub fn load_default() -> crate::core::Result<Self> {
        let candidates = [
            "config.toml",
            concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml"),
        ];

        for path in &candidates {
            let path = Path::new(path);
            if path.exists() {
                let cfg = Self::load(path)?;
                tracing::info!("loaded config from {}", path.display());
                return Ok(cfg);
            }
        }

        Err(crate::core::Error::Config(
            "no config.toml found".to_string(),
        ))
    }
}
