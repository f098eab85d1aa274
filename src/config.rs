//! Configuration management

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub alert: AlertConfig,
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Combined-stream websocket endpoint
    pub ws_url: String,
    /// Instrument stream to subscribe to, e.g. "xrpusdt"
    pub symbol: String,
    /// Reconnect attempts before the feed reports failure
    pub max_reconnect_attempts: u32,
    /// Initial reconnect delay in milliseconds
    pub initial_reconnect_delay_ms: u64,
    /// Maximum reconnect delay in milliseconds
    pub max_reconnect_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Window span in seconds over which the peak is tracked
    pub period_secs: i64,
    /// Fractional drop from the peak that triggers an alert (0.01 = 1%)
    pub drop_threshold: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,
    /// Destination chat
    pub chat_id: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_url: "wss://stream.binance.com:9443/stream".to_string(),
            symbol: "xrpusdt".to_string(),
            max_reconnect_attempts: 5,
            initial_reconnect_delay_ms: 1000,
            max_reconnect_delay_ms: 60000,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            period_secs: 3600,       // 1 hour window
            drop_threshold: dec!(0.01), // 1%
        }
    }
}

impl Config {
    /// Load configuration from file, with environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(
                &path.as_ref().to_string_lossy(),
            ))
            .add_source(config::Environment::with_prefix("DROP_MONITOR").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Load from default locations, falling back to built-in defaults
    pub fn load_default() -> anyhow::Result<Self> {
        let paths = ["config.toml", "~/.config/drop-monitor/config.toml"];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        Ok(Config::default())
    }
}
