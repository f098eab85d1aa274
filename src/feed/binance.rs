//! Binance combined-stream ticker feed
//!
//! Subscribes to `<symbol>@ticker` on the combined-stream endpoint and
//! turns every ticker event into a `Tick` stamped at receipt.

use crate::clock::Clock;
use crate::config::FeedConfig;
use crate::error::{MonitorError, Result};
use crate::feed::{FeedEvent, PriceFeed};
use crate::types::Tick;
use async_trait::async_trait;
use futures_util::StreamExt;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Combined-stream envelope: `{"stream": "...", "data": {...}}`
#[derive(Debug, Deserialize)]
struct StreamEnvelope {
    data: TickerData,
}

/// Binance 24h ticker event; only the close price is consumed
#[derive(Debug, Deserialize)]
struct TickerData {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "c")]
    close_price: String,
}

pub struct BinanceFeed {
    config: FeedConfig,
    clock: Arc<dyn Clock>,
}

impl BinanceFeed {
    pub fn new(config: FeedConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    fn stream_url(&self) -> String {
        format!(
            "{}?streams={}@ticker",
            self.config.ws_url,
            self.config.symbol.to_lowercase()
        )
    }

    /// Parse one text frame. Subscribe acks and other control payloads are
    /// not envelopes and are skipped; an envelope carrying a non-numeric
    /// price is a feed failure.
    fn parse_tick(&self, text: &str) -> Result<Option<Tick>> {
        let Ok(envelope) = serde_json::from_str::<StreamEnvelope>(text) else {
            debug!("skipping non-ticker payload");
            return Ok(None);
        };

        let price: Decimal = envelope.data.close_price.parse().map_err(|_| {
            MonitorError::Feed(format!(
                "non-numeric price {:?} for {}",
                envelope.data.close_price, envelope.data.symbol
            ))
        })?;

        Ok(Some(Tick::new(price, self.clock.now())))
    }

    /// One connection lifetime. `Ok(true)` means the stream ended
    /// gracefully; `Ok(false)` means it ended without a close frame.
    async fn connect_and_stream(
        &self,
        url: &str,
        tx: &mpsc::Sender<FeedEvent>,
    ) -> Result<bool> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| MonitorError::WebSocket(e.to_string()))?;
        let (_write, mut read) = ws_stream.split();

        info!("Connected to {} stream for {}", self.name(), self.config.symbol);

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Some(tick) = self.parse_tick(&text)? {
                        debug!(price = %tick.price, "tick");
                        if tx.send(FeedEvent::Tick(tick)).await.is_err() {
                            // Receiver gone, nothing left to feed.
                            return Ok(true);
                        }
                    }
                }
                Ok(Message::Ping(_)) => {
                    debug!("Received ping, pong handled by tungstenite");
                }
                Ok(Message::Close(_)) => {
                    info!("Server closed the stream");
                    return Ok(true);
                }
                Ok(_) => {}
                Err(e) => {
                    return Err(MonitorError::WebSocket(e.to_string()));
                }
            }
        }

        Ok(false)
    }
}

#[async_trait]
impl PriceFeed for BinanceFeed {
    /// Streams until graceful close. Transport errors reconnect with
    /// exponential backoff up to the configured attempt cap; malformed
    /// payloads and an exhausted cap end the feed with `Failed`.
    async fn run(&self, tx: mpsc::Sender<FeedEvent>) -> Result<()> {
        let url = self.stream_url();
        let mut attempt = 0u32;
        let mut delay_ms = self.config.initial_reconnect_delay_ms;

        loop {
            match self.connect_and_stream(&url, &tx).await {
                Ok(true) => {
                    let _ = tx.send(FeedEvent::Closed).await;
                    return Ok(());
                }
                Ok(false) => {
                    warn!("Stream ended without close frame, reconnecting");
                }
                Err(MonitorError::Feed(reason)) => {
                    error!("Feed failure: {}", reason);
                    let _ = tx.send(FeedEvent::Failed(reason.clone())).await;
                    return Err(MonitorError::Feed(reason));
                }
                Err(e) => {
                    warn!("Connection error: {}", e);
                }
            }

            attempt += 1;
            if attempt > self.config.max_reconnect_attempts {
                let reason = format!(
                    "gave up after {} reconnect attempts",
                    self.config.max_reconnect_attempts
                );
                error!("{}", reason);
                let _ = tx.send(FeedEvent::Failed(reason.clone())).await;
                return Err(MonitorError::Feed(reason));
            }

            info!("Reconnecting in {}ms (attempt {})", delay_ms, attempt);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            delay_ms = (delay_ms * 2).min(self.config.max_reconnect_delay_ms);
        }
    }

    fn name(&self) -> &str {
        "binance"
    }
}
