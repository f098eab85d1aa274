//! Price feeds
//!
//! A feed runs as its own task and pushes `FeedEvent`s into the monitor's
//! channel. The stream is finite-but-unbounded: it ends either with
//! `Closed` (graceful) or `Failed` (abnormal, surfaced to the operator).

pub mod binance;

pub use binance::BinanceFeed;

use crate::error::Result;
use crate::types::Tick;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Event stream delivered by a feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Tick(Tick),
    /// Graceful end of stream
    Closed,
    /// Abnormal end; the monitor treats this as fatal
    Failed(String),
}

/// A source of price ticks for a single instrument
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Run until the stream ends, pushing events into `tx`.
    async fn run(&self, tx: mpsc::Sender<FeedEvent>) -> Result<()>;

    /// Source name for logging
    fn name(&self) -> &str;
}
