//! Alert output sinks
//!
//! The monitor reports every processed tick through an `AlertSink`; sinks
//! own how the result is surfaced (log line, Telegram push, ...).

pub mod telegram;

#[cfg(test)]
mod tests;

pub use telegram::TelegramSink;

use crate::error::Result;
use crate::types::TickReport;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Receives one report per processed tick
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn publish(&self, report: &TickReport) -> Result<()>;
}

/// Structured log output: one line per tick, a warning when the drop fires
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    async fn publish(&self, report: &TickReport) -> Result<()> {
        info!(price = %report.price, at = %report.observed_at, "tick");
        if report.alert {
            warn!(price = %report.price, "Price down!");
        }
        Ok(())
    }
}

/// Publishes to every configured sink in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn AlertSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Arc<dyn AlertSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl AlertSink for FanoutSink {
    async fn publish(&self, report: &TickReport) -> Result<()> {
        for sink in &self.sinks {
            sink.publish(report).await?;
        }
        Ok(())
    }
}
