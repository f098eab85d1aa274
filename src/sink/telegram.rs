//! Telegram alert delivery
//!
//! Pushes a message to the Bot API for alert ticks only; ordinary ticks
//! pass through silently. Send failures are logged, never fatal.

use crate::error::Result;
use crate::sink::AlertSink;
use crate::types::TickReport;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

#[derive(Clone)]
pub struct TelegramSink {
    http: Client,
    bot_token: String,
    chat_id: String,
    symbol: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct TelegramMessage {
    chat_id: String,
    text: String,
    parse_mode: String,
}

impl TelegramSink {
    pub fn new(bot_token: String, chat_id: String, symbol: String) -> Self {
        Self {
            http: Client::new(),
            bot_token,
            chat_id,
            symbol,
            enabled: true,
        }
    }

    /// Create a disabled sink (for when Telegram is not configured)
    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            bot_token: String::new(),
            chat_id: String::new(),
            symbol: String::new(),
            enabled: false,
        }
    }

    fn render(&self, report: &TickReport) -> String {
        format!(
            "🔻 <b>{}</b> price down\nPrice: {}\nAt: {}",
            self.symbol.to_uppercase(),
            report.price,
            report.observed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }

    async fn send(&self, text: &str) -> Result<()> {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.bot_token
        );

        let msg = TelegramMessage {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "HTML".to_string(),
        };

        let response = self.http.post(&url).json(&msg).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Telegram send failed: {}", error_text);
        }

        Ok(())
    }
}

#[async_trait]
impl AlertSink for TelegramSink {
    async fn publish(&self, report: &TickReport) -> Result<()> {
        if !self.enabled || !report.alert {
            return Ok(());
        }
        self.send(&self.render(report)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_render_mentions_symbol_and_price() {
        let sink = TelegramSink::new(
            "token".to_string(),
            "chat".to_string(),
            "xrpusdt".to_string(),
        );
        let report = TickReport {
            price: dec!(0.5123),
            alert: true,
            observed_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };

        let text = sink.render(&report);
        assert!(text.contains("XRPUSDT"));
        assert!(text.contains("0.5123"));
    }
}
