//! Core data types shared across the monitor

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One timestamped price observation from the feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub price: Decimal,
    /// When the feed delivered this price
    pub observed_at: DateTime<Utc>,
}

impl Tick {
    pub fn new(price: Decimal, observed_at: DateTime<Utc>) -> Self {
        Self { price, observed_at }
    }
}

/// Outcome of processing one tick, handed to the sinks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub price: Decimal,
    pub alert: bool,
    pub observed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tick_roundtrip() {
        let tick = Tick::new(dec!(0.52), Utc::now());
        let json = serde_json::to_string(&tick).unwrap();
        let back: Tick = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tick);
    }

    #[test]
    fn test_report_carries_tick_fields() {
        let at = Utc::now();
        let report = TickReport {
            price: dec!(101.5),
            alert: true,
            observed_at: at,
        };
        assert_eq!(report.price, dec!(101.5));
        assert!(report.alert);
        assert_eq!(report.observed_at, at);
    }
}
