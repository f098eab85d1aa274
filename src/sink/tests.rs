//! Tests for sink module

#[cfg(test)]
mod tests {
    use super::super::{AlertSink, FanoutSink, LogSink, TelegramSink};
    use crate::error::Result;
    use crate::types::TickReport;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn report(alert: bool) -> TickReport {
        TickReport {
            price: dec!(0.5123),
            alert,
            observed_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[derive(Default)]
    struct CountingSink {
        published: Mutex<usize>,
    }

    #[async_trait]
    impl AlertSink for CountingSink {
        async fn publish(&self, _report: &TickReport) -> Result<()> {
            *self.published.lock() += 1;
            Ok(())
        }
    }

    #[test]
    fn test_log_sink_publishes() {
        let sink = LogSink;
        tokio_test::block_on(async {
            assert!(sink.publish(&report(false)).await.is_ok());
            assert!(sink.publish(&report(true)).await.is_ok());
        });
    }

    #[tokio::test]
    async fn test_disabled_telegram_sink_is_a_no_op() {
        let sink = TelegramSink::disabled();
        assert!(sink.publish(&report(true)).await.is_ok());
    }

    #[tokio::test]
    async fn test_telegram_skips_non_alert_ticks() {
        // An enabled sink with a bogus token would fail on send; a
        // non-alert report must not reach the network at all.
        let sink = TelegramSink::new(
            "token".to_string(),
            "chat".to_string(),
            "xrpusdt".to_string(),
        );
        assert!(sink.publish(&report(false)).await.is_ok());
    }

    #[tokio::test]
    async fn test_fanout_publishes_to_all() {
        let first = Arc::new(CountingSink::default());
        let second = Arc::new(CountingSink::default());

        let mut fanout = FanoutSink::new();
        fanout.push(Arc::clone(&first) as Arc<dyn AlertSink>);
        fanout.push(Arc::clone(&second) as Arc<dyn AlertSink>);

        fanout.publish(&report(true)).await.unwrap();

        assert_eq!(*first.published.lock(), 1);
        assert_eq!(*second.published.lock(), 1);
    }
}
