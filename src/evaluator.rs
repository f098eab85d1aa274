//! Drop-alert decision

use crate::types::Tick;
use crate::window::WindowTracker;
use rust_decimal::Decimal;

/// Decides whether a tick has fallen far enough below the window peak.
///
/// Stateless: the same tick and window state always produce the same
/// decision, and repeated firing while the price stays below the trigger
/// is not suppressed.
#[derive(Debug, Clone)]
pub struct DropEvaluator {
    threshold: Decimal,
}

impl DropEvaluator {
    /// `threshold` is the fractional drop that fires, e.g. `0.01` for 1%.
    pub fn new(threshold: Decimal) -> Self {
        Self { threshold }
    }

    /// Alert iff the price is strictly below `peak * (1 - threshold)`.
    /// A window with no data never alerts.
    pub fn evaluate(&self, tick: &Tick, window: &WindowTracker) -> bool {
        match window.peak() {
            Some(peak) => tick.price < peak.price * (Decimal::ONE - self.threshold),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn window_with_peak(peak: Decimal) -> WindowTracker {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut window = WindowTracker::new(start, Duration::hours(1));
        window.ingest(&Tick::new(peak, start));
        window
    }

    fn tick(price: Decimal) -> Tick {
        let at = Utc.timestamp_opt(1_700_000_010, 0).unwrap();
        Tick::new(price, at)
    }

    #[test]
    fn test_boundary_is_strict() {
        let evaluator = DropEvaluator::new(dec!(0.01));
        let mut window = window_with_peak(dec!(100));

        // Exactly the trigger price does not fire.
        let at_trigger = tick(dec!(99.00));
        window.ingest(&at_trigger);
        assert!(!evaluator.evaluate(&at_trigger, &window));

        // One cent below it does.
        let below = tick(dec!(98.99));
        window.ingest(&below);
        assert!(evaluator.evaluate(&below, &window));
    }

    #[test]
    fn test_no_data_never_alerts() {
        let evaluator = DropEvaluator::new(dec!(0.01));
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let window = WindowTracker::new(start, Duration::hours(1));

        assert!(!evaluator.evaluate(&tick(dec!(0.01)), &window));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let evaluator = DropEvaluator::new(dec!(0.01));
        let mut window = window_with_peak(dec!(100));

        let below = tick(dec!(95));
        window.ingest(&below);

        let first = evaluator.evaluate(&below, &window);
        let second = evaluator.evaluate(&below, &window);
        assert!(first);
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_firing_is_not_suppressed() {
        let evaluator = DropEvaluator::new(dec!(0.01));
        let mut window = window_with_peak(dec!(100));

        for price in [dec!(98), dec!(97.5), dec!(97)] {
            let tick = tick(price);
            window.ingest(&tick);
            assert!(evaluator.evaluate(&tick, &window));
        }
    }

    #[test]
    fn test_new_high_does_not_alert() {
        let evaluator = DropEvaluator::new(dec!(0.01));
        let mut window = window_with_peak(dec!(100));

        let high = tick(dec!(110));
        window.ingest(&high);
        assert!(!evaluator.evaluate(&high, &window));
    }
}
