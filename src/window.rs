//! Trailing-window peak tracking
//!
//! Keeps the observations seen over the trailing period in a time-ordered
//! deque and maintains the running maximum incrementally. The maximum is
//! recomputed by a full rescan only when the observation holding it ages
//! out of the window, so the per-tick cost stays O(1) amortized.

use crate::types::Tick;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use tracing::debug;

/// A price observation retained inside the window
#[derive(Debug, Clone, Copy, PartialEq)]
struct Observation {
    price: Decimal,
    observed_at: DateTime<Utc>,
}

/// The running maximum and the time it was observed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub price: Decimal,
    pub observed_at: DateTime<Utc>,
}

/// Sliding time window over a monotone tick stream.
///
/// The window never reaches further back than `started_at`, and never
/// spans more than `period`. `peak` is `None` exactly when the window
/// holds no observations.
pub struct WindowTracker {
    started_at: DateTime<Utc>,
    period: Duration,
    retained: VecDeque<Observation>,
    peak: Option<Peak>,
}

impl WindowTracker {
    pub fn new(started_at: DateTime<Utc>, period: Duration) -> Self {
        Self {
            started_at,
            period,
            retained: VecDeque::new(),
            peak: None,
        }
    }

    /// Fold one tick into the window.
    ///
    /// Timestamps must be non-decreasing; the deque then stays time-ordered
    /// and pruning only ever removes from the front.
    pub fn ingest(&mut self, tick: &Tick) {
        let period_start = self.period_start(tick.observed_at);

        self.retained.push_back(Observation {
            price: tick.price,
            observed_at: tick.observed_at,
        });

        while self
            .retained
            .front()
            .map_or(false, |obs| obs.observed_at < period_start)
        {
            self.retained.pop_front();
        }

        // Strict comparison keeps the earliest observation on price ties.
        if self.peak.map_or(true, |peak| tick.price > peak.price) {
            self.peak = Some(Peak {
                price: tick.price,
                observed_at: tick.observed_at,
            });
        }

        if self.peak.map_or(false, |peak| peak.observed_at < period_start) {
            // The incumbent maximum aged out; no secondary maximum is
            // tracked, so recover it from the retained set.
            self.peak = self.rescan();
            match self.peak {
                Some(peak) => debug!(price = %peak.price, "window peak recomputed"),
                None => debug!("window empty after pruning"),
            }
        }
    }

    /// Current maximum over the retained observations, `None` when the
    /// window holds no data.
    pub fn peak(&self) -> Option<Peak> {
        self.peak
    }

    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    /// Lower bound of the logical window at `now`; clamped so the window
    /// never predates process start.
    fn period_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        (now - self.period).max(self.started_at)
    }

    /// Bounded rescan of the retained set. Front-to-back with a strict
    /// comparison, so ties resolve to the earliest timestamp.
    fn rescan(&self) -> Option<Peak> {
        let mut best: Option<Peak> = None;
        for obs in &self.retained {
            if best.map_or(true, |b| obs.price > b.price) {
                best = Some(Peak {
                    price: obs.price,
                    observed_at: obs.observed_at,
                });
            }
        }
        best
    }
}
