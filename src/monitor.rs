//! Tick consumption loop
//!
//! Single consumer over the feed channel and sole owner of the window
//! state. Each tick is folded into the window, evaluated, and reported to
//! the sink before the next tick is received, so per-tick processing is
//! atomic without locking.

use crate::error::{MonitorError, Result};
use crate::evaluator::DropEvaluator;
use crate::feed::FeedEvent;
use crate::sink::AlertSink;
use crate::types::{Tick, TickReport};
use crate::window::WindowTracker;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

pub struct Monitor {
    window: WindowTracker,
    evaluator: DropEvaluator,
    sink: Arc<dyn AlertSink>,
}

impl Monitor {
    pub fn new(window: WindowTracker, evaluator: DropEvaluator, sink: Arc<dyn AlertSink>) -> Self {
        Self {
            window,
            evaluator,
            sink,
        }
    }

    /// Consume feed events until the stream ends.
    ///
    /// A graceful close stops the loop cleanly; a feed failure is returned
    /// to the caller so the operator sees a nonzero exit.
    pub async fn run(&mut self, mut rx: mpsc::Receiver<FeedEvent>) -> Result<()> {
        while let Some(event) = rx.recv().await {
            match event {
                FeedEvent::Tick(tick) => self.process(&tick).await?,
                FeedEvent::Closed => {
                    info!("Feed closed, stopping monitor");
                    return Ok(());
                }
                FeedEvent::Failed(reason) => {
                    return Err(MonitorError::Feed(reason));
                }
            }
        }

        // Sender dropped without a terminal event; the feed task is gone.
        info!("Feed channel ended, stopping monitor");
        Ok(())
    }

    async fn process(&mut self, tick: &Tick) -> Result<()> {
        self.window.ingest(tick);
        let alert = self.evaluator.evaluate(tick, &self.window);

        let report = TickReport {
            price: tick.price,
            alert,
            observed_at: tick.observed_at,
        };
        self.sink.publish(&report).await
    }
}
