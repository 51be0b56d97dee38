//! Refresh loop - periodically re-quotes every registered pair until told
//! to stop.
//!
//! Replaces the usual process-wide running flag with an explicit shutdown
//! channel, and spins on a fixed-interval ticker rather than a busy loop.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::config::RefreshConfig;
use crate::core::traits::OrderBoundary;
use crate::core::types::Pair;
use crate::core::{Error, Result};
use crate::strategy::StrategyEngine;

/// Outcome of one sweep over the registry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub attempted: usize,
    pub refreshed: usize,
    pub failed: usize,
    pub transport_failures: usize,
}

impl SweepReport {
    /// A sweep where every attempted pair died on transport means the
    /// daemon itself is unreachable, not that quotes are missing.
    fn daemon_unreachable(&self) -> bool {
        self.attempted > 0 && self.transport_failures == self.attempted
    }
}

/// Drives the strategy engine over all configured pairs on a cadence and
/// forwards the resulting order groups to the order-management boundary.
pub struct RefreshLoop {
    engine: StrategyEngine,
    orders: Arc<dyn OrderBoundary>,
    interval: Duration,
    max_failed_sweeps: u32,
}

impl RefreshLoop {
    pub fn new(engine: StrategyEngine, orders: Arc<dyn OrderBoundary>, config: &RefreshConfig) -> Self {
        Self {
            engine,
            orders,
            interval: Duration::from_millis(config.interval_ms),
            max_failed_sweeps: config.max_failed_sweeps,
        }
    }

    pub fn engine(&self) -> &StrategyEngine {
        &self.engine
    }

    /// Re-quote one pair: look up its strategy (NotFound propagates),
    /// compute the group, cancel the prior resting orders, then place.
    /// Cancellation completes before the new levels are submitted so the
    /// venue never holds two generations of our liquidity.
    pub async fn refresh_orders(&self, pair: &Pair) -> Result<()> {
        let strategy = self.engine.get_strategy(pair)?.clone();
        let group = self.engine.create_order_group_at_market(pair, &strategy).await?;

        self.orders.cancel_orders(pair).await?;
        let ids = self.orders.place_order(&group).await?;

        debug!(%pair, orders = ids.len(), "re-quoted");
        Ok(())
    }

    /// Apply [`refresh_orders`](Self::refresh_orders) to every registered
    /// pair. One pair's failure never aborts the sweep for the others.
    pub async fn refresh_all_orders(&self) -> SweepReport {
        let pairs: Vec<Pair> = self.engine.strategies().keys().cloned().collect();
        let mut report = SweepReport::default();

        for pair in pairs {
            report.attempted += 1;
            match self.refresh_orders(&pair).await {
                Ok(()) => report.refreshed += 1,
                Err(e) => {
                    report.failed += 1;
                    if e.is_transport() {
                        report.transport_failures += 1;
                    }
                    warn!(%pair, error = %e, "refresh failed, continuing sweep");
                }
            }
        }

        report
    }

    /// Run sweeps on the configured cadence until the shutdown signal
    /// flips, stopping within one in-flight iteration. A daemon that is
    /// unreachable for `max_failed_sweeps` consecutive sweeps is terminal:
    /// the loop returns an error instead of failing silently forever.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut unreachable_sweeps: u32 = 0;

        info!(
            pairs = self.engine.strategies().len(),
            interval_ms = self.interval.as_millis() as u64,
            "refresh loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.refresh_all_orders().await;

                    if report.daemon_unreachable() {
                        unreachable_sweeps += 1;
                        warn!(
                            consecutive = unreachable_sweeps,
                            max = self.max_failed_sweeps,
                            "daemon unreachable for entire sweep"
                        );
                        if unreachable_sweeps >= self.max_failed_sweeps {
                            return Err(Error::Daemon(format!(
                                "daemon unreachable for {unreachable_sweeps} consecutive sweeps"
                            )));
                        }
                    } else {
                        unreachable_sweeps = 0;
                        if report.failed > 0 {
                            debug!(?report, "sweep finished with per-pair failures");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    // a dropped sender counts as a stop request
                    if changed.is_err() || *shutdown.borrow() {
                        info!("refresh loop stopping");
                        return Ok(());
                    }
                }
            }
        }
    }
}
