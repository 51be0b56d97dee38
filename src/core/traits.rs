//! Core traits - the two external boundaries of the control loop

use async_trait::async_trait;

use crate::core::types::{Pair, Price};
use crate::core::{OrderId, Result};
use crate::orders::OrderGroup;

/// Order-management boundary. Submitting a group is one or more RPC calls
/// to the trading daemon; cancellation must complete before a re-quote for
/// the same pair is submitted.
#[async_trait]
pub trait OrderBoundary: Send + Sync {
    /// Submit a batch of desired quote levels for one pair.
    async fn place_order(&self, group: &OrderGroup) -> Result<Vec<OrderId>>;

    /// Cancel every resting order for the pair.
    async fn cancel_orders(&self, pair: &Pair) -> Result<()>;
}

/// Reference-price boundary ("mid price" oracle per pair).
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fails with `NotFound`/`Unavailable` when no quote exists.
    async fn get_price(&self, pair: &Pair) -> Result<Price>;
}
