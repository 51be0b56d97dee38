//! Execution layer - the order-management boundary over the daemon.
//!
//! Maps desired quote levels onto daemon RPCs and keeps the in-process
//! order registry: placements, status pass-throughs, and fill
//! bookkeeping all land here.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::traits::OrderBoundary;
use crate::core::types::{OrderId, Pair, Side};
use crate::core::{Error, Result};
use crate::mm2::Mm2Client;
use crate::mm2::model::{BuyRequest, CancelAllOrdersRequest, SetpriceRequest};
use crate::orders::{Execution, Order, OrderBuilder, OrderGroup, OrderLevel, OrderStatus};

/// Order manager - submits quote levels and tracks the resulting orders.
pub struct OrderManager {
    client: Arc<Mm2Client>,
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl OrderManager {
    pub fn new(client: Arc<Mm2Client>) -> Self {
        Self {
            client,
            orders: RwLock::new(HashMap::new()),
        }
    }

    /// Submit one level and return the daemon-assigned order id. Sell
    /// levels rest as maker asks via `setprice`; buy levels go through
    /// `buy`.
    async fn place_level(&self, pair: &Pair, level: &OrderLevel) -> Result<OrderId> {
        let uuid = match level.side {
            Side::Sell => {
                let answer = self
                    .client
                    .rpc_setprice(SetpriceRequest {
                        base: pair.base.symbol.as_str().to_string(),
                        rel: pair.quote.symbol.as_str().to_string(),
                        price: level.price.as_decimal(),
                        volume: level.quantity.as_decimal(),
                        max: None,
                        cancel_previous: None,
                    })
                    .await?;
                answer.result.uuid
            }
            Side::Buy => {
                let answer = self
                    .client
                    .rpc_buy(BuyRequest {
                        base: pair.base.symbol.as_str().to_string(),
                        rel: pair.quote.symbol.as_str().to_string(),
                        price: level.price.as_decimal(),
                        volume: level.quantity.as_decimal(),
                    })
                    .await?;
                answer.result.uuid
            }
            Side::Both => {
                return Err(Error::Config(
                    "order levels must be single-sided".to_string(),
                ));
            }
        };

        // daemon order ids are uuids; anything else is a broken answer
        Uuid::parse_str(&uuid)
            .map_err(|_| Error::MalformedResponse(format!("order uuid `{uuid}` is not a uuid")))?;

        Ok(OrderId::new(uuid))
    }

    /// Record a venue-reported fill against a tracked order. The fill and
    /// its execution-id bookkeeping are applied under one registry write
    /// lock; a repeated execution id is a no-op.
    pub fn record_fill(&self, order_id: &OrderId, execution: &Execution) -> Result<()> {
        let mut orders = self.orders.write();
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| Error::NotFound(format!("no tracked order {order_id}")))?;

        if order.execution_ids.contains(&execution.id) {
            return Ok(());
        }
        order.add_execution_id(execution.id.clone());
        order.execute(execution);

        if order.finished() {
            info!(order = %order_id, "order completely filled");
        }
        Ok(())
    }

    /// Pass a venue-reported status straight through to the order.
    pub fn record_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<()> {
        let mut orders = self.orders.write();
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| Error::NotFound(format!("no tracked order {order_id}")))?;
        order.change_status(status);
        Ok(())
    }

    pub fn order(&self, order_id: &OrderId) -> Option<Order> {
        self.orders.read().get(order_id).cloned()
    }

    pub fn open_orders(&self) -> Vec<Order> {
        self.orders
            .read()
            .values()
            .filter(|o| !o.finished())
            .cloned()
            .collect()
    }

    #[cfg(test)]
    fn track(&self, order: Order) {
        self.orders.write().insert(order.id.clone(), order);
    }
}

#[async_trait]
impl OrderBoundary for OrderManager {
    async fn place_order(&self, group: &OrderGroup) -> Result<Vec<OrderId>> {
        let mut placed = Vec::with_capacity(group.levels.len());

        for level in &group.levels {
            info!(
                pair = %group.pair,
                side = %level.side,
                price = %level.price,
                quantity = %level.quantity,
                "placing order"
            );

            let id = self.place_level(&group.pair, level).await?;
            let order = OrderBuilder::new(id.clone(), group.pair.clone())
                .price(level.price)
                .quantity(level.quantity)
                .side(level.side)
                .status(OrderStatus::Live)
                .build();

            self.orders.write().insert(id.clone(), order);
            placed.push(id);
        }

        Ok(placed)
    }

    async fn cancel_orders(&self, pair: &Pair) -> Result<()> {
        let answer = self
            .client
            .rpc_cancel_all_orders(CancelAllOrdersRequest::for_pair(
                pair.base.symbol.as_str(),
                pair.quote.symbol.as_str(),
            ))
            .await?;

        let mut orders = self.orders.write();
        for uuid in &answer.result.cancelled {
            if let Some(order) = orders.get_mut(&OrderId::new(uuid.clone())) {
                order.change_status(OrderStatus::Cancelled);
            }
        }
        if !answer.result.currently_matching.is_empty() {
            warn!(
                %pair,
                matching = answer.result.currently_matching.len(),
                "orders mid-match could not be cancelled"
            );
        }

        Ok(())
    }
}
