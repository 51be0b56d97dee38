//! Strategy engine - turns a quoting configuration and a reference price
//! into the set of order levels that should be resting in the market.

pub mod refresh;

pub use refresh::{RefreshLoop, SweepReport};

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::traits::PriceSource;
use crate::core::types::{Pair, Price, Quantity, Side, Spread};
use crate::core::{Error, Result};
use crate::orders::{OrderGroup, OrderLevel};

/// How to quote one pair: distance off the mid, size per level, and which
/// side(s) to rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketMakingStrategy {
    pub pair: Pair,
    pub spread: Spread,
    pub quantity: Quantity,
    pub side: Side,
}

/// Holds one configured strategy per trading pair and computes the quote
/// levels for a pair given a reference price. The engine exclusively owns
/// the registry; callers read through the accessors.
pub struct StrategyEngine {
    registry: HashMap<Pair, MarketMakingStrategy>,
    price_source: Arc<dyn PriceSource>,
}

impl StrategyEngine {
    pub fn new(price_source: Arc<dyn PriceSource>) -> Self {
        Self {
            registry: HashMap::new(),
            price_source,
        }
    }

    /// Insert or overwrite the registry entry for the strategy's pair.
    /// Last write wins; never fails.
    pub fn add_strategy(&mut self, strategy: MarketMakingStrategy) {
        let pair = strategy.pair.clone();
        self.add_strategy_for(pair, strategy);
    }

    pub fn add_strategy_for(&mut self, pair: Pair, strategy: MarketMakingStrategy) {
        self.registry.insert(pair, strategy);
    }

    pub fn get_strategy(&self, pair: &Pair) -> Result<&MarketMakingStrategy> {
        self.registry
            .get(pair)
            .ok_or_else(|| Error::NotFound(format!("no strategy registered for {pair}")))
    }

    /// Read-only view of the registry; iteration order is unspecified.
    pub fn strategies(&self) -> &HashMap<Pair, MarketMakingStrategy> {
        &self.registry
    }

    /// Buy-side level at `mid * (1 - spread)`.
    pub fn make_bid(&self, mid: Price, spread: Spread, quantity: Quantity) -> OrderLevel {
        let modifier = Spread::ONE - spread;
        OrderLevel {
            price: mid * modifier,
            quantity,
            side: Side::Buy,
        }
    }

    /// Sell-side level at `mid * (1 + spread)`.
    pub fn make_ask(&self, mid: Price, spread: Spread, quantity: Quantity) -> OrderLevel {
        let modifier = Spread::ONE + spread;
        OrderLevel {
            price: mid * modifier,
            quantity,
            side: Side::Sell,
        }
    }

    /// The desired quote state for one pair at the given reference price.
    /// A two-sided strategy quotes the bid first, then the ask; the order
    /// is part of the group's equality contract.
    pub fn create_order_group(
        &self,
        pair: &Pair,
        strategy: &MarketMakingStrategy,
        mid: Price,
    ) -> OrderGroup {
        let levels = match strategy.side {
            Side::Buy => vec![self.make_bid(mid, strategy.spread, strategy.quantity)],
            Side::Sell => vec![self.make_ask(mid, strategy.spread, strategy.quantity)],
            Side::Both => vec![
                self.make_bid(mid, strategy.spread, strategy.quantity),
                self.make_ask(mid, strategy.spread, strategy.quantity),
            ],
        };

        OrderGroup {
            pair: pair.clone(),
            levels,
        }
    }

    /// Convenience form that fetches the mid from the price source first.
    /// Propagates whatever error the source raises.
    pub async fn create_order_group_at_market(
        &self,
        pair: &Pair,
        strategy: &MarketMakingStrategy,
    ) -> Result<OrderGroup> {
        let mid = self.price_source.get_price(pair).await?;
        Ok(self.create_order_group(pair, strategy, mid))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StaticPrices;
    use super::*;

    fn strategy(side: Side) -> MarketMakingStrategy {
        MarketMakingStrategy {
            pair: Pair::of("A", "B"),
            spread: Spread::from_f64(0.01),
            quantity: Quantity::new(10),
            side,
        }
    }

    fn engine() -> StrategyEngine {
        StrategyEngine::new(StaticPrices::single(Pair::of("A", "B"), Price::new(100)))
    }

    #[test]
    fn test_buy_strategy_quotes_a_single_bid() {
        let engine = engine();
        let strat = strategy(Side::Buy);
        let pair = strat.pair.clone();
        let group = engine.create_order_group(&pair, &strat, Price::new(100));

        assert_eq!(group.levels.len(), 1);
        assert_eq!(group.levels[0].side, Side::Buy);
    }

    #[test]
    fn test_sell_strategy_quotes_a_single_ask() {
        let engine = engine();
        let strat = strategy(Side::Sell);
        let pair = strat.pair.clone();
        let group = engine.create_order_group(&pair, &strat, Price::new(100));

        assert_eq!(group.levels.len(), 1);
        assert_eq!(group.levels[0].side, Side::Sell);
    }

    #[test]
    fn test_two_sided_strategy_quotes_bid_then_ask() {
        let engine = engine();
        let strat = strategy(Side::Both);
        let pair = strat.pair.clone();
        let group = engine.create_order_group(&pair, &strat, Price::new(100));

        // spread 0.01 around a mid of 100: 99 bid, 101 ask, bid first
        let expected = OrderGroup {
            pair,
            levels: vec![
                OrderLevel {
                    price: Price::new(99),
                    quantity: Quantity::new(10),
                    side: Side::Buy,
                },
                OrderLevel {
                    price: Price::new(101),
                    quantity: Quantity::new(10),
                    side: Side::Sell,
                },
            ],
        };
        assert_eq!(group, expected);
    }

    #[test]
    fn test_add_strategy_overwrites_prior_entry() {
        let mut engine = engine();
        let pair = Pair::of("A", "B");

        engine.add_strategy(strategy(Side::Buy));
        engine.add_strategy(strategy(Side::Sell));

        assert_eq!(engine.strategies().len(), 1);
        assert_eq!(engine.get_strategy(&pair).unwrap().side, Side::Sell);
    }

    #[test]
    fn test_get_strategy_for_unknown_pair_is_not_found() {
        let engine = engine();
        let err = engine.get_strategy(&Pair::of("X", "Y")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_order_group_at_market_uses_the_price_source() {
        let engine = engine();
        let strat = strategy(Side::Both);
        let pair = strat.pair.clone();

        let group = engine
            .create_order_group_at_market(&pair, &strat)
            .await
            .unwrap();

        assert_eq!(group.levels[0].price, Price::new(99));
        assert_eq!(group.levels[1].price, Price::new(101));
    }

    #[tokio::test]
    async fn test_order_group_at_market_propagates_missing_price() {
        let engine = engine();
        let strat = MarketMakingStrategy {
            pair: Pair::of("X", "Y"),
            ..strategy(Side::Both)
        };

        let err = engine
            .create_order_group_at_market(&Pair::of("X", "Y"), &strat)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
