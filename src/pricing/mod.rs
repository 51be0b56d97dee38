//! Pricing - reference mid price derived from the daemon's orderbook.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::core::traits::PriceSource;
use crate::core::types::{Pair, Price};
use crate::core::{Error, Result};
use crate::mm2::Mm2Client;
use crate::mm2::model::{OrderbookAnswer, OrderbookRequest};

/// Mid price oracle backed by the daemon's orderbook: the midpoint of the
/// best bid and best ask.
pub struct OrderbookMid {
    client: Arc<Mm2Client>,
}

impl OrderbookMid {
    pub fn new(client: Arc<Mm2Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PriceSource for OrderbookMid {
    async fn get_price(&self, pair: &Pair) -> Result<Price> {
        let answer = self
            .client
            .rpc_orderbook(OrderbookRequest {
                base: pair.base.symbol.as_str().to_string(),
                rel: pair.quote.symbol.as_str().to_string(),
            })
            .await?;

        mid_price(pair, &answer)
    }
}

/// Midpoint of the best bid and best ask; `NotFound` when either side of
/// the book is empty.
fn mid_price(pair: &Pair, book: &OrderbookAnswer) -> Result<Price> {
    let best_bid = book.bids.iter().map(|entry| entry.price).max();
    let best_ask = book.asks.iter().map(|entry| entry.price).min();

    match (best_bid, best_ask) {
        (Some(bid), Some(ask)) => Ok(Price::new((bid + ask) / Decimal::TWO)),
        _ => Err(Error::NotFound(format!("{pair} orderbook has an empty side"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(price: u32) -> serde_json::Value {
        json!({
            "coin": "RICK",
            "address": "R9o9xTocqr6CeEDGDH6mEYpwLoMz6jNjMW",
            "price": price,
            "numutxos": 1,
            "avevolume": 10,
            "maxvolume": 10,
            "depth": 0,
            "pubkey": "0000",
            "age": 1,
            "zcredits": 0,
        })
    }

    fn book(bids: Vec<u32>, asks: Vec<u32>) -> OrderbookAnswer {
        let value = json!({
            "askdepth": 0,
            "biddepth": 0,
            "netid": 9999,
            "numasks": asks.len(),
            "numbids": bids.len(),
            "timestamp": 1_558_000_000u64,
            "bids": bids.into_iter().map(entry).collect::<Vec<_>>(),
            "asks": asks.into_iter().map(entry).collect::<Vec<_>>(),
            "base": "RICK",
            "rel": "MORTY",
        });
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_mid_is_the_best_bid_ask_midpoint() {
        let pair = Pair::of("RICK", "MORTY");
        let book = book(vec![98, 99], vec![103, 101]);

        assert_eq!(mid_price(&pair, &book).unwrap(), Price::new(100));
    }

    #[test]
    fn test_empty_side_is_not_found() {
        let pair = Pair::of("RICK", "MORTY");

        let err = mid_price(&pair, &book(vec![], vec![101])).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = mid_price(&pair, &book(vec![99], vec![])).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
