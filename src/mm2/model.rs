//! Wire models for the daemon's JSON-RPC surface.
//!
//! Every call posts a flat JSON object carrying a `method`/`userpass`
//! envelope plus the request fields. Answers with a top-level `error`
//! field are surfaced as [`Error::Remote`](crate::core::Error::Remote)
//! before decoding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The `{"method": ..., "userpass": ...}` envelope wrapped around every
/// request body.
#[derive(Debug, Serialize)]
pub struct RpcRequest<T: Serialize> {
    pub method: &'static str,
    pub userpass: String,
    #[serde(flatten)]
    pub body: T,
}

/// Empty request body (version, stop).
#[derive(Debug, Serialize)]
pub struct Empty {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectrumServer {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ElectrumRequest {
    pub coin: String,
    pub servers: Vec<ElectrumServer>,
    pub tx_history: bool,
}

#[derive(Debug, Deserialize)]
pub struct ElectrumAnswer {
    pub address: String,
    pub balance: String,
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct OrderbookRequest {
    pub base: String,
    pub rel: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderbookEntry {
    pub coin: String,
    pub address: String,
    pub price: Decimal,
    #[serde(rename = "numutxos")]
    pub num_utxos: u64,
    #[serde(rename = "avevolume")]
    pub ave_volume: Decimal,
    #[serde(rename = "maxvolume")]
    pub max_volume: Decimal,
    pub depth: Decimal,
    #[serde(rename = "pubkey")]
    pub pub_key: String,
    pub age: i64,
    pub zcredits: u64,
}

#[derive(Debug, Deserialize)]
pub struct OrderbookAnswer {
    #[serde(rename = "askdepth")]
    pub ask_depth: Decimal,
    #[serde(rename = "biddepth")]
    pub bid_depth: Decimal,
    #[serde(rename = "netid")]
    pub net_id: u64,
    #[serde(rename = "numasks")]
    pub num_asks: u64,
    #[serde(rename = "numbids")]
    pub num_bids: u64,
    pub timestamp: u64,
    pub bids: Vec<OrderbookEntry>,
    pub asks: Vec<OrderbookEntry>,
    pub base: String,
    pub rel: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceRequest {
    pub coin: String,
}

#[derive(Debug, Deserialize)]
pub struct BalanceAnswer {
    pub address: String,
    /// String-encoded on the wire, like all daemon amounts outside the
    /// orderbook
    pub balance: String,
    pub coin: String,
}

#[derive(Debug, Deserialize)]
pub struct VersionAnswer {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct SetpriceRequest {
    pub base: String,
    pub rel: String,
    pub price: Decimal,
    pub volume: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_previous: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SetpriceResult {
    pub rel: String,
    pub base: String,
    pub price: String,
    pub uuid: String,
    pub started_swaps: Vec<String>,
    pub max_base_vol: String,
    pub min_base_vol: String,
    pub created_at: u64,
    pub matches: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SetpriceAnswer {
    pub result: SetpriceResult,
}

#[derive(Debug, Serialize)]
pub struct CancelOrderRequest {
    pub uuid: String,
}

/// The daemon answers `cancel_order` with an empty object.
#[derive(Debug, Deserialize)]
pub struct CancelOrderAnswer {}

#[derive(Debug, Serialize)]
pub struct BuyRequest {
    pub base: String,
    pub rel: String,
    pub price: Decimal,
    pub volume: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BuyResult {
    pub rel: String,
    pub base: String,
    pub action: String,
    pub uuid: String,
    pub method: String,
    pub rel_amount: String,
    pub base_amount: String,
    pub dest_pub_key: String,
    #[serde(rename = "sender_pubkey")]
    pub sender_pub_key: String,
}

#[derive(Debug, Deserialize)]
pub struct BuyAnswer {
    pub result: BuyResult,
}

#[derive(Debug, Serialize)]
pub struct CancelByData {
    pub base: String,
    pub rel: String,
}

#[derive(Debug, Serialize)]
pub struct CancelBy {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CancelByData>,
}

#[derive(Debug, Serialize)]
pub struct CancelAllOrdersRequest {
    pub cancel_by: CancelBy,
}

impl CancelAllOrdersRequest {
    /// Cancel every order resting on one pair.
    pub fn for_pair(base: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            cancel_by: CancelBy {
                kind: "Pair".to_string(),
                data: Some(CancelByData {
                    base: base.into(),
                    rel: rel.into(),
                }),
            },
        }
    }

    /// Cancel every order the daemon holds for us.
    pub fn all() -> Self {
        Self {
            cancel_by: CancelBy {
                kind: "All".to_string(),
                data: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelAllOrdersResult {
    pub cancelled: Vec<String>,
    pub currently_matching: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelAllOrdersAnswer {
    pub result: CancelAllOrdersResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_carries_method_and_userpass() {
        let req = RpcRequest {
            method: "orderbook",
            userpass: "pass".to_string(),
            body: OrderbookRequest {
                base: "RICK".to_string(),
                rel: "MORTY".to_string(),
            },
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "method": "orderbook",
                "userpass": "pass",
                "base": "RICK",
                "rel": "MORTY",
            })
        );
    }

    #[test]
    fn test_setprice_omits_unset_optionals() {
        let req = SetpriceRequest {
            base: "RICK".to_string(),
            rel: "MORTY".to_string(),
            price: Decimal::new(101, 0),
            volume: Decimal::new(10, 0),
            max: None,
            cancel_previous: None,
        };

        let value = serde_json::to_value(&req).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("max"));
        assert!(!obj.contains_key("cancel_previous"));

        let req = SetpriceRequest {
            max: Some(true),
            cancel_previous: Some(false),
            ..req
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["max"], json!(true));
        assert_eq!(value["cancel_previous"], json!(false));
    }

    #[test]
    fn test_cancel_all_orders_request_nesting() {
        let req = CancelAllOrdersRequest::for_pair("RICK", "MORTY");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "cancel_by": {
                    "type": "Pair",
                    "data": { "base": "RICK", "rel": "MORTY" },
                }
            })
        );

        let value = serde_json::to_value(CancelAllOrdersRequest::all()).unwrap();
        assert_eq!(value, json!({ "cancel_by": { "type": "All" } }));
    }

    #[test]
    fn test_buy_result_decodes() {
        let value = json!({
            "result": {
                "rel": "MORTY",
                "base": "RICK",
                "action": "Buy",
                "uuid": "d4b6e8d4-5f8a-4a39-a9d9-84af9f6a7a5d",
                "method": "buy",
                "rel_amount": "1.0",
                "base_amount": "0.5",
                "dest_pub_key": "0000",
                "sender_pubkey": "1111",
            }
        });

        let answer: BuyAnswer = serde_json::from_value(value).unwrap();
        assert_eq!(answer.result.action, "Buy");
        assert_eq!(answer.result.base, "RICK");
    }
}
