//! JSON-RPC client for the locally-run trading daemon.

use futures::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::core::config::{CoinConfig, DaemonConfig};
use crate::core::{Error, Result};
use crate::mm2::model::*;

pub struct Mm2Client {
    client: reqwest::Client,
    endpoint: String,
    userpass: String,
}

impl Mm2Client {
    pub fn new(config: &DaemonConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            userpass: config.userpass.clone(),
        }
    }

    /// POST one enveloped request and decode the answer. Transport
    /// failures, daemon-reported errors, and shape mismatches map to the
    /// matching error variants; a missing required field is never
    /// silently defaulted.
    async fn call<B: Serialize, A: DeserializeOwned>(
        &self,
        method: &'static str,
        body: B,
    ) -> Result<A> {
        let request = RpcRequest {
            method,
            userpass: self.userpass.clone(),
            body,
        };

        debug!(method, "rpc call");
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let value: serde_json::Value = response.json().await?;

        decode_answer(method, value)
    }

    pub async fn rpc_electrum(&self, request: ElectrumRequest) -> Result<ElectrumAnswer> {
        self.call("electrum", request).await
    }

    pub async fn rpc_orderbook(&self, request: OrderbookRequest) -> Result<OrderbookAnswer> {
        self.call("orderbook", request).await
    }

    pub async fn rpc_balance(&self, request: BalanceRequest) -> Result<BalanceAnswer> {
        self.call("my_balance", request).await
    }

    pub async fn rpc_version(&self) -> Result<VersionAnswer> {
        self.call("version", Empty {}).await
    }

    pub async fn rpc_setprice(&self, request: SetpriceRequest) -> Result<SetpriceAnswer> {
        self.call("setprice", request).await
    }

    pub async fn rpc_cancel_order(&self, request: CancelOrderRequest) -> Result<CancelOrderAnswer> {
        self.call("cancel_order", request).await
    }

    pub async fn rpc_buy(&self, request: BuyRequest) -> Result<BuyAnswer> {
        self.call("buy", request).await
    }

    pub async fn rpc_cancel_all_orders(
        &self,
        request: CancelAllOrdersRequest,
    ) -> Result<CancelAllOrdersAnswer> {
        self.call("cancel_all_orders", request).await
    }

    /// Ask the daemon to shut itself down.
    pub async fn rpc_stop(&self) -> Result<()> {
        self.call::<_, serde_json::Value>("stop", Empty {}).await?;
        Ok(())
    }

    /// Activate the configured coins on the daemon. Activation is
    /// independent per coin, so failures are logged and the rest proceed.
    pub async fn enable_coins(&self, coins: &[CoinConfig]) -> Result<()> {
        let requests = coins.iter().map(|coin| {
            self.rpc_electrum(ElectrumRequest {
                coin: coin.ticker.clone(),
                servers: coin
                    .electrum_servers
                    .iter()
                    .map(|url| ElectrumServer { url: url.clone() })
                    .collect(),
                tx_history: coin.tx_history,
            })
        });

        for (coin, outcome) in coins.iter().zip(join_all(requests).await) {
            match outcome {
                Ok(answer) => {
                    info!(coin = %coin.ticker, address = %answer.address, "coin enabled")
                }
                Err(e) => warn!(coin = %coin.ticker, error = %e, "coin activation failed"),
            }
        }

        Ok(())
    }
}

/// Decode one RPC answer. A top-level `error` field wins over any decode
/// attempt; everything else must match the expected shape exactly.
fn decode_answer<A: DeserializeOwned>(method: &str, value: serde_json::Value) -> Result<A> {
    if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
        return Err(Error::Remote(format!("{method}: {error}")));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::MalformedResponse(format!("{method}: {e}")))
}
