use alloy::primitives::{hex, Address, Bytes};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::trace;
use url::Url;

use crate::error::{MarketCfgError, Result};

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP client for an Ethereum JSON-RPC node.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    url: Url,
}

impl RpcClient {
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    /// Send one request and return its `result`.
    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });
        trace!(method, "rpc request");

        let resp = self.client.post(self.url.clone()).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(MarketCfgError::Http {
                status,
                message: body,
            });
        }

        let envelope: RpcResponse<T> = resp.json().await?;
        if let Some(err) = envelope.error {
            return Err(MarketCfgError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        envelope.result.ok_or_else(|| MarketCfgError::Rpc {
            code: 0,
            message: format!("{method}: response has neither result nor error"),
        })
    }

    /// `eth_call` against the latest block.
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Bytes> {
        let params = json!([
            { "to": to.to_string(), "data": hex::encode_prefixed(data) },
            "latest"
        ]);
        let raw: String = self.request("eth_call", params).await?;
        Ok(Bytes::from(hex::decode(raw)?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}
