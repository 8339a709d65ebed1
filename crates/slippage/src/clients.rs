//! JSON-RPC client for read-only contract calls

use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256};
use log::debug;
use serde_json::Value;

use crate::{
    calldata::{decode_slippage, decode_swap_amount, encode_call},
    constants::RPC_TIMEOUT_SECONDS,
    types::{QueryKind, QuoteError, QuoteOutcome, QuoteRequest, SlippageQuote},
};

const QUOTE_CLIENT: &str = "QUOTE_CLIENT";

/// Issues `eth_call` against whichever endpoint a request names
pub struct QuoteClient {
    client: reqwest::Client,
}

impl QuoteClient {
    pub fn new() -> Result<Self, QuoteError> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(RPC_TIMEOUT_SECONDS))
                .build()?,
        })
    }

    /// `eth_call` at the latest block, returning the raw return data
    pub async fn eth_call(&self, rpc_url: &str, to: Address, data: &Bytes) -> Result<Bytes, QuoteError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [{
                "to": to,
                "data": data
            }, "latest"],
            "id": 1
        });

        debug!(target: QUOTE_CLIENT, "eth_call {to} via {rpc_url}");

        let response = self.client.post(rpc_url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status()));
        }

        let body: Value = response.json().await?;
        parse_rpc_result(&body)
    }

    pub async fn slippage(&self, request: &QuoteRequest) -> Result<SlippageQuote, QuoteError> {
        let data = self
            .eth_call(&request.rpc_url, request.contract, &encode_call(request))
            .await?;
        decode_slippage(&data, request.a_decimals, request.b_decimals)
    }

    pub async fn swap_amount(&self, request: &QuoteRequest) -> Result<U256, QuoteError> {
        let data = self
            .eth_call(&request.rpc_url, request.contract, &encode_call(request))
            .await?;
        decode_swap_amount(&data)
    }

    pub async fn quote(&self, request: &QuoteRequest) -> Result<QuoteOutcome, QuoteError> {
        match request.query {
            QueryKind::Slippage => self.slippage(request).await.map(QuoteOutcome::Slippage),
            QueryKind::SwapAmount => self.swap_amount(request).await.map(QuoteOutcome::SwapAmount),
        }
    }
}

/// Pulls the hex `result` out of a JSON-RPC response body, surfacing an
/// `error` member (e.g. an execution revert) as [`QuoteError::Rpc`].
pub fn parse_rpc_result(body: &Value) -> Result<Bytes, QuoteError> {
    if let Some(error) = body.get("error") {
        return Err(QuoteError::Rpc {
            code: error["code"].as_i64().unwrap_or_default(),
            message: error["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    let result = body["result"]
        .as_str()
        .ok_or_else(|| QuoteError::Malformed(format!("no hex `result` in {body}")))?;

    result
        .parse::<Bytes>()
        .map_err(|e| QuoteError::Malformed(format!("`result` is not hex: {e}")))
}
