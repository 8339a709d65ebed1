//! Quote requests and results

use std::fmt;

use alloy_primitives::{Address, Selector, B256, U256};
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{SLIPPAGE_SELECTOR, SWAP_AMOUNT_SELECTOR};

/// Which view of the contract to call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    #[default]
    Slippage,
    SwapAmount,
}

impl QueryKind {
    pub fn default_selector(self) -> Selector {
        match self {
            QueryKind::Slippage => SLIPPAGE_SELECTOR,
            QueryKind::SwapAmount => SWAP_AMOUNT_SELECTOR,
        }
    }
}

/// One priced pair: a Balancer pool swap checked against two Chainlink feeds
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    /// Label used in the report, e.g. `USDC / WMATIC`
    pub pair: String,
    pub rpc_url: String,
    /// Deployed SlipageRequester
    pub contract: Address,
    #[serde(default)]
    pub query: QueryKind,
    /// Overrides the query's default selector
    #[serde(default)]
    pub function: Option<Selector>,
    pub pool_id: B256,
    /// Balancer swap kind: 0 = GIVEN_IN, 1 = GIVEN_OUT
    pub kind: u8,
    pub token_a: Address,
    pub token_b: Address,
    pub a_decimals: u32,
    pub b_decimals: u32,
    /// Swap amount in token A base units
    pub amount: u128,
    pub sender: Address,
    pub feed_a: Address,
    pub feed_b: Address,
}

impl QuoteRequest {
    pub fn selector(&self) -> Selector {
        self.function.unwrap_or_else(|| self.query.default_selector())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSuite {
    pub quotes: Vec<QuoteRequest>,
}

/// Feed implied price of the swap input versus what the pool pays out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlippageQuote {
    pub expected: f64,
    pub actual: f64,
    pub slippage: f64,
    pub slip_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    Slippage(SlippageQuote),
    SwapAmount(U256),
}

pub struct QuoteReport<'a> {
    pub pair: &'a str,
    pub outcome: &'a QuoteOutcome,
}

impl fmt::Display for QuoteReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.pair)?;
        match self.outcome {
            QuoteOutcome::Slippage(q) => {
                writeln!(f, " Expected($):\t {}", q.expected)?;
                writeln!(f, " Actual  ($):\t {}", q.actual)?;
                writeln!(f, " Slippage($):\t {}", q.slippage)?;
                write!(f, " Slippage(%):\t {:.2}%", q.slip_percent)
            }
            QuoteOutcome::SwapAmount(amount) => write!(f, " swapAmount:\t {amount}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("rpc transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed rpc response: {0}")]
    Malformed(String),
    #[error("failed to decode call result: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    #[error("{0} does not fit the price computation")]
    Overflow(&'static str),
    #[error("expected price is zero, slippage is undefined")]
    ZeroExpectedPrice,
}
