//! Fixed values for querying a deployed SlipageRequester.

use alloy_primitives::{fixed_bytes, Selector};

/// Selector of the slippage query. Returns
/// `(priceA, priceB, contractSlippage, priceDecimalsA, priceDecimalsB)`.
pub const SLIPPAGE_SELECTOR: Selector = fixed_bytes!("3087bfd8");

/// Selector of the swap amount query. Returns the swap output as its first word.
pub const SWAP_AMOUNT_SELECTOR: Selector = fixed_bytes!("dba9f93c");

/// Suite run when `quote` is invoked without arguments
pub const DEFAULT_SUITE: &str = "polygon.toml";

/// Upper bound on a single `eth_call` round trip
pub const RPC_TIMEOUT_SECONDS: u64 = 30;

/// Printed next to a failed quote
pub const CHECK_INPUTS_HINT: &str = "check the RPC URL, pool_id, contract or feed addresses";
