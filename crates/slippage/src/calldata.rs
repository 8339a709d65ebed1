//! Calldata for the SlipageRequester views and decoding of their results.
//!
//! Both views take the same eight static words:
//! `(bytes32 poolId, uint256 kind, address tokenA, address tokenB,
//! uint256 amount, address sender, address feedA, address feedB)`.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolValue;

use crate::types::{QuoteError, QuoteRequest, SlippageQuote};

pub fn encode_call(request: &QuoteRequest) -> Bytes {
    let args = (
        request.pool_id,
        U256::from(request.kind),
        request.token_a,
        request.token_b,
        U256::from(request.amount),
        request.sender,
        request.feed_a,
        request.feed_b,
    );

    let mut data = request.selector().to_vec();
    data.extend(args.abi_encode_params());
    data.into()
}

/// Prices are scaled down by the feed decimals plus the token decimals before
/// comparing; the contract's own slippage word is ignored.
pub fn decode_slippage(
    data: &[u8],
    a_decimals: u32,
    b_decimals: u32,
) -> Result<SlippageQuote, QuoteError> {
    let (price_a, price_b, _contract_slippage, price_decimals_a, price_decimals_b) =
        <(U256, U256, U256, U256, U256)>::abi_decode_params(data, false)?;

    let expected = scaled(price_a, price_decimals_a, a_decimals)?;
    let actual = scaled(price_b, price_decimals_b, b_decimals)?;

    if expected == 0.0 {
        return Err(QuoteError::ZeroExpectedPrice);
    }

    let slippage = expected - actual;

    Ok(SlippageQuote {
        expected,
        actual,
        slippage,
        slip_percent: slippage / expected * 100.0,
    })
}

pub fn decode_swap_amount(data: &[u8]) -> Result<U256, QuoteError> {
    let (amount,) = <(U256,)>::abi_decode_params(data, false)?;
    Ok(amount)
}

fn scaled(price: U256, price_decimals: U256, token_decimals: u32) -> Result<f64, QuoteError> {
    let exponent = u32::try_from(price_decimals)
        .ok()
        .and_then(|d| d.checked_add(token_decimals))
        .and_then(|d| i32::try_from(d).ok())
        .ok_or(QuoteError::Overflow("price decimals"))?;

    // decimal strings of any U256 parse into a (possibly rounded) f64
    let price: f64 = price
        .to_string()
        .parse()
        .map_err(|_| QuoteError::Overflow("price"))?;

    Ok(price / 10f64.powi(exponent))
}
