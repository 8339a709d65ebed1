//! Read-only quotes from a deployed SlipageRequester.
//!
//! Each [`QuoteRequest`] names a Balancer pool, the two tokens being swapped and
//! the Chainlink feeds pricing them. The contract is queried with `eth_call`
//! and the answer is turned into an expected vs. actual price comparison.

use std::{fs, path::Path};

use anyhow::{anyhow, Result};
use common::slippage_dir;

pub mod calldata;
mod clients;
pub mod constants;
mod types;

pub use clients::*;
pub use types::*;

/// Reads a suite from `path`, falling back to the bundled `inputs/` directory
/// for bare file names.
pub fn read_suite(path: &Path) -> Result<QuoteSuite> {
    let path = if path.is_file() {
        path.to_path_buf()
    } else {
        slippage_dir().join("inputs").join(path)
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| anyhow!("failed to read quote suite {}: {e}", path.display()))?;

    toml::from_str(&content)
        .map_err(|e| anyhow!("failed to parse quote suite {}: {e}", path.display()))
}
