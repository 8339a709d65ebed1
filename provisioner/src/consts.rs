use std::time::Duration;

pub const NETWORK_INPUTS_FILE: &str = "networks.toml";

/// interval between `eth_getTransactionReceipt` polls while waiting for confirmation
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// upper bound for a single rpc request. the receipt wait as a whole is unbounded
pub const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// hardhat keeps compiler inputs/outputs here, next to the contract artifacts
pub const BUILD_INFO_DIR: &str = "build-info";
