use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// contract deployed when no other name is requested
pub const DEFAULT_CONTRACT: &str = "SlipageRequester";

/// env var holding the hex encoded deployer private key
pub const SECRET_KEY_ENV: &str = "SK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidityInputs {
    pub version: String,
    pub optimizer: OptimizerInputs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerInputs {
    pub enabled: bool,
    pub runs: u32,
}

pub fn workspace_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("failed to cd to workspace root dir")
        .to_path_buf()
}

/// hardhat style compilation output, `artifacts/contracts/<Source>.sol/<Name>.json`
pub fn artifacts_dir() -> PathBuf {
    workspace_dir().join("artifacts")
}

pub fn provisioner_dir() -> PathBuf {
    workspace_dir().join("provisioner")
}

pub fn slippage_dir() -> PathBuf {
    workspace_dir().join("crates").join("slippage")
}
