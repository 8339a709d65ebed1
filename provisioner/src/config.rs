//! Deployment configuration resolved at startup.
//!
//! Network inputs come from `src/inputs/networks.toml`, secrets from the
//! environment (optionally via `.env`). The environment lookup is passed in so
//! resolution can be exercised without touching process state.

use std::{env, fmt, str::FromStr};

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{anyhow, bail, Result};
use common::SECRET_KEY_ENV;
use reqwest::Url;

use crate::steps::ProvisionerInputs;

/// Everything the deployer needs to reach and pay on one network.
#[derive(Clone)]
pub struct DeployConfig {
    pub network: String,
    pub rpc_url: Url,
    pub chain_id: Option<u64>,
    pub signer: PrivateKeySigner,
}

impl DeployConfig {
    /// Resolves `network` (or the inputs' default) against the process environment.
    pub fn from_env(inputs: &ProvisionerInputs, network: Option<&str>) -> Result<Self> {
        Self::resolve(inputs, network, |key| env::var(key).ok())
    }

    pub fn resolve<F>(inputs: &ProvisionerInputs, network: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = network.unwrap_or(&inputs.default_network);

        let network_inputs = inputs.networks.get(network).ok_or_else(|| {
            anyhow!(
                "unknown network `{network}`. configured networks: {}",
                inputs.networks.keys().cloned().collect::<Vec<_>>().join(", ")
            )
        })?;

        let raw_url = match (&network_inputs.url, &network_inputs.url_env) {
            (Some(url), None) => url.clone(),
            (None, Some(var)) => lookup(var.as_str()).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                anyhow!("network `{network}` reads its rpc url from `{var}`, which is not set")
            })?,
            (Some(_), Some(_)) => {
                bail!("network `{network}` sets both `url` and `url_env`; keep exactly one")
            }
            (None, None) => bail!("network `{network}` has no `url` or `url_env`"),
        };

        let rpc_url = Url::parse(raw_url.trim())
            .map_err(|e| anyhow!("invalid rpc url for network `{network}`: {e}"))?;
        if !matches!(rpc_url.scheme(), "http" | "https") {
            bail!(
                "rpc url for network `{network}` must be http(s), got `{}`",
                rpc_url.scheme()
            );
        }

        let secret = lookup(SECRET_KEY_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("`{SECRET_KEY_ENV}` is not set; it must hold the deployer private key"))?;
        // the parse error is dropped so the key never reaches the logs
        let signer = PrivateKeySigner::from_str(secret.trim())
            .map_err(|_| anyhow!("`{SECRET_KEY_ENV}` is not a valid hex encoded private key"))?;

        Ok(Self {
            network: network.to_string(),
            rpc_url,
            chain_id: network_inputs.chain_id,
            signer,
        })
    }

    pub fn deployer(&self) -> Address {
        self.signer.address()
    }
}

impl fmt::Debug for DeployConfig {
    // rpc urls often embed an access key in the path, so only the host is shown
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("network", &self.network)
            .field("rpc_host", &self.rpc_url.host_str().unwrap_or_default())
            .field("chain_id", &self.chain_id)
            .field("deployer", &self.deployer())
            .finish()
    }
}
