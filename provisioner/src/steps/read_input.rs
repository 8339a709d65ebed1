use common::{provisioner_dir, SolidityInputs};
use log::info;
use serde::Deserialize;
use std::{collections::BTreeMap, fs};

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionerInputs {
    pub default_network: String,
    pub networks: BTreeMap<String, NetworkInputs>,
    pub solidity: SolidityInputs,
}

/// One deployment target. The endpoint is either written inline (`url`) or
/// read from the environment at startup (`url_env`), never both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInputs {
    pub url: Option<String>,
    pub url_env: Option<String>,
    pub chain_id: Option<u64>,
}

const READ_INPUTS: &str = "READ_INPUTS";

pub fn read_setup_inputs(input_file: &str) -> anyhow::Result<ProvisionerInputs> {
    let input_dir = provisioner_dir()
        .join("src")
        .join("inputs")
        .join(input_file);
    info!(target: READ_INPUTS, "reading inputs from {}...", input_dir.display());

    let parameters = fs::read_to_string(&input_dir)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", input_dir.display()))?;

    let inputs = parse_setup_inputs(&parameters)?;

    info!(target: READ_INPUTS, "networks from inputs: {:?}", inputs.networks.keys().collect::<Vec<_>>());

    Ok(inputs)
}

pub fn parse_setup_inputs(parameters: &str) -> anyhow::Result<ProvisionerInputs> {
    let inputs: ProvisionerInputs = toml::from_str(parameters)?;

    if !inputs.networks.contains_key(&inputs.default_network) {
        anyhow::bail!(
            "default network `{}` is not one of the configured networks",
            inputs.default_network
        );
    }

    Ok(inputs)
}
