use std::path::PathBuf;

use alloy_primitives::Address;
use anyhow::ensure;
use common::SolidityInputs;
use log::{debug, info, warn};

use crate::{
    artifacts::{load_artifact, read_build_settings, ContractArtifact},
    client::CreationClient,
    error::DeploymentFailure,
};

const CONTRACT_DEPLOYMENT: &str = "CONTRACT_DEPLOYMENT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    pub contract_name: String,
    pub address: Address,
}

/// Deploys one contract per call. Calls are not idempotent: every successful
/// call creates a new contract instance.
pub struct Deployer<C> {
    client: C,
    artifacts_dir: PathBuf,
    solidity: SolidityInputs,
    expected_chain_id: Option<u64>,
}

impl<C: CreationClient> Deployer<C> {
    pub fn new(client: C, artifacts_dir: PathBuf, solidity: SolidityInputs) -> Self {
        Self {
            client,
            artifacts_dir,
            solidity,
            expected_chain_id: None,
        }
    }

    /// Refuse to submit anything unless the endpoint reports this chain id.
    pub fn with_expected_chain_id(mut self, chain_id: Option<u64>) -> Self {
        self.expected_chain_id = chain_id;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn deploy(&self, contract_name: &str) -> Result<DeploymentResult, DeploymentFailure> {
        self.try_deploy(contract_name)
            .await
            .map_err(|source| DeploymentFailure {
                contract: contract_name.to_string(),
                source,
            })
    }

    async fn try_deploy(&self, contract_name: &str) -> anyhow::Result<DeploymentResult> {
        info!(target: CONTRACT_DEPLOYMENT, "deploying {contract_name}...");

        let artifact = load_artifact(&self.artifacts_dir, contract_name)?;
        self.check_compiler_settings(&artifact);
        let creation_code = artifact.creation_code()?;

        if let Some(expected) = self.expected_chain_id {
            let actual = self.client.chain_id().await?;
            ensure!(
                actual == expected,
                "rpc endpoint serves chain id {actual}, expected {expected}"
            );
        }

        let tx_hash = self.client.submit(creation_code).await?;
        info!(target: CONTRACT_DEPLOYMENT, "{} creation submitted: {tx_hash}", artifact.fully_qualified_name());

        let address = self.client.confirm(tx_hash).await?;
        info!(target: CONTRACT_DEPLOYMENT, "{} confirmed at {address}", artifact.contract_name);

        Ok(DeploymentResult {
            contract_name: artifact.contract_name,
            address,
        })
    }

    // mismatches are reported, not fatal: the artifact on disk is what gets deployed
    fn check_compiler_settings(&self, artifact: &ContractArtifact) {
        match read_build_settings(artifact) {
            Ok(Some(settings)) => {
                for mismatch in settings.mismatches(&self.solidity) {
                    warn!(target: CONTRACT_DEPLOYMENT, "{} was compiled with {mismatch}", artifact.contract_name);
                }
            }
            Ok(None) => {
                debug!(target: CONTRACT_DEPLOYMENT, "no build info next to {}", artifact.path.display())
            }
            Err(e) => {
                warn!(target: CONTRACT_DEPLOYMENT, "could not read build info for {}: {e}", artifact.contract_name)
            }
        }
    }
}
