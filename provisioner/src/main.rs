use std::path::PathBuf;

use clap::Parser;
use common::{artifacts_dir, DEFAULT_CONTRACT};
use log::info;
use provisioner::{
    client::EvmCreationClient,
    config::DeployConfig,
    consts::NETWORK_INPUTS_FILE,
    steps::{self, Deployer},
    PROVISIONER,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// network to deploy to, as named in `provisioner/src/inputs/networks.toml`.
    ///
    /// defaults to the `default_network` of that file.
    #[arg(long, env = "DEPLOY_NETWORK")]
    network: Option<String>,

    /// contract to deploy. either a bare contract name or a fully
    /// qualified `contracts/Source.sol:Name`.
    #[arg(long, default_value = DEFAULT_CONTRACT)]
    contract: String,

    /// directory holding the compiled artifacts. defaults to `artifacts/`
    /// at the workspace root.
    #[arg(long)]
    artifacts: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let inputs = steps::read_setup_inputs(NETWORK_INPUTS_FILE)?;
    let deploy_cfg = DeployConfig::from_env(&inputs, cli.network.as_deref())?;

    info!(target: PROVISIONER, "using {deploy_cfg:?}");

    let client = EvmCreationClient::new(&deploy_cfg);
    let deployer = Deployer::new(
        client,
        cli.artifacts.unwrap_or_else(artifacts_dir),
        inputs.solidity,
    )
    .with_expected_chain_id(deploy_cfg.chain_id);

    let deployment = deployer.deploy(&cli.contract).await?;

    println!("Deployed to {}", deployment.address);

    Ok(())
}
