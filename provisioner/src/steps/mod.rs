mod deploy_contract;
mod read_input;

pub use deploy_contract::{DeploymentResult, Deployer};
pub use read_input::*;
