use thiserror::Error;

/// The only failure the deployment step reports. Network errors, reverts and
/// artifact problems all end up here with their cause chain attached.
#[derive(Debug, Error)]
#[error("deployment of {contract} failed")]
pub struct DeploymentFailure {
    pub contract: String,
    #[source]
    pub source: anyhow::Error,
}
