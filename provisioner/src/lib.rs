//! Deploys a single compiled contract to an EVM network and reports where it landed.
//!
//! Inputs are resolved once at startup (`steps::read_setup_inputs` and
//! [`config::DeployConfig`]) and handed explicitly to the [`steps::Deployer`],
//! which talks to the chain through a [`client::CreationClient`].

pub mod artifacts;
pub mod client;
pub mod config;
pub mod consts;
pub mod error;
pub mod steps;

pub const PROVISIONER: &str = "PROVISIONER";
