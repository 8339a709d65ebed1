use std::{future::IntoFuture, time::Duration};

use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionRequest;
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Url;

use crate::{
    config::DeployConfig,
    consts::{RECEIPT_POLL_INTERVAL, RPC_REQUEST_TIMEOUT},
};

const CHAIN_CLIENT: &str = "CHAIN_CLIENT";

/// The chain side of a deployment: submit a contract creation and wait for
/// the network to confirm it.
#[async_trait]
pub trait CreationClient: Send + Sync {
    async fn chain_id(&self) -> anyhow::Result<u64>;

    /// Signs and broadcasts a creation transaction carrying `creation_code`.
    async fn submit(&self, creation_code: Bytes) -> anyhow::Result<TxHash>;

    /// Waits until `tx_hash` has a receipt and returns the created contract's
    /// address. There is no overall timeout; the wait ends on confirmation
    /// or on an rpc error.
    async fn confirm(&self, tx_hash: TxHash) -> anyhow::Result<Address>;
}

/// [`CreationClient`] over JSON-RPC, signing locally with the configured key.
///
/// Every request to the endpoint is bounded by `request_timeout`, including
/// each individual receipt poll.
pub struct EvmCreationClient {
    rpc_url: Url,
    deployer: Address,
    wallet: EthereumWallet,
    request_timeout: Duration,
}

impl EvmCreationClient {
    pub fn new(cfg: &DeployConfig) -> Self {
        Self {
            rpc_url: cfg.rpc_url.clone(),
            deployer: cfg.deployer(),
            wallet: EthereumWallet::from(cfg.signer.clone()),
            request_timeout: RPC_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    async fn bounded<T, E>(
        &self,
        method: &str,
        request: impl IntoFuture<Output = Result<T, E>>,
    ) -> anyhow::Result<T>
    where
        E: Into<anyhow::Error>,
    {
        match tokio::time::timeout(self.request_timeout, request.into_future()).await {
            Ok(response) => response.map_err(Into::into),
            Err(_) => bail!(
                "{method} to {} timed out after {:?}",
                self.rpc_url.host_str().unwrap_or_default(),
                self.request_timeout
            ),
        }
    }
}

#[async_trait]
impl CreationClient for EvmCreationClient {
    async fn chain_id(&self) -> anyhow::Result<u64> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());
        self.bounded("eth_chainId", provider.get_chain_id()).await
    }

    async fn submit(&self, creation_code: Bytes) -> anyhow::Result<TxHash> {
        // nonce, gas, fees and chain id are filled in from the node
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(self.wallet.clone())
            .on_http(self.rpc_url.clone());

        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(creation_code);

        let pending = self
            .bounded("eth_sendRawTransaction", provider.send_transaction(tx))
            .await?;
        let tx_hash = *pending.tx_hash();

        info!(target: CHAIN_CLIENT, "creation transaction sent from {}: {tx_hash}", self.deployer);

        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> anyhow::Result<Address> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());

        loop {
            let receipt = self
                .bounded(
                    "eth_getTransactionReceipt",
                    provider.get_transaction_receipt(tx_hash),
                )
                .await?;
            let Some(receipt) = receipt else {
                debug!(target: CHAIN_CLIENT, "no receipt for {tx_hash} yet, polling again in {RECEIPT_POLL_INTERVAL:?}");
                tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
                continue;
            };

            if !receipt.status() {
                bail!(
                    "creation transaction {tx_hash} reverted in block {}",
                    receipt
                        .block_number()
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "<unknown>".to_string())
                );
            }

            return receipt
                .contract_address()
                .ok_or_else(|| anyhow!("receipt for {tx_hash} carries no contract address"));
        }
    }
}
