//! Generic wallet client: default-filling and raw transaction submission.
//!
//! # Responsibilities
//! - Define the [`WalletClient`] seam the SUAVE signer is composed over
//! - Connect to JSON-RPC endpoints with per-call timeouts
//! - Fill nonce, gas and gas price from chain state
//! - Submit signed bytes via `eth_sendRawTransaction`

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::config::ChainConfig;
use crate::suave::types::{SuaveError, SuaveResult};

/// The operations the SUAVE signer needs from an underlying client.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Return `tx` with unset `nonce`, `gas`, `gas_price` and `chain_id` filled in.
    ///
    /// `tx.from` must be set.
    async fn prepare_defaults(&self, tx: &TransactionRequest) -> SuaveResult<TransactionRequest>;

    /// Submit signed transaction bytes and return the transaction hash.
    async fn send_raw_transaction(&self, encoded: &[u8]) -> SuaveResult<TxHash>;
}

#[async_trait]
impl<T: WalletClient + ?Sized> WalletClient for Arc<T> {
    async fn prepare_defaults(&self, tx: &TransactionRequest) -> SuaveResult<TransactionRequest> {
        (**self).prepare_defaults(tx).await
    }

    async fn send_raw_transaction(&self, encoded: &[u8]) -> SuaveResult<TxHash> {
        (**self).send_raw_transaction(encoded).await
    }
}

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// JSON-RPC client with failover for reads.
#[derive(Clone)]
pub struct RpcClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: ChainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a new client.
    ///
    /// Fails only if the primary URL is malformed. Invalid failover URLs are
    /// skipped with a warning.
    pub fn new(config: &ChainConfig) -> SuaveResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            SuaveError::Transport(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as DynProvider);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            chain_id = config.chain_id,
            failovers = providers.len() - 1,
            "RPC client initialized"
        );

        Ok(Self {
            providers,
            config: config.clone(),
            timeout_duration,
        })
    }

    /// Run `call` against each provider in order until one succeeds.
    async fn with_failover<T, E, F, Fut>(&self, what: &'static str, call: F) -> SuaveResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, op = what, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, op = what, "RPC timeout, trying next provider");
                }
            }
        }
        Err(SuaveError::Transport(format!(
            "All RPC providers failed to {}",
            what
        )))
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> SuaveResult<u64> {
        self.with_failover("get chain id", |p| async move { p.get_chain_id().await })
            .await
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> SuaveResult<()> {
        let actual = self.get_chain_id().await?;
        if actual != self.config.chain_id {
            return Err(SuaveError::Transport(format!(
                "Chain ID mismatch: expected {}, got {}",
                self.config.chain_id, actual
            )));
        }
        Ok(())
    }

    /// Get the pending transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> SuaveResult<u64> {
        self.with_failover("get transaction count", |p| async move {
            p.get_transaction_count(address).pending().await
        })
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> SuaveResult<u128> {
        self.with_failover("get gas price", |p| async move { p.get_gas_price().await })
            .await
    }

    /// Estimate the gas limit for a request.
    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> SuaveResult<u64> {
        self.with_failover("estimate gas", |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

#[async_trait]
impl WalletClient for RpcClient {
    async fn prepare_defaults(&self, tx: &TransactionRequest) -> SuaveResult<TransactionRequest> {
        let mut prepared = tx.clone();
        let from = prepared.from.ok_or(SuaveError::MissingField("from"))?;

        if prepared.nonce.is_none() {
            prepared.nonce = Some(self.get_transaction_count(from).await?);
        }
        if prepared.gas_price.is_none() {
            prepared.gas_price = Some(self.get_gas_price().await?);
        }
        if prepared.gas.is_none() {
            prepared.gas = Some(self.estimate_gas(&prepared).await?);
        }
        if prepared.chain_id.is_none() {
            prepared.chain_id = Some(self.config.chain_id);
        }

        tracing::debug!(
            from = %from,
            nonce = ?prepared.nonce,
            gas = ?prepared.gas,
            gas_price = ?prepared.gas_price,
            "Prepared transaction defaults"
        );

        Ok(prepared)
    }

    /// Submitted to the primary provider only; resubmitting to a failover after
    /// an ambiguous timeout could double-broadcast.
    async fn send_raw_transaction(&self, encoded: &[u8]) -> SuaveResult<TxHash> {
        let provider = &self.providers[0];
        match timeout(self.timeout_duration, provider.send_raw_transaction(encoded)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(SuaveError::Rpc(e.to_string())),
            Err(_) => Err(SuaveError::Rpc(format!(
                "eth_sendRawTransaction timed out after {} seconds",
                self.config.rpc_timeout_secs
            ))),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ChainConfig {
        ChainConfig {
            chain_id: 31337, // Anvil default
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 2,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = RpcClient::new(&test_config()).unwrap();
        assert_eq!(client.config().chain_id, 31337);
    }

    #[test]
    fn test_invalid_primary_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        assert!(RpcClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_rpc_failover() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        config.failover_urls.push("not a url".to_string());

        let client = RpcClient::new(&config).unwrap();
        assert_eq!(client.providers.len(), 2);

        // Both endpoints refuse connections.
        let result = client.get_chain_id().await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("All RPC providers failed"));
    }

    #[tokio::test]
    async fn test_prepare_defaults_requires_from() {
        let client = RpcClient::new(&test_config()).unwrap();
        let result = client.prepare_defaults(&TransactionRequest::default()).await;
        assert!(matches!(result, Err(SuaveError::MissingField("from"))));
    }

    #[tokio::test]
    async fn test_send_raw_transaction_surfaces_rpc_error() {
        let client = RpcClient::new(&test_config()).unwrap();
        let result = client.send_raw_transaction(&[0x43, 0xc0]).await;
        assert!(matches!(result, Err(SuaveError::Rpc(_))));
    }
}
