//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::Mutex;

use alloy::primitives::{keccak256, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use suave_wallet::{LocalAccount, SuaveError, SuaveResult, WalletClient};

/// Anvil's first account.
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn test_account() -> LocalAccount {
    LocalAccount::from_private_key(TEST_PRIVATE_KEY).unwrap()
}

/// Values the mock client fills in, regardless of what the request already holds.
#[derive(Debug, Clone)]
pub struct FilledDefaults {
    pub nonce: u64,
    pub gas: u64,
    pub gas_price: u128,
    pub chain_id: Option<u64>,
}

impl Default for FilledDefaults {
    fn default() -> Self {
        Self {
            nonce: 5,
            gas: 99_999,
            gas_price: 77,
            chain_id: None,
        }
    }
}

/// In-memory client recording every call.
#[derive(Default)]
pub struct MockClient {
    pub defaults: FilledDefaults,
    pub fail_prepare: bool,
    pub fail_send: bool,
    pub prepared: Mutex<Vec<TransactionRequest>>,
    pub submitted: Mutex<Vec<Bytes>>,
}

impl MockClient {
    pub fn with_defaults(defaults: FilledDefaults) -> Self {
        Self {
            defaults,
            ..Default::default()
        }
    }

    pub fn submitted(&self) -> Vec<Bytes> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletClient for MockClient {
    async fn prepare_defaults(&self, tx: &TransactionRequest) -> SuaveResult<TransactionRequest> {
        self.prepared.lock().unwrap().push(tx.clone());
        if self.fail_prepare {
            return Err(SuaveError::Transport("connection refused".to_string()));
        }

        let mut prepared = tx.clone();
        prepared.nonce = Some(self.defaults.nonce);
        prepared.gas = Some(self.defaults.gas);
        prepared.gas_price = Some(self.defaults.gas_price);
        prepared.chain_id = self.defaults.chain_id;
        Ok(prepared)
    }

    async fn send_raw_transaction(&self, encoded: &[u8]) -> SuaveResult<TxHash> {
        if self.fail_send {
            return Err(SuaveError::Rpc("nonce too low".to_string()));
        }
        self.submitted
            .lock()
            .unwrap()
            .push(Bytes::copy_from_slice(encoded));
        Ok(keccak256(encoded))
    }
}
