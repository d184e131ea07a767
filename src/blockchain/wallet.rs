//! Key material for transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or explicit hex
//! - Keys are never logged or serialized
//! - `Debug` output is redacted

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::suave::types::{SuaveError, SuaveResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "SUAVE_PRIVATE_KEY";

/// A private key and the account it derives.
#[derive(Clone)]
pub struct LocalAccount {
    signer: PrivateKeySigner,
}

impl LocalAccount {
    /// Create an account from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> SuaveResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| SuaveError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Account loaded");

        Ok(Self { signer })
    }

    /// Load the account from `SUAVE_PRIVATE_KEY`.
    pub fn from_env() -> SuaveResult<Self> {
        Self::from_env_var(PRIVATE_KEY_ENV_VAR)
    }

    /// Load the account from a named environment variable.
    pub fn from_env_var(var_name: &str) -> SuaveResult<Self> {
        let private_key = std::env::var(var_name).map_err(|_| {
            SuaveError::Wallet(format!("Environment variable {} not set", var_name))
        })?;

        Self::from_private_key(&private_key)
    }

    /// The derived account address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The underlying secp256k1 signer.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Generic Ethereum wallet over the same key, used for non-confidential transactions.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl From<PrivateKeySigner> for LocalAccount {
    fn from(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }
}

impl std::fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.signer.address())
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
