//! Generic chain collaborators the SUAVE signer is layered on.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key)
//!     → wallet.rs (key loading, account derivation)
//! Config (RPC URLs, chain id)
//!     → client.rs (default-filling, raw transaction submission)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or confidential inputs
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod wallet;

pub use client::{RpcClient, WalletClient};
pub use wallet::LocalAccount;
