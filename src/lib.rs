//! SUAVE confidential compute wallet library.
//!
//! Signs confidential compute transactions (a signed record wrapped into a
//! request that carries the raw confidential inputs) and submits them over a
//! generic JSON-RPC client. Non-confidential requests fall through to the
//! standard Ethereum signer.

pub mod blockchain;
pub mod chain;
pub mod config;
pub mod observability;
pub mod suave;

pub use blockchain::{LocalAccount, RpcClient, WalletClient};
pub use chain::{SuaveChain, SUAVE_RIGIL};
pub use config::WalletConfig;
pub use suave::{
    ConfidentialRequest, SuaveError, SuaveResult, SuaveTransactionRequest, SuaveWallet,
};
