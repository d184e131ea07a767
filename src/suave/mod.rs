//! SUAVE confidential compute transactions.
//!
//! # Data Flow
//! ```text
//! SuaveTransactionRequest
//!     ├─ Standard     → generic Ethereum signer (EIP-2718 envelope)
//!     └─ Confidential → types.rs     (record: inputs replaced by keccak256(inputs))
//!                     → signer.rs    (keccak256(0x42 || rlp(record)), v normalized to {0,1})
//!                     → serializer.rs (0x43 || rlp([signed record, inputs]))
//!                     → wallet.rs    (eth_sendRawTransaction via WalletClient)
//! ```

pub mod serializer;
pub mod signer;
pub mod types;
pub mod wallet;

pub use signer::{normalize_recovery_id, sign_confidential_record};
pub use types::{
    ConfidentialComputeRecord, ConfidentialComputeRequest, ConfidentialRequest, RecordSignature,
    SuaveError, SuaveResult, SuaveTransaction, SuaveTransactionRequest, SuaveTxType,
};
pub use wallet::SuaveWallet;
