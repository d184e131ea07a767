//! Confidential-compute transaction types and error definitions.

use alloy::primitives::{keccak256, Address, Bytes, TxKind, B256, U256};
use alloy::rpc::types::TransactionRequest;
use thiserror::Error;

/// EIP-2718 type byte of a SUAVE transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SuaveTxType {
    /// Signable form committing to the hash of the confidential inputs.
    ConfidentialRecord = 0x42,
    /// Wire form carrying the signed record and the raw confidential inputs.
    ConfidentialRequest = 0x43,
}

impl SuaveTxType {
    /// Name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            SuaveTxType::ConfidentialRecord => "ConfidentialRecord",
            SuaveTxType::ConfidentialRequest => "ConfidentialRequest",
        }
    }
}

impl From<SuaveTxType> for u8 {
    fn from(ty: SuaveTxType) -> Self {
        ty as u8
    }
}

impl TryFrom<u8> for SuaveTxType {
    type Error = SuaveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x42 => Ok(SuaveTxType::ConfidentialRecord),
            0x43 => Ok(SuaveTxType::ConfidentialRequest),
            other => Err(SuaveError::UnknownTxType(other)),
        }
    }
}

impl std::fmt::Display for SuaveTxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:#04x})", self.name(), *self as u8)
    }
}

/// Errors that can occur while signing or submitting SUAVE transactions.
#[derive(Debug, Error)]
pub enum SuaveError {
    /// A transaction of the wrong type reached a type-specific operation.
    #[error("transaction.type must be {expected}, got {found}")]
    InvalidTransactionType {
        expected: SuaveTxType,
        found: SuaveTxType,
    },

    /// Type byte is not a SUAVE confidential transaction type.
    #[error("Unknown SUAVE transaction type {0:#04x}")]
    UnknownTxType(u8),

    /// A field required by the record encoding was not set.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The signing primitive failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Key parsing or loading failed.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Default-filling round-trip failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Raw transaction submission failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Wire bytes are not a canonical SUAVE encoding.
    #[error("Decode error: {0}")]
    Decode(#[from] alloy::rlp::Error),

    /// Recovery id outside `{0, 1}`.
    #[error("Invalid recovery id {0}, expected 0 or 1")]
    InvalidRecoveryId(u64),

    /// The committed inputs hash does not match the carried inputs.
    #[error("Confidential inputs hash mismatch: committed {committed}, computed {computed}")]
    InputsHashMismatch { committed: B256, computed: B256 },
}

/// Result type for SUAVE operations.
pub type SuaveResult<T> = Result<T, SuaveError>;

/// User-facing confidential compute request.
///
/// Standard fields live in the embedded [`TransactionRequest`]; only the
/// confidential payload and the execution node are SUAVE specific.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfidentialRequest {
    /// Standard transaction fields.
    pub tx: TransactionRequest,
    /// Node asked to run the confidential computation.
    pub execution_node: Option<Address>,
    /// Off-chain payload. `None` is signed as an empty byte string.
    pub confidential_inputs: Option<Bytes>,
}

impl ConfidentialRequest {
    pub fn new(tx: TransactionRequest) -> Self {
        Self {
            tx,
            ..Default::default()
        }
    }

    pub fn with_execution_node(mut self, node: Address) -> Self {
        self.execution_node = Some(node);
        self
    }

    pub fn with_confidential_inputs(mut self, inputs: impl Into<Bytes>) -> Self {
        self.confidential_inputs = Some(inputs.into());
        self
    }
}

/// Transaction request accepted by [`crate::suave::SuaveWallet`].
#[derive(Debug, Clone, PartialEq)]
pub enum SuaveTransactionRequest {
    /// Signed as a confidential record and wrapped into a confidential request.
    Confidential(ConfidentialRequest),
    /// Handed to the generic Ethereum signer unchanged.
    Standard(TransactionRequest),
}

impl SuaveTransactionRequest {
    /// Standard fields of the request.
    pub fn tx(&self) -> &TransactionRequest {
        match self {
            SuaveTransactionRequest::Confidential(req) => &req.tx,
            SuaveTransactionRequest::Standard(tx) => tx,
        }
    }

    pub fn tx_mut(&mut self) -> &mut TransactionRequest {
        match self {
            SuaveTransactionRequest::Confidential(req) => &mut req.tx,
            SuaveTransactionRequest::Standard(tx) => tx,
        }
    }

    pub fn is_confidential(&self) -> bool {
        matches!(self, SuaveTransactionRequest::Confidential(_))
    }
}

impl From<ConfidentialRequest> for SuaveTransactionRequest {
    fn from(req: ConfidentialRequest) -> Self {
        SuaveTransactionRequest::Confidential(req)
    }
}

impl From<TransactionRequest> for SuaveTransactionRequest {
    fn from(tx: TransactionRequest) -> Self {
        SuaveTransactionRequest::Standard(tx)
    }
}

/// The signable confidential compute record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidentialComputeRecord {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas: u64,
    pub to: TxKind,
    pub value: U256,
    pub input: Bytes,
    pub execution_node: Option<Address>,
    pub confidential_inputs_hash: B256,
    pub chain_id: u64,
}

/// Record signature with the recovery id normalized to `{0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSignature {
    pub r: U256,
    pub s: U256,
    pub v: u8,
}

impl RecordSignature {
    /// Build a signature from wire values, rejecting recovery ids outside `{0, 1}`.
    pub fn from_wire(r: U256, s: U256, v: u64) -> SuaveResult<Self> {
        match v {
            0 | 1 => Ok(Self { r, s, v: v as u8 }),
            other => Err(SuaveError::InvalidRecoveryId(other)),
        }
    }

    /// Convert into alloy's signature type for recovery.
    pub fn to_alloy(&self) -> alloy::primitives::Signature {
        alloy::primitives::Signature::new(self.r, self.s, self.v == 1)
    }
}

/// Confidential compute request as submitted to the network.
///
/// Only constructible from the raw inputs, so the committed hash always
/// matches the carried bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidentialComputeRequest {
    record: ConfidentialComputeRecord,
    signature: RecordSignature,
    confidential_inputs: Bytes,
}

impl ConfidentialComputeRequest {
    /// Wrap a signed record together with the inputs it commits to.
    pub fn new(
        record: ConfidentialComputeRecord,
        signature: RecordSignature,
        confidential_inputs: Bytes,
    ) -> SuaveResult<Self> {
        let computed = keccak256(&confidential_inputs);
        if computed != record.confidential_inputs_hash {
            return Err(SuaveError::InputsHashMismatch {
                committed: record.confidential_inputs_hash,
                computed,
            });
        }
        Ok(Self {
            record,
            signature,
            confidential_inputs,
        })
    }

    pub fn record(&self) -> &ConfidentialComputeRecord {
        &self.record
    }

    pub fn signature(&self) -> &RecordSignature {
        &self.signature
    }

    pub fn confidential_inputs(&self) -> &Bytes {
        &self.confidential_inputs
    }
}

/// Tagged union over the two serializable SUAVE transaction shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuaveTransaction {
    Record(ConfidentialComputeRecord),
    Request(ConfidentialComputeRequest),
}

impl SuaveTransaction {
    pub fn tx_type(&self) -> SuaveTxType {
        match self {
            SuaveTransaction::Record(_) => SuaveTxType::ConfidentialRecord,
            SuaveTransaction::Request(_) => SuaveTxType::ConfidentialRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(inputs: &[u8]) -> ConfidentialComputeRecord {
        ConfidentialComputeRecord {
            nonce: 0,
            gas_price: 1,
            gas: 21_000,
            to: TxKind::Call(Address::ZERO),
            value: U256::ZERO,
            input: Bytes::new(),
            execution_node: None,
            confidential_inputs_hash: keccak256(inputs),
            chain_id: 16_813_125,
        }
    }

    #[test]
    fn test_tx_type_bytes() {
        assert_eq!(u8::from(SuaveTxType::ConfidentialRecord), 0x42);
        assert_eq!(u8::from(SuaveTxType::ConfidentialRequest), 0x43);
        assert_eq!(
            SuaveTxType::try_from(0x43).unwrap(),
            SuaveTxType::ConfidentialRequest
        );
        assert!(matches!(
            SuaveTxType::try_from(0x02),
            Err(SuaveError::UnknownTxType(0x02))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = SuaveError::InvalidTransactionType {
            expected: SuaveTxType::ConfidentialRecord,
            found: SuaveTxType::ConfidentialRequest,
        };
        assert_eq!(
            err.to_string(),
            "transaction.type must be ConfidentialRecord (0x42), got ConfidentialRequest (0x43)"
        );
    }

    #[test]
    fn test_request_rejects_mismatched_inputs() {
        let sig = RecordSignature {
            r: U256::from(1),
            s: U256::from(2),
            v: 0,
        };
        let inputs = Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]);

        assert!(ConfidentialComputeRequest::new(record(&inputs), sig, inputs.clone()).is_ok());

        let result = ConfidentialComputeRequest::new(record(b"other"), sig, inputs);
        assert!(matches!(result, Err(SuaveError::InputsHashMismatch { .. })));
    }

    #[test]
    fn test_signature_from_wire() {
        assert!(RecordSignature::from_wire(U256::from(1), U256::from(1), 1).is_ok());
        assert!(matches!(
            RecordSignature::from_wire(U256::from(1), U256::from(1), 27),
            Err(SuaveError::InvalidRecoveryId(27))
        ));
    }

    #[test]
    fn test_request_union_accessors() {
        let mut tx = TransactionRequest::default();
        tx.nonce = Some(7);
        let req: SuaveTransactionRequest = ConfidentialRequest::new(tx.clone()).into();
        assert!(req.is_confidential());
        assert_eq!(req.tx().nonce, Some(7));

        let standard: SuaveTransactionRequest = tx.into();
        assert!(!standard.is_confidential());
    }
}
