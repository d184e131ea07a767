//! Confidential record signing.
//!
//! A record is hashed over its type-prefixed encoding, signed with secp256k1,
//! and its recovery id is normalized from the legacy `{27, 28}` form to the
//! `{0, 1}` form SUAVE nodes expect on the wire.

use alloy::primitives::{keccak256, Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::suave::types::{
    ConfidentialComputeRecord, ConfidentialComputeRequest, RecordSignature, SuaveError,
    SuaveResult, SuaveTransaction, SuaveTxType,
};

/// Map a legacy recovery id to the SUAVE wire form: 27 becomes 0, anything else 1.
pub fn normalize_recovery_id(legacy_v: u64) -> u8 {
    if legacy_v == 27 {
        0
    } else {
        1
    }
}

impl ConfidentialComputeRecord {
    /// keccak256 of the record encoding.
    pub fn signature_hash(&self) -> B256 {
        keccak256(self.encoded_for_signing())
    }
}

impl ConfidentialComputeRequest {
    /// Recover the address that signed the embedded record.
    ///
    /// The signature covers the record encoding, not the request encoding.
    pub fn recover_signer(&self) -> SuaveResult<Address> {
        let hash = self.record().signature_hash();
        self.signature()
            .to_alloy()
            .recover_address_from_prehash(&hash)
            .map_err(|e| SuaveError::Signing(format!("Signature recovery failed: {}", e)))
    }
}

/// Sign a confidential compute record.
///
/// Refuses anything not tagged [`SuaveTxType::ConfidentialRecord`].
pub fn sign_confidential_record(
    transaction: &SuaveTransaction,
    signer: &PrivateKeySigner,
) -> SuaveResult<RecordSignature> {
    let record = match transaction {
        SuaveTransaction::Record(record) => record,
        other => {
            return Err(SuaveError::InvalidTransactionType {
                expected: SuaveTxType::ConfidentialRecord,
                found: other.tx_type(),
            })
        }
    };

    let hash = record.signature_hash();
    let signature = signer
        .sign_hash_sync(&hash)
        .map_err(|e| SuaveError::Signing(e.to_string()))?;

    let legacy_v = 27 + u64::from(signature.v());
    let v = normalize_recovery_id(legacy_v);

    tracing::debug!(
        signer = %signer.address(),
        hash = %hash,
        v = v,
        "Signed confidential record"
    );

    Ok(RecordSignature {
        r: signature.r(),
        s: signature.s(),
        v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes, TxKind, U256};

    // Anvil's first account.
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn signer() -> PrivateKeySigner {
        TEST_PRIVATE_KEY.parse().unwrap()
    }

    fn record() -> ConfidentialComputeRecord {
        ConfidentialComputeRecord {
            nonce: 0,
            gas_price: 1,
            gas: 21_000,
            to: TxKind::Call(address!("0x780675d71ebe3d3ef05fae379063071147dd3aee")),
            value: U256::ZERO,
            input: Bytes::new(),
            execution_node: None,
            confidential_inputs_hash: keccak256([0xdeu8, 0xad, 0xbe, 0xef]),
            chain_id: 16_813_125,
        }
    }

    #[test]
    fn test_normalize_recovery_id() {
        assert_eq!(normalize_recovery_id(27), 0);
        assert_eq!(normalize_recovery_id(28), 1);
        for v in [0, 1, 26, 29, 35, 36, u64::MAX] {
            assert_eq!(normalize_recovery_id(v), 1);
        }
    }

    #[test]
    fn test_signature_recovers_signer() {
        let record = record();
        let sig = sign_confidential_record(&SuaveTransaction::Record(record.clone()), &signer())
            .unwrap();
        assert!(sig.v <= 1);

        let recovered = sig
            .to_alloy()
            .recover_address_from_prehash(&record.signature_hash())
            .unwrap();
        assert_eq!(
            recovered,
            address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let tx = SuaveTransaction::Record(record());
        let a = sign_confidential_record(&tx, &signer()).unwrap();
        let b = sign_confidential_record(&tx, &signer()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_request_tagged_transaction() {
        let record = record();
        let sig = sign_confidential_record(&SuaveTransaction::Record(record.clone()), &signer())
            .unwrap();
        let request = ConfidentialComputeRequest::new(
            record,
            sig,
            Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
        )
        .unwrap();

        let result = sign_confidential_record(&SuaveTransaction::Request(request), &signer());
        assert!(matches!(
            result,
            Err(SuaveError::InvalidTransactionType {
                expected: SuaveTxType::ConfidentialRecord,
                found: SuaveTxType::ConfidentialRequest,
            })
        ));
    }
}
