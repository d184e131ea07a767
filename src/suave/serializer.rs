//! Wire encoding for confidential compute records and requests.
//!
//! ```text
//! record  = 0x42 || rlp([nonce, gasPrice, gas, to, value, data,
//!                        executionNode, confidentialInputsHash, chainId])
//! request = 0x43 || rlp([ rlp([nonce, gasPrice, gas, to, value, data,
//!                              executionNode, confidentialInputsHash, chainId,
//!                              v, r, s]),
//!                         confidentialInputs ])
//! ```
//!
//! `to` and `executionNode` are encoded as the empty string when absent.
//! Decoding is strict: every decoder re-encodes canonically to its input.

use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::rlp::{BufMut, Decodable, Encodable, Header, EMPTY_STRING_CODE};

use crate::suave::types::{
    ConfidentialComputeRecord, ConfidentialComputeRequest, RecordSignature, SuaveError,
    SuaveResult, SuaveTransaction, SuaveTxType,
};

fn optional_address_length(addr: &Option<Address>) -> usize {
    addr.as_ref().map_or(1, |addr| addr.length())
}

fn encode_optional_address(addr: &Option<Address>, out: &mut dyn BufMut) {
    match addr {
        Some(addr) => addr.encode(out),
        None => out.put_u8(EMPTY_STRING_CODE),
    }
}

fn decode_optional_address(buf: &mut &[u8]) -> alloy::rlp::Result<Option<Address>> {
    if buf.first() == Some(&EMPTY_STRING_CODE) {
        *buf = &buf[1..];
        return Ok(None);
    }
    Address::decode(buf).map(Some)
}

/// Decode a list header and return the payload slice, advancing `buf` past it.
fn decode_list<'a>(buf: &mut &'a [u8]) -> alloy::rlp::Result<&'a [u8]> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(alloy::rlp::Error::UnexpectedString);
    }
    if buf.len() < header.payload_length {
        return Err(alloy::rlp::Error::InputTooShort);
    }
    let (payload, rest) = buf.split_at(header.payload_length);
    *buf = rest;
    Ok(payload)
}

fn expect_consumed(payload: &[u8]) -> alloy::rlp::Result<()> {
    if payload.is_empty() {
        Ok(())
    } else {
        Err(alloy::rlp::Error::Custom("trailing bytes in list"))
    }
}

/// Strip the type byte and check it against `expected`.
fn strip_type<'a>(bytes: &'a [u8], expected: SuaveTxType) -> SuaveResult<&'a [u8]> {
    let (&ty, rest) = bytes
        .split_first()
        .ok_or(SuaveError::Decode(alloy::rlp::Error::InputTooShort))?;
    let found = SuaveTxType::try_from(ty)?;
    if found != expected {
        return Err(SuaveError::InvalidTransactionType { expected, found });
    }
    Ok(rest)
}

impl ConfidentialComputeRecord {
    fn fields_len(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas.length()
            + self.to.length()
            + self.value.length()
            + self.input.length()
            + optional_address_length(&self.execution_node)
            + self.confidential_inputs_hash.length()
            + self.chain_id.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
        encode_optional_address(&self.execution_node, out);
        self.confidential_inputs_hash.encode(out);
        self.chain_id.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> alloy::rlp::Result<Self> {
        Ok(Self {
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas: Decodable::decode(buf)?,
            to: TxKind::decode(buf)?,
            value: U256::decode(buf)?,
            input: Bytes::decode(buf)?,
            execution_node: decode_optional_address(buf)?,
            confidential_inputs_hash: B256::decode(buf)?,
            chain_id: Decodable::decode(buf)?,
        })
    }

    fn signed_fields_len(&self, sig: &RecordSignature) -> usize {
        self.fields_len() + u64::from(sig.v).length() + sig.r.length() + sig.s.length()
    }

    /// Record encoding without signature, prefixed with its type byte.
    ///
    /// This is the byte string whose keccak256 is signed.
    pub fn encoded_for_signing(&self) -> Vec<u8> {
        let payload_length = self.fields_len();
        let header = Header {
            list: true,
            payload_length,
        };
        let mut out = Vec::with_capacity(1 + header.length() + payload_length);
        out.put_u8(SuaveTxType::ConfidentialRecord.into());
        header.encode(&mut out);
        self.encode_fields(&mut out);
        out
    }

    /// Decode a type-prefixed unsigned record.
    pub fn decode_for_signing(bytes: &[u8]) -> SuaveResult<Self> {
        let mut buf = strip_type(bytes, SuaveTxType::ConfidentialRecord)?;
        let mut payload = decode_list(&mut buf)?;
        let record = Self::decode_fields(&mut payload)?;
        expect_consumed(payload)?;
        expect_consumed(buf)?;
        Ok(record)
    }
}

impl ConfidentialComputeRequest {
    fn encode_signed_record(&self, out: &mut dyn BufMut) {
        let record = self.record();
        let sig = self.signature();
        Header {
            list: true,
            payload_length: record.signed_fields_len(sig),
        }
        .encode(out);
        record.encode_fields(out);
        u64::from(sig.v).encode(out);
        sig.r.encode(out);
        sig.s.encode(out);
    }

    fn signed_record_length(&self) -> usize {
        let payload_length = self.record().signed_fields_len(self.signature());
        Header {
            list: true,
            payload_length,
        }
        .length()
            + payload_length
    }

    /// Request wire encoding, prefixed with its type byte.
    pub fn encoded(&self) -> Vec<u8> {
        let payload_length = self.signed_record_length() + self.confidential_inputs().length();
        let header = Header {
            list: true,
            payload_length,
        };
        let mut out = Vec::with_capacity(1 + header.length() + payload_length);
        out.put_u8(SuaveTxType::ConfidentialRequest.into());
        header.encode(&mut out);
        self.encode_signed_record(&mut out);
        self.confidential_inputs().encode(&mut out);
        out
    }

    /// Decode a type-prefixed confidential request.
    ///
    /// Fails if the embedded inputs hash does not match the carried inputs.
    pub fn decode(bytes: &[u8]) -> SuaveResult<Self> {
        let mut buf = strip_type(bytes, SuaveTxType::ConfidentialRequest)?;
        let mut outer = decode_list(&mut buf)?;
        expect_consumed(buf)?;

        let mut signed = decode_list(&mut outer)?;
        let record = ConfidentialComputeRecord::decode_fields(&mut signed)?;
        let v = u64::decode(&mut signed)?;
        let r = U256::decode(&mut signed)?;
        let s = U256::decode(&mut signed)?;
        expect_consumed(signed)?;

        let inputs = Bytes::decode(&mut outer)?;
        expect_consumed(outer)?;

        let signature = RecordSignature::from_wire(r, s, v)?;
        Self::new(record, signature, inputs)
    }
}

impl SuaveTransaction {
    /// Type-prefixed wire bytes of either shape.
    pub fn encoded(&self) -> Vec<u8> {
        match self {
            SuaveTransaction::Record(record) => record.encoded_for_signing(),
            SuaveTransaction::Request(request) => request.encoded(),
        }
    }

    /// Decode either shape, dispatching on the type byte.
    pub fn decode(bytes: &[u8]) -> SuaveResult<Self> {
        let ty = bytes
            .first()
            .ok_or(SuaveError::Decode(alloy::rlp::Error::InputTooShort))?;
        match SuaveTxType::try_from(*ty)? {
            SuaveTxType::ConfidentialRecord => {
                ConfidentialComputeRecord::decode_for_signing(bytes).map(SuaveTransaction::Record)
            }
            SuaveTxType::ConfidentialRequest => {
                ConfidentialComputeRequest::decode(bytes).map(SuaveTransaction::Request)
            }
        }
    }
}
