//! SUAVE wallet: confidential compute signing and submission over a generic client.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, TxKind};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::client::WalletClient;
use crate::blockchain::wallet::LocalAccount;
use crate::chain::SUAVE_RIGIL;
use crate::suave::signer::sign_confidential_record;
use crate::suave::types::{
    ConfidentialComputeRecord, ConfidentialComputeRequest, ConfidentialRequest, SuaveError,
    SuaveResult, SuaveTransaction, SuaveTransactionRequest,
};

/// Signs and submits SUAVE transactions with one account over a generic client.
pub struct SuaveWallet<C> {
    client: C,
    account: LocalAccount,
    /// Chain id used when neither caller nor client supplies one.
    chain_id: u64,
}

impl<C: WalletClient> SuaveWallet<C> {
    pub fn new(client: C, account: LocalAccount, chain_id: u64) -> Self {
        Self {
            client,
            account,
            chain_id,
        }
    }

    /// Wallet defaulting to the Rigil testnet chain id.
    pub fn rigil(client: C, account: LocalAccount) -> Self {
        Self::new(client, account, SUAVE_RIGIL.id)
    }

    pub fn address(&self) -> Address {
        self.account.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Sign a request into wire-ready bytes.
    ///
    /// Confidential requests are signed as a record and wrapped into a
    /// confidential request; anything else goes to the generic signer.
    pub async fn sign_transaction(&self, request: &SuaveTransactionRequest) -> SuaveResult<Bytes> {
        match request {
            SuaveTransactionRequest::Confidential(req) => self.sign_confidential(req),
            SuaveTransactionRequest::Standard(tx) => self.sign_standard(tx).await,
        }
    }

    /// Fill defaults through the client, sign, and submit via `eth_sendRawTransaction`.
    ///
    /// Caller-supplied `gas`, `gas_price` and `chain_id` win over filled values.
    /// Defaults are always filled for the wallet's own account; a `from` naming
    /// any other account is rejected.
    pub async fn send_transaction(&self, mut request: SuaveTransactionRequest) -> SuaveResult<TxHash> {
        let caller = request.tx().clone();
        if let Some(from) = caller.from {
            if from != self.address() {
                return Err(SuaveError::Wallet(format!(
                    "from {} does not match signing account {}",
                    from,
                    self.address()
                )));
            }
        }

        let mut to_prepare = caller.clone();
        to_prepare.from = Some(self.address());
        let prepared = self.client.prepare_defaults(&to_prepare).await?;

        *request.tx_mut() = self.merge_prepared(&caller, &prepared);

        let signed = self.sign_transaction(&request).await?;
        let tx_hash = self.client.send_raw_transaction(&signed).await?;

        tracing::info!(
            tx_hash = %tx_hash,
            from = %self.address(),
            confidential = request.is_confidential(),
            "Transaction submitted"
        );

        Ok(tx_hash)
    }

    /// Build the signable record for a confidential request.
    ///
    /// Returns the record together with the inputs it commits to.
    pub fn build_record(
        &self,
        req: &ConfidentialRequest,
    ) -> SuaveResult<(ConfidentialComputeRecord, Bytes)> {
        let inputs = req.confidential_inputs.clone().unwrap_or_default();
        let tx = &req.tx;

        let record = ConfidentialComputeRecord {
            nonce: tx.nonce.ok_or(SuaveError::MissingField("nonce"))?,
            gas_price: tx.gas_price.ok_or(SuaveError::MissingField("gasPrice"))?,
            gas: tx.gas.ok_or(SuaveError::MissingField("gas"))?,
            to: tx.to.unwrap_or(TxKind::Create),
            value: tx.value.unwrap_or_default(),
            input: tx.input.input().cloned().unwrap_or_default(),
            execution_node: req.execution_node,
            confidential_inputs_hash: keccak256(&inputs),
            chain_id: tx.chain_id.unwrap_or(self.chain_id),
        };

        Ok((record, inputs))
    }

    fn sign_confidential(&self, req: &ConfidentialRequest) -> SuaveResult<Bytes> {
        let (record, inputs) = self.build_record(req)?;
        let signature = sign_confidential_record(
            &SuaveTransaction::Record(record.clone()),
            self.account.signer(),
        )?;

        tracing::debug!(
            chain_id = record.chain_id,
            nonce = record.nonce,
            inputs_hash = %record.confidential_inputs_hash,
            "Wrapping signed record into confidential request"
        );

        let request = ConfidentialComputeRequest::new(record, signature, inputs)?;
        Ok(request.encoded().into())
    }

    async fn sign_standard(&self, tx: &TransactionRequest) -> SuaveResult<Bytes> {
        let envelope = tx
            .clone()
            .build(&self.account.ethereum_wallet())
            .await
            .map_err(|e| SuaveError::Signing(e.to_string()))?;
        Ok(envelope.encoded_2718().into())
    }

    fn merge_prepared(
        &self,
        caller: &TransactionRequest,
        prepared: &TransactionRequest,
    ) -> TransactionRequest {
        let mut merged = caller.clone();
        merged.from = Some(self.address());
        merged.nonce = prepared.nonce.or(caller.nonce);
        merged.gas = caller.gas.or(prepared.gas);
        merged.gas_price = caller.gas_price.or(prepared.gas_price);
        merged.chain_id = caller
            .chain_id
            .or(prepared.chain_id)
            .or(Some(self.chain_id));
        merged
    }
}

impl<C> std::fmt::Debug for SuaveWallet<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuaveWallet")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
