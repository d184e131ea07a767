//! SUAVE wallet CLI
//!
//! Signs and submits confidential compute requests with the key in
//! `SUAVE_PRIVATE_KEY`.

use std::path::PathBuf;

use alloy::hex;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::rpc::types::TransactionRequest;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use suave_wallet::config::{load_config, WalletConfig};
use suave_wallet::observability::init_logging;
use suave_wallet::suave::{ConfidentialComputeRecord, SuaveTransaction, SuaveTxType};
use suave_wallet::{
    ConfidentialRequest, LocalAccount, RpcClient, SuaveChain, SuaveTransactionRequest, SuaveWallet,
};

#[derive(Parser)]
#[command(name = "suave-wallet")]
#[command(about = "Sign and submit SUAVE confidential compute transactions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the account address derived from SUAVE_PRIVATE_KEY
    Address,

    /// Sign a transaction offline and print the raw hex
    Sign(TxArgs),

    /// Fill defaults over RPC, sign, and submit
    Send(TxArgs),

    /// Decode a confidential record or request and print it as JSON
    Decode {
        /// Hex-encoded confidential record or signed request
        raw: String,
    },
}

#[derive(Args)]
struct TxArgs {
    /// Recipient (contract creation if omitted)
    #[arg(long)]
    to: Option<Address>,

    /// Value in wei
    #[arg(long, default_value = "0")]
    value: U256,

    /// Call data (hex)
    #[arg(long)]
    data: Option<Bytes>,

    /// Confidential inputs (hex)
    #[arg(long)]
    confidential_inputs: Option<Bytes>,

    /// Execution node address (defaults to signer.execution_node)
    #[arg(long)]
    execution_node: Option<Address>,

    #[arg(long)]
    nonce: Option<u64>,

    /// Gas limit
    #[arg(long)]
    gas: Option<u64>,

    /// Gas price in wei
    #[arg(long)]
    gas_price: Option<u128>,

    #[arg(long)]
    chain_id: Option<u64>,

    /// Sign as a plain Ethereum transaction
    #[arg(long)]
    standard: bool,
}

impl TxArgs {
    fn into_request(self, config: &WalletConfig) -> SuaveTransactionRequest {
        let mut tx = TransactionRequest::default();
        tx.to = Some(self.to.map_or(TxKind::Create, TxKind::Call));
        tx.value = Some(self.value);
        tx.nonce = self.nonce;
        tx.gas = self.gas;
        tx.gas_price = self.gas_price;
        tx.chain_id = self.chain_id;
        if let Some(data) = self.data {
            tx.input = data.into();
        }

        if self.standard {
            tx.chain_id = tx.chain_id.or(Some(config.chain.chain_id));
            return SuaveTransactionRequest::Standard(tx);
        }

        SuaveTransactionRequest::Confidential(ConfidentialRequest {
            tx,
            execution_node: self.execution_node.or(config.signer.execution_node),
            confidential_inputs: self.confidential_inputs,
        })
    }
}

fn record_json(record: &ConfidentialComputeRecord) -> Value {
    json!({
        "type": SuaveTxType::ConfidentialRecord.name(),
        "nonce": record.nonce,
        "gasPrice": record.gas_price.to_string(),
        "gas": record.gas,
        "to": record.to.to(),
        "value": record.value.to_string(),
        "data": record.input,
        "executionNode": record.execution_node,
        "confidentialInputsHash": record.confidential_inputs_hash,
        "chainId": record.chain_id,
        "chain": SuaveChain::from_id(record.chain_id),
    })
}

fn open_wallet(config: &WalletConfig) -> Result<SuaveWallet<RpcClient>, Box<dyn std::error::Error>> {
    let account = LocalAccount::from_env()?;
    let client = RpcClient::new(&config.chain)?;
    if let Some(chain) = SuaveChain::from_id(config.chain.chain_id) {
        tracing::info!(chain = chain.name, chain_id = chain.id, "Using known SUAVE chain");
    }
    Ok(SuaveWallet::new(client, account, config.chain.chain_id))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WalletConfig::default(),
    };

    init_logging(&config.observability.log_level);

    match cli.command {
        Commands::Address => {
            let account = LocalAccount::from_env()?;
            println!("{}", account.address());
        }
        Commands::Sign(args) => {
            let wallet = open_wallet(&config)?;
            let request = args.into_request(&config);
            let signed = wallet.sign_transaction(&request).await?;
            println!("{}", hex::encode_prefixed(&signed));
        }
        Commands::Send(args) => {
            let wallet = open_wallet(&config)?;
            wallet.client().verify_chain_id().await?;
            let request = args.into_request(&config);
            let tx_hash = wallet.send_transaction(request).await?;
            println!("{}", tx_hash);
        }
        Commands::Decode { raw } => {
            let raw = raw.trim();
            let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw))?;
            let output = match SuaveTransaction::decode(&bytes)? {
                SuaveTransaction::Record(record) => record_json(&record),
                SuaveTransaction::Request(request) => {
                    let mut output = record_json(request.record());
                    let signature = request.signature();
                    output["confidentialInputs"] = json!(request.confidential_inputs());
                    output["v"] = json!(signature.v);
                    output["r"] = json!(signature.r);
                    output["s"] = json!(signature.s);
                    output["signer"] = json!(request.recover_signer()?);
                    output["type"] = json!(SuaveTxType::ConfidentialRequest.name());
                    output
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
