//! Native and ERC-20 transfers through a single parameterized path

use super::erc20::build_transfer_payload;
use super::gas::{GasLimitMode, GasPriceMode};
use super::signer::{parse_address, parse_private_key, sign, SignedTransaction, TransactionRecord};
use super::units::{native_to_wei, token_to_base_units};
use crate::chain::RpcClient;
use crate::error::CliResult;

use ethers::providers::JsonRpcClient;
use ethers::signers::Signer;
use ethers::types::{Address, Bytes, U256};
use tracing::{debug, info};

/// What is being moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    /// Amount in native display units (0.0001 ETH)
    Native { amount: u64 },
    /// Amount in token display units (0.00001 gBzz)
    Token { contract: Address, amount: u64 },
}

impl Asset {
    fn label(&self) -> &'static str {
        match self {
            Asset::Native { .. } => "eth",
            Asset::Token { .. } => "bzz",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub private_key: String,
    pub recipient: String,
    pub asset: Asset,
    pub gas_price: GasPriceMode,
    pub gas_limit: GasLimitMode,
}

/// Build, sign and submit a transfer.
///
/// Key and recipient are validated before the node is contacted.
pub async fn send_transfer<P: JsonRpcClient>(
    client: &RpcClient<P>,
    request: TransferRequest,
) -> CliResult<SignedTransaction> {
    let wallet = parse_private_key(&request.private_key)?;
    let recipient = parse_address("recipient", &request.recipient)?;
    let sender = wallet.address();

    // token transfers carry the amount in call data, not in value
    let (to, value, data) = match request.asset {
        Asset::Native { amount } => (recipient, native_to_wei(amount), Bytes::default()),
        Asset::Token { contract, amount } => (
            contract,
            U256::zero(),
            build_transfer_payload(&recipient, token_to_base_units(amount)),
        ),
    };

    let nonce = client.pending_nonce(sender).await?;
    let suggested = client.gas_price().await?;
    let gas_price = request.gas_price.apply(suggested);

    let estimate = if request.gas_limit.needs_estimate() {
        Some(client.estimate_gas(sender, to, data.clone()).await?)
    } else {
        None
    };
    let gas_limit = request.gas_limit.resolve(estimate);

    debug!("Gas price: {} (suggested {})", gas_price, suggested);
    debug!("Gas limit: {} (estimate {:?})", gas_limit, estimate);

    let chain_id = client.network_id().await?;
    let record = TransactionRecord {
        nonce,
        to,
        value,
        gas_limit,
        gas_price,
        data,
    };
    let signed = sign(record, chain_id, &wallet)?;

    client.send_raw_transaction(&signed).await?;
    info!("{} tx sent: {}", request.asset.label(), signed.hash_hex());

    Ok(signed)
}
