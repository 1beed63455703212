//! JSON-RPC client for a single node endpoint
//!
//! A thin wrapper over an ethers [`Provider`]; the transport is a type parameter
//! so commands can run against `Http` in production and `MockProvider` in tests.
//! Every call is a single attempt.

use super::txpool::TxPoolContent;
use crate::config::NodeConfig;
use crate::error::{CliError, CliResult};
use crate::tx::erc20::{build_balance_of_payload, decode_uint_word};
use crate::tx::SignedTransaction;

use ethers::prelude::*;
use ethers::providers::{Http, JsonRpcClient, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use std::time::Duration;
use tracing::debug;

pub struct RpcClient<P> {
    provider: Provider<P>,
}

impl RpcClient<Http> {
    /// Create a client for the configured HTTP endpoint
    pub fn connect(config: &NodeConfig) -> CliResult<Self> {
        let url: reqwest::Url = config
            .endpoint
            .parse()
            .map_err(|e| CliError::Config(format!("Invalid endpoint {}: {}", config.endpoint, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CliError::Transport(e.to_string()))?;

        debug!("Using node endpoint {}", config.endpoint);
        Ok(Self::new(Provider::new(Http::new_with_client(url, client))))
    }
}

impl<P: JsonRpcClient> RpcClient<P> {
    pub fn new(provider: Provider<P>) -> Self {
        Self { provider }
    }

    /// Network identifier used for replay protection (`net_version`)
    pub async fn network_id(&self) -> CliResult<u64> {
        let version = self
            .provider
            .get_net_version()
            .await
            .map_err(|e| CliError::from_provider("net_version", e))?;

        version
            .trim()
            .parse::<u64>()
            .map_err(|e| CliError::decode("net_version", format!("{:?}: {}", version, e)))
    }

    /// Point-in-time snapshot of the node's transaction pool
    pub async fn txpool_content(&self) -> CliResult<TxPoolContent> {
        self.provider
            .request::<_, TxPoolContent>("txpool_content", ())
            .await
            .map_err(|e| CliError::from_provider("txpool_content", e))
    }

    /// Submit a signed transaction, returning the hash reported by the node
    pub async fn send_raw_transaction(&self, tx: &SignedTransaction) -> CliResult<H256> {
        debug!("Submitting {} raw {}", tx.hash_hex(), tx.raw_hex());
        self.provider
            .request::<_, H256>("eth_sendRawTransaction", [tx.raw_hex()])
            .await
            .map_err(|e| CliError::from_provider("eth_sendRawTransaction", e))
    }

    /// Node-suggested gas price in wei
    pub async fn gas_price(&self) -> CliResult<U256> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| CliError::from_provider("eth_gasPrice", e))
    }

    /// Next usable nonce, counting transactions still in the pool
    pub async fn pending_nonce(&self, address: Address) -> CliResult<u64> {
        let nonce = self
            .provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| CliError::from_provider("eth_getTransactionCount", e))?;

        u256_to_u64("eth_getTransactionCount", nonce)
    }

    /// Native balance in wei
    pub async fn balance(&self, address: Address) -> CliResult<U256> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| CliError::from_provider("eth_getBalance", e))
    }

    /// Gas the node predicts a call from `from` to `to` with `data` will use
    pub async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> CliResult<u64> {
        let tx: TypedTransaction = TransactionRequest::new().from(from).to(to).data(data).into();
        let estimate = self
            .provider
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| CliError::from_provider("eth_estimateGas", e))?;

        u256_to_u64("eth_estimateGas", estimate)
    }

    /// ERC-20 `balanceOf(holder)` via `eth_call`
    pub async fn token_balance(&self, contract: Address, holder: Address) -> CliResult<U256> {
        let tx: TypedTransaction = TransactionRequest::new()
            .to(contract)
            .data(build_balance_of_payload(&holder))
            .into();
        let output = self
            .provider
            .call(&tx, None)
            .await
            .map_err(|e| CliError::from_provider("eth_call", e))?;

        decode_uint_word(&output).ok_or_else(|| {
            CliError::decode("balanceOf", format!("unexpected return length {}", output.len()))
        })
    }
}

fn u256_to_u64(field: &str, value: U256) -> CliResult<u64> {
    if value > U256::from(u64::MAX) {
        return Err(CliError::decode(field, format!("{} exceeds 64 bits", value)));
    }
    Ok(value.as_u64())
}
