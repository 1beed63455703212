//! Command handlers
//!
//! Each handler returns the text to print on stdout; `None` prints nothing.

use crate::chain::RpcClient;
use crate::cli::{native_gas_limit, BzzCommand, Command, EthCommand, TxpoolCommand};
use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::replace::{ReplaceRequest, ReplacementEngine};
use crate::tx::{parse_address, send_transfer, Asset, GasLimitMode, TransferRequest};

use ethers::providers::JsonRpcClient;
use ethers::utils::format_units;
use std::time::Duration;
use tracing::info;

pub async fn execute<P: JsonRpcClient>(
    command: Command,
    client: &RpcClient<P>,
    settings: &Settings,
) -> CliResult<Option<String>> {
    match command {
        Command::GasPrice => {
            let price = client.gas_price().await?;
            let gwei = format_units(price, "gwei").map_err(|e| CliError::decode("gasPrice", e))?;
            Ok(Some(format!("current gasPrice: {} Gwei", gwei)))
        }
        Command::Eth(EthCommand::Bls(args)) => {
            let address = parse_address("address", &args.address)?;
            Ok(Some(client.balance(address).await?.to_string()))
        }
        Command::Eth(EthCommand::Send {
            transfer,
            gas_limit,
            estimate_gas,
        }) => {
            let request = TransferRequest {
                gas_price: transfer.gas_price_mode(),
                gas_limit: native_gas_limit(gas_limit, estimate_gas),
                asset: Asset::Native {
                    amount: transfer.amount,
                },
                private_key: transfer.from_key,
                recipient: transfer.to_key,
            };
            let signed = send_transfer(client, request).await?;
            Ok(Some(signed.hash_hex()))
        }
        Command::Bzz(BzzCommand::Bls(args)) => {
            let contract = token_contract(settings)?;
            let holder = parse_address("address", &args.address)?;
            Ok(Some(client.token_balance(contract, holder).await?.to_string()))
        }
        Command::Bzz(BzzCommand::Send {
            transfer,
            gas_limit,
        }) => {
            let request = TransferRequest {
                gas_price: transfer.gas_price_mode(),
                gas_limit: GasLimitMode::Estimated { floor: gas_limit },
                asset: Asset::Token {
                    contract: token_contract(settings)?,
                    amount: transfer.amount,
                },
                private_key: transfer.from_key,
                recipient: transfer.to_key,
            };
            let signed = send_transfer(client, request).await?;
            Ok(Some(signed.hash_hex()))
        }
        Command::Txpool(TxpoolCommand::Pending { from }) => {
            let sender = from
                .as_deref()
                .map(|from| parse_address("from", from))
                .transpose()?;
            let snapshot = client.txpool_content().await?;
            let entries = snapshot.pending_entries(sender);
            if entries.is_empty() {
                return Ok(None);
            }

            let listing =
                serde_json::to_string_pretty(&entries).map_err(|e| CliError::decode("txpool", e))?;
            Ok(Some(listing))
        }
        Command::Txpool(TxpoolCommand::Replace {
            from,
            from_key,
            n_gas_price,
            gas_limit,
        }) => {
            let request = ReplaceRequest {
                sender: from,
                private_key: from_key,
                gas_price_multiplier: n_gas_price,
                gas_limit_floor: gas_limit,
            };
            let delay = Duration::from_millis(settings.replace.submission_delay_ms);
            let report = ReplacementEngine::new(client, delay).run(&request).await?;

            info!("Replacement run finished with {} entries", report.outcomes.len());
            Ok(Some(format!(
                "replaced {}, skipped {}, failed {}",
                report.replaced(),
                report.skipped(),
                report.failed()
            )))
        }
    }
}

fn token_contract(settings: &Settings) -> CliResult<ethers::types::Address> {
    parse_address("token.contract_address", &settings.token.contract_address)
}
