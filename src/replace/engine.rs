//! Stuck transaction replacement
//!
//! One pass per invocation: snapshot the pool, keep the sender's pending
//! entries, and for each one re-sign the same nonce at a higher gas price.

use crate::chain::{RawPoolTransaction, RpcClient};
use crate::error::{CliError, CliResult};
use crate::tx::{
    apply_gas_limit_floor, parse_address, parse_private_key, replacement_gas_price, sign,
    GasPriceMode, TransactionRecord,
};

use ethers::providers::JsonRpcClient;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{H256, U256};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct ReplaceRequest {
    /// Sender whose pending transactions are replaced
    pub sender: String,
    /// Private key of `sender`
    pub private_key: String,
    pub gas_price_multiplier: u64,
    /// Minimum gas limit for the replacements
    pub gas_limit_floor: u64,
}

/// What happened to one pending transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementOutcome {
    Replaced {
        nonce: u64,
        original_hash: String,
        tx_hash: H256,
        gas_price: U256,
    },
    /// Candidate price does not out-bid the pending one
    Skipped {
        nonce: u64,
        original_hash: String,
        current_price: U256,
        candidate_price: U256,
    },
    Failed {
        original_hash: String,
        error: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ReplacementReport {
    pub outcomes: Vec<ReplacementOutcome>,
}

impl ReplacementReport {
    pub fn replaced(&self) -> usize {
        self.count(|o| matches!(o, ReplacementOutcome::Replaced { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ReplacementOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ReplacementOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ReplacementOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

pub struct ReplacementEngine<'a, P> {
    client: &'a RpcClient<P>,
    /// Pause after each successful submission
    submission_delay: Duration,
}

impl<'a, P: JsonRpcClient> ReplacementEngine<'a, P> {
    pub fn new(client: &'a RpcClient<P>, submission_delay: Duration) -> Self {
        Self {
            client,
            submission_delay,
        }
    }

    /// Replace every pending transaction of `request.sender` that can be out-bid.
    ///
    /// Only snapshot and chain id failures abort the run; per-entry failures
    /// are reported and the next entry is processed.
    pub async fn run(&self, request: &ReplaceRequest) -> CliResult<ReplacementReport> {
        let wallet = parse_private_key(&request.private_key)?;
        let sender = parse_address("from", &request.sender)?;
        if wallet.address() != sender {
            return Err(CliError::SenderMismatch {
                expected: format!("{:#x}", sender),
                actual: format!("{:#x}", wallet.address()),
            });
        }

        let snapshot = self.client.txpool_content().await?;
        let entries = snapshot.pending_entries(Some(sender));

        let mut report = ReplacementReport::default();
        if entries.is_empty() {
            info!("No pending transactions for {:#x}", sender);
            return Ok(report);
        }

        let chain_id = self.client.network_id().await?;
        info!(
            "Found {} pending transactions for {:#x} on network {}",
            entries.len(),
            sender,
            chain_id
        );

        let last = entries.len() - 1;
        for (idx, entry) in entries.iter().enumerate() {
            let outcome = match self.replace_one(entry, request, chain_id, &wallet).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    if e.is_per_entry_recoverable() {
                        warn!("Failed to replace {}: {}", entry.hash, e);
                    } else {
                        error!("Failed to replace {}: {}", entry.hash, e);
                    }
                    ReplacementOutcome::Failed {
                        original_hash: entry.hash.clone(),
                        error: e.to_string(),
                    }
                }
            };

            let submitted = matches!(outcome, ReplacementOutcome::Replaced { .. });
            report.outcomes.push(outcome);

            if submitted && idx < last && !self.submission_delay.is_zero() {
                tokio::time::sleep(self.submission_delay).await;
            }
        }

        Ok(report)
    }

    async fn replace_one(
        &self,
        entry: &RawPoolTransaction,
        request: &ReplaceRequest,
        chain_id: u64,
        wallet: &LocalWallet,
    ) -> CliResult<ReplacementOutcome> {
        let pending = entry.decode()?;
        let suggested = self.client.gas_price().await?;

        let gas_price =
            match replacement_gas_price(suggested, request.gas_price_multiplier, pending.gas_price) {
                Some(price) => price,
                None => {
                    let candidate_price =
                        GasPriceMode::Multiplier(request.gas_price_multiplier).apply(suggested);
                    info!(
                        "Transaction {} (nonce {}) does not need replacement: {} >= {}",
                        pending.hash, pending.nonce, pending.gas_price, candidate_price
                    );
                    return Ok(ReplacementOutcome::Skipped {
                        nonce: pending.nonce,
                        original_hash: pending.hash,
                        current_price: pending.gas_price,
                        candidate_price,
                    });
                }
            };

        let record = TransactionRecord {
            nonce: pending.nonce,
            to: pending.to,
            value: pending.value,
            gas_limit: apply_gas_limit_floor(pending.gas_limit, request.gas_limit_floor),
            gas_price,
            data: pending.input,
        };
        let signed = sign(record, chain_id, wallet)?;
        if signed.recover_sender()? != pending.from {
            return Err(CliError::Signing(format!(
                "replacement for {} would not be sent by {:#x}",
                pending.hash, pending.from
            )));
        }

        let tx_hash = self.client.send_raw_transaction(&signed).await?;
        info!(
            "Replaced {} (nonce {}) with {:#x} at gas price {}",
            pending.hash, pending.nonce, tx_hash, gas_price
        );

        Ok(ReplacementOutcome::Replaced {
            nonce: pending.nonce,
            original_hash: pending.hash,
            tx_hash,
            gas_price,
        })
    }
}
