//! Transaction construction, signing and submission

pub mod erc20;
mod gas;
mod sender;
mod signer;
pub mod units;

pub use gas::{apply_gas_limit_floor, replacement_gas_price, GasLimitMode, GasPriceMode};
pub use sender::{send_transfer, Asset, TransferRequest};
pub use signer::{parse_address, parse_private_key, sign, SignedTransaction, TransactionRecord};

#[cfg(test)]
pub(crate) use signer::tests::{test_wallet, TEST_KEY};
