//! Command line definitions

use crate::tx::{GasLimitMode, GasPriceMode};

use clap::{Args, Parser, Subcommand};
use ethers::types::U256;

#[derive(Parser, Debug)]
#[command(name = "geth-cli", version, about = "Common Ethereum tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Return the current gas price (Gwei)
    GasPrice,
    /// Native currency balance and transfers
    #[command(subcommand)]
    Eth(EthCommand),
    /// BZZ token balance and transfers
    #[command(subcommand)]
    Bzz(BzzCommand),
    /// Inspect and replace pending transactions
    #[command(subcommand)]
    Txpool(TxpoolCommand),
}

#[derive(Subcommand, Debug)]
pub enum EthCommand {
    /// Balance in wei
    Bls(BalanceArgs),
    /// Send native currency
    Send {
        #[command(flatten)]
        transfer: TransferArgs,
        /// The amount of gas limit
        #[arg(long = "gasLimit", default_value_t = 21_000)]
        gas_limit: u64,
        /// Ask the node for a gas estimate and use --gasLimit as its floor
        #[arg(long = "estimateGas")]
        estimate_gas: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum BzzCommand {
    /// Token balance in base units
    Bls(BalanceArgs),
    /// Send BZZ tokens
    Send {
        #[command(flatten)]
        transfer: TransferArgs,
        /// Minimum gas limit; the node estimate is used when higher
        #[arg(long = "gasLimit", default_value_t = 0)]
        gas_limit: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum TxpoolCommand {
    /// List pending transactions as JSON
    Pending {
        /// Filters the specified wallet address
        #[arg(long)]
        from: Option<String>,
    },
    /// Resubmit pending transactions with a higher gas price
    Replace {
        /// Filters the specified wallet address
        #[arg(long)]
        from: String,
        /// The private key for the replace messages
        #[arg(long = "fromKey")]
        from_key: String,
        /// n times of the current gas price
        #[arg(long = "nGasPrice", default_value_t = 2)]
        n_gas_price: u64,
        /// Minimum gas limit for the replacements
        #[arg(long = "gasLimit", default_value_t = 0)]
        gas_limit: u64,
    },
}

#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// The ethereum address
    #[arg(long)]
    pub address: String,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Private key of the sending wallet
    #[arg(long = "fromKey")]
    pub from_key: String,
    /// Address of the receiving wallet
    #[arg(long = "toKey")]
    pub to_key: String,
    /// Amount in display units (0.0001 eth, 0.00001 gBzz)
    #[arg(long)]
    pub amount: u64,
    /// n times of the current gas price (0 keeps the suggested price)
    #[arg(long = "nGasPrice", default_value_t = 2, conflicts_with = "gas_price")]
    pub n_gas_price: u64,
    /// Gas price floor in wei, used only when above the suggested price
    #[arg(long = "gasPrice")]
    pub gas_price: Option<u64>,
}

impl TransferArgs {
    pub fn gas_price_mode(&self) -> GasPriceMode {
        match self.gas_price {
            Some(floor) => GasPriceMode::Floor(U256::from(floor)),
            None => GasPriceMode::Multiplier(self.n_gas_price),
        }
    }
}

pub fn native_gas_limit(gas_limit: u64, estimate_gas: bool) -> GasLimitMode {
    if estimate_gas {
        GasLimitMode::Estimated { floor: gas_limit }
    } else {
        GasLimitMode::Fixed(gas_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_eth_send_defaults() {
        let cli = Cli::try_parse_from([
            "geth-cli", "eth", "send", "--fromKey", "0xabc", "--toKey", "0xdef", "--amount", "1000",
        ])
        .unwrap();

        match cli.command {
            Command::Eth(EthCommand::Send { transfer, gas_limit, estimate_gas }) => {
                assert_eq!(transfer.amount, 1000);
                assert_eq!(transfer.gas_price_mode(), GasPriceMode::Multiplier(2));
                assert_eq!(native_gas_limit(gas_limit, estimate_gas), GasLimitMode::Fixed(21_000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_gas_price_floor_conflicts_with_multiplier() {
        let cli = Cli::try_parse_from([
            "geth-cli", "bzz", "send", "--fromKey", "k", "--toKey", "t", "--amount", "1",
            "--gasPrice", "5000000000",
        ])
        .unwrap();
        match cli.command {
            Command::Bzz(BzzCommand::Send { transfer, gas_limit }) => {
                assert_eq!(gas_limit, 0);
                assert_eq!(
                    transfer.gas_price_mode(),
                    GasPriceMode::Floor(U256::from(5_000_000_000u64))
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let both = Cli::try_parse_from([
            "geth-cli", "bzz", "send", "--fromKey", "k", "--toKey", "t", "--amount", "1",
            "--gasPrice", "5", "--nGasPrice", "3",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_replace_requires_sender_and_key() {
        assert!(Cli::try_parse_from(["geth-cli", "txpool", "replace", "--from", "0xabc"]).is_err());

        let cli = Cli::try_parse_from([
            "geth-cli", "txpool", "replace", "--from", "0xabc", "--fromKey", "0x01",
        ])
        .unwrap();
        match cli.command {
            Command::Txpool(TxpoolCommand::Replace { n_gas_price, gas_limit, .. }) => {
                assert_eq!(n_gas_price, 2);
                assert_eq!(gas_limit, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_gas_price_subcommand_name() {
        let cli = Cli::try_parse_from(["geth-cli", "gas-price"]).unwrap();
        assert!(matches!(cli.command, Command::GasPrice));
    }
}
