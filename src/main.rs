//! geth-cli - common Ethereum node tools
//!
//! Balance lookups, native and BZZ transfers, gas price display, and
//! replacement of stuck pending transactions.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

mod chain;
mod cli;
mod commands;
mod config;
mod error;
mod replace;
mod tx;

use chain::RpcClient;
use cli::Cli;
use config::Settings;

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<Option<String>> {
    let settings = Settings::load()?;
    debug!("Loaded configuration for endpoint {}", settings.node.endpoint);

    let client = RpcClient::connect(&settings.node)?;
    let output = commands::execute(cli.command, &client, &settings).await?;

    Ok(output)
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
