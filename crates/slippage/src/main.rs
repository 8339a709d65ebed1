use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use slippage::{
    constants::{CHECK_INPUTS_HINT, DEFAULT_SUITE},
    read_suite, QuoteClient, QuoteReport,
};

const QUOTER: &str = "QUOTER";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// quote suite to run. a path, or a file name under `crates/slippage/inputs`.
    #[arg(default_value = DEFAULT_SUITE)]
    suite: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let suite = read_suite(&cli.suite)?;
    let client = QuoteClient::new()?;

    info!(target: QUOTER, "running {} quote(s) from {}", suite.quotes.len(), cli.suite.display());

    // a failing pair is reported and the rest of the suite still runs
    for request in &suite.quotes {
        match client.quote(request).await {
            Ok(outcome) => println!(
                "{}",
                QuoteReport {
                    pair: &request.pair,
                    outcome: &outcome,
                }
            ),
            Err(e) => error!(target: QUOTER, "{}: {e}. {CHECK_INPUTS_HINT}", request.pair),
        }
    }

    Ok(())
}
