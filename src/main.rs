mod cli;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv(); // load .env if present

    let args = cli::Args::parse();

    // Initialize tracing
    let filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(
        network = %args.network,
        read_from_chain = args.read_from_chain,
        "riskcheck starting"
    );

    match check(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "validation aborted");
            ExitCode::from(2)
        }
    }
}

/// Run the validation and print its report. `Ok(false)` when soft errors
/// were recorded.
async fn check(args: &cli::Args) -> Result<bool, CliError> {
    let options = args.run_options()?;
    let report = marketcfg::run(&options).await?;

    let stdout = std::io::stdout();
    output::write_report(&report, args.json, &mut stdout.lock())?;

    Ok(!report.has_errors())
}
