// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! SeatBill Billing Worker
//!
//! Runs one billing run per invocation:
//! - Loads the run file named by `SEATBILL_RUN_FILE`
//! - Reports invariant violations in the inputs (fatal with `SEATBILL_STRICT`)
//! - Prints the itemized invoice as JSON on stdout

mod config;
mod run;

use anyhow::Context;
use tracing::{error, info};

use crate::config::WorkerConfig;
use crate::run::RunFile;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    info!("Starting SeatBill Worker v{}", env!("CARGO_PKG_VERSION"));

    let config = WorkerConfig::from_env()?;
    info!(
        run_file = %config.run_file.display(),
        month_override = ?config.month_override,
        strict = config.strict,
        "Configuration loaded"
    );

    let contents = tokio::fs::read_to_string(&config.run_file)
        .await
        .with_context(|| format!("Failed to read {}", config.run_file.display()))?;
    let run_file = RunFile::from_json(&contents)?;

    let outcome = match run::execute(&run_file, config.month_override.as_deref(), config.strict) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Billing run failed");
            return Err(e);
        }
    };

    info!(
        checks_passed = outcome.invariants.checks_passed,
        checks_failed = outcome.invariants.checks_failed,
        healthy = outcome.invariants.healthy,
        "Invariant check summary"
    );

    println!("{}", serde_json::to_string_pretty(&outcome.invoice)?);
    Ok(())
}
