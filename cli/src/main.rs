//! crcforge - compute and forge CRC checksums.
//!
//! Reads its CRC parameters from the environment, runs one command and
//! prints a JSON report.

use crcforge_cli::{execute, Config};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize structured logging
    init_tracing();

    let config = Config::from_env();
    log_startup_info(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match execute(&args, &config) {
        Ok((report, rendered)) => {
            println!("{rendered}");
            if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) if err.is_usage() => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
        Err(err) => {
            error!(%err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing on stderr with environment-based log levels.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crcforge_cli=info,crcforge_core=info")),
        )
        .init();
}

/// Log the configured CRC.
fn log_startup_info(config: &Config) {
    info!(
        crc = %config.crc_name(),
        seed = config.seed,
        search_limit = config.search_limit,
        "Starting crcforge"
    );
}
