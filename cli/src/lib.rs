//! # crcforge CLI
//!
//! Command-line front end for crcforge-core.
//!
//! ## Design Principles
//!
//! - **Configuration from the environment**: the CRC is chosen once, via
//!   `CRCFORGE_*` variables or a `.env` file, not per command
//! - **Machine-readable output**: every command prints one JSON report on stdout
//! - **Logs on stderr**: tracing output never mixes with reports
//! - **Reproducible demos**: the tampering key comes from a seeded generator
//!
//! ## Commands
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `compute` | `[--hex] <data>` | Checksum of data |
//! | `forge` | `[--hex] <data> <target>` | Append a suffix reaching target |
//! | `brute` | `[--hex] <data> <target> [len]` | Exhaustive suffix search |
//! | `tamper` | `[message]` | CRC-preserving ciphertext tampering |
//! | `selftest` | | Regression set |

pub mod commands;
pub mod config;
pub mod models;

pub use commands::{run, CliError, Command, USAGE};
pub use config::Config;
pub use models::Report;

/// Parse `args`, run the command and render its report as pretty JSON.
pub fn execute<S: AsRef<str>>(args: &[S], config: &Config) -> Result<(Report, String), CliError> {
    let command = Command::parse(args)?;
    let report = run(&command, config)?;
    let rendered = serde_json::to_string_pretty(&report)?;
    Ok((report, rendered))
}
