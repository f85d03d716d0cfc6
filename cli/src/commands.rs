//! Command parsing and execution.
//!
//! Every command builds its engine from [`Config`], does its work through
//! crcforge-core, and returns a [`Report`] for the binary to print.

use crate::config::{parse_hex, Config};
use crate::models::*;
use crcforge_core::{BruteForce, Engine, TamperScenario, MAX_SUFFIX_LEN};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Message used by `tamper` and `selftest` when none is given.
pub const DEFAULT_MESSAGE: &str = "CRC is easy to break do not use it";

/// Prefix used by the `selftest` regression cases.
pub const SELFTEST_DATA: &[u8] = b"The quick brown fox jumps over the lazy dog";

/// Polynomials exercised by `selftest`.
pub const SELFTEST_POLYNOMIALS: [u128; 5] = [
    0x1_DB71_0640,
    0x1_05EC_76F1,
    0x1_B000_0000_0000_0001,
    0x1_92D8_AF2B_AF0E_1E85,
    0x1E9,
];

/// Usage text.
pub const USAGE: &str = "\
usage: crcforge <command> [args]

commands:
  compute [--hex] <data>                checksum of <data>
  forge   [--hex] <data> <target>       append bytes so the checksum is <target>
  brute   [--hex] <data> <target> [len] exhaustive search for a <len>-byte suffix
  tamper  [message]                     CRC-preserving ciphertext tampering demo
  selftest                              run the regression set

<target> is hex. Options go before the data; `--` ends them, so data may
start with `-`. Configure the CRC with CRCFORGE_PRESET or CRCFORGE_POLY,
CRCFORGE_INIT_XOR and CRCFORGE_END_XOR.";

/// Command-line errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("invalid hex data: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid {what}: {value}")]
    InvalidNumber { what: &'static str, value: String },

    #[error("{key} = {value:#x} does not fit in 64 bits")]
    MaskOutOfRange { key: &'static str, value: u128 },

    #[error(transparent)]
    Core(#[from] crcforge_core::Error),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Whether the error came from bad arguments rather than a failed operation
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CliError::Usage(_) | CliError::InvalidHex(_) | CliError::InvalidNumber { .. }
        )
    }
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Compute { data: Vec<u8> },
    Forge { data: Vec<u8>, target: u64 },
    Brute { data: Vec<u8>, target: u64, len: Option<usize> },
    Tamper { message: Vec<u8> },
    Selftest,
}

impl Command {
    /// Parse arguments (without the program name).
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, CliError> {
        let mut hex_input = false;
        let mut options_done = false;
        let mut positional = Vec::new();
        for arg in args.iter().map(AsRef::as_ref) {
            if !options_done {
                match arg {
                    "--" => {
                        options_done = true;
                        continue;
                    }
                    "--hex" => {
                        hex_input = true;
                        continue;
                    }
                    "-h" | "--help" if positional.is_empty() => {
                        return Err(CliError::Usage(USAGE.to_string()));
                    }
                    _ => {}
                }
            }
            // Options stop at the first operand after the command name
            options_done |= !positional.is_empty();
            positional.push(arg);
        }

        let Some((&name, rest)) = positional.split_first() else {
            return Err(CliError::Usage(USAGE.to_string()));
        };
        let data = |index: usize| -> Result<Vec<u8>, CliError> {
            let raw = rest.get(index).ok_or_else(|| missing("data"))?;
            if hex_input {
                Ok(hex::decode(raw)?)
            } else {
                Ok(raw.as_bytes().to_vec())
            }
        };
        let target = |index: usize| -> Result<u64, CliError> {
            let raw = rest.get(index).ok_or_else(|| missing("target"))?;
            parse_hex(raw)
                .and_then(|v| u64::try_from(v).ok())
                .ok_or_else(|| CliError::InvalidNumber {
                    what: "target",
                    value: (*raw).to_string(),
                })
        };

        let (command, arity) = match name {
            "compute" => (Command::Compute { data: data(0)? }, 1),
            "forge" => (
                Command::Forge {
                    data: data(0)?,
                    target: target(1)?,
                },
                2,
            ),
            "brute" => {
                let len = rest
                    .get(2)
                    .map(|raw| {
                        raw.parse().map_err(|_| CliError::InvalidNumber {
                            what: "suffix length",
                            value: (*raw).to_string(),
                        })
                    })
                    .transpose()?;
                (
                    Command::Brute {
                        data: data(0)?,
                        target: target(1)?,
                        len,
                    },
                    3,
                )
            }
            "tamper" => {
                let message = rest
                    .first()
                    .map_or_else(|| DEFAULT_MESSAGE.as_bytes().to_vec(), |m| m.as_bytes().to_vec());
                (Command::Tamper { message }, 1)
            }
            "selftest" => (Command::Selftest, 0),
            other => {
                return Err(CliError::Usage(format!("unknown command: {other}\n\n{USAGE}")));
            }
        };

        if rest.len() > arity {
            return Err(CliError::Usage(format!(
                "too many arguments for {name}\n\n{USAGE}"
            )));
        }
        Ok(command)
    }
}

fn missing(what: &str) -> CliError {
    CliError::Usage(format!("missing {what}\n\n{USAGE}"))
}

/// Execute `command` against the configured CRC.
pub fn run(command: &Command, config: &Config) -> Result<Report, CliError> {
    let engine = config.engine()?;
    let crc = config.crc_name();
    debug!(crc = %crc, width_bytes = engine.width_bytes(), "Running command");

    let report = match command {
        Command::Compute { data } => Report::Compute(ComputeReport {
            checksum: format_checksum(engine.checksum(data), engine.width_bytes()),
            crc,
            width_bytes: engine.width_bytes(),
            data_len: data.len(),
        }),
        Command::Forge { data, target } => {
            let forged = engine.forge(data, *target)?;
            Report::Forge(forge_report(&engine, crc, data, *target, forged))
        }
        Command::Brute { data, target, len } => {
            let len = len.unwrap_or_else(|| engine.width_bytes().min(MAX_SUFFIX_LEN));
            let forged = BruteForce::new(len)?
                .with_limit(config.search_limit)
                .search(&engine, data, *target)?;
            Report::Brute(forge_report(&engine, crc, data, *target, forged))
        }
        Command::Tamper { message } => Report::Tamper(tamper(&engine, crc, message, config.seed)?),
        Command::Selftest => Report::Selftest(selftest(&engine, config.seed)?),
    };

    info!(passed = report.passed(), "Command finished");
    Ok(report)
}

fn forge_report(engine: &Engine, crc: String, data: &[u8], target: u64, forged: Vec<u8>) -> ForgeReport {
    let width = engine.width_bytes();
    let checksum = engine.checksum(&forged);
    ForgeReport {
        crc,
        target: format_checksum(target, width),
        suffix: hex::encode(&forged[data.len()..]),
        forged: hex::encode(&forged),
        checksum: format_checksum(checksum, width),
        verified: checksum == target,
    }
}

fn tamper(engine: &Engine, crc: String, message: &[u8], seed: u64) -> Result<TamperReport, CliError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let outcome = TamperScenario::new(engine).run(message, &mut rng)?;
    let width = engine.width_bytes();

    Ok(TamperReport {
        crc,
        seed,
        message: String::from_utf8_lossy(&outcome.message).into_owned(),
        key: hex::encode(&outcome.key),
        ciphertext: hex::encode(&outcome.ciphertext),
        delta: hex::encode(&outcome.delta),
        tampered_ciphertext: hex::encode(&outcome.tampered_ciphertext),
        tampered_message: String::from_utf8_lossy(&outcome.tampered_message).into_owned(),
        original_crc: format_checksum(outcome.original_crc, width),
        tampered_crc: format_checksum(outcome.tampered_crc, width),
        checksum_preserved: outcome.checksum_preserved(),
    })
}

/// Forge `0xdeadbeef` (truncated to width) for every regression polynomial
/// with zero masks, then run the tampering scenario on the configured CRC.
fn selftest(engine: &Engine, seed: u64) -> Result<SelftestReport, CliError> {
    let mut cases = Vec::with_capacity(SELFTEST_POLYNOMIALS.len());
    for polynomial in SELFTEST_POLYNOMIALS {
        let case_engine = Engine::new(polynomial, 0, 0)?;
        let width = case_engine.width_bytes();
        let target = 0xDEAD_BEEF & case_engine.mask();
        let forged = case_engine.forge(SELFTEST_DATA, target)?;

        let passed = case_engine.verify(&forged, target);
        info!(polynomial = %format!("{polynomial:#x}"), passed, "Selftest case");
        cases.push(SelftestCase {
            polynomial: format!("{polynomial:#x}"),
            width_bytes: width,
            target: format_checksum(target, width),
            suffix: hex::encode(&forged[SELFTEST_DATA.len()..]),
            passed,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let tamper_passed = TamperScenario::new(engine)
        .run(DEFAULT_MESSAGE.as_bytes(), &mut rng)?
        .checksum_preserved();

    let passed = tamper_passed && cases.iter().all(|case| case.passed);
    Ok(SelftestReport {
        cases,
        tamper_passed,
        passed,
    })
}
