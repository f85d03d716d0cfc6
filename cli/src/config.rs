//! Configuration for the crcforge command-line tool.
//!
//! All configuration is loaded from environment variables (a `.env` file is
//! read first by the binary). Unparseable values fall back to defaults with a
//! warning. Masks are kept as parsed; one wider than 64 bits is rejected when
//! the engine is built.

use crate::commands::CliError;
use crcforge_core::{Engine, Preset};
use tracing::warn;

/// Default brute-force candidate bound: the whole 4-byte space.
pub const DEFAULT_SEARCH_LIMIT: u64 = 1 << 32;

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Preset used when no explicit polynomial is configured
    pub preset: Preset,

    // === Custom CRC ===
    /// Reciprocal-form polynomial, overrides `preset`
    pub polynomial: Option<u128>,

    /// Initial register mask for `polynomial`
    pub init_xor: u128,

    /// Final register mask for `polynomial`
    pub end_xor: u128,

    // === Demonstrations ===
    /// Seed for the tampering scenario's key generator
    pub seed: u64,

    /// Maximum brute-force candidates (default: 2^32)
    pub search_limit: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str, parse: fn(&str) -> Option<u128>| -> Option<u128> {
            let raw = lookup(key)?;
            let value = parse(raw.trim());
            if value.is_none() {
                warn!(key, value = %raw, "Ignoring unparseable configuration value");
            }
            value
        };
        let narrowed = |key: &str, default: u64| {
            parsed(key, parse_decimal_or_hex).map_or(default, |value| {
                u64::try_from(value).unwrap_or_else(|_| {
                    warn!(
                        key,
                        value = %format!("{value:#x}"),
                        "Ignoring configuration value wider than 64 bits"
                    );
                    default
                })
            })
        };

        Self {
            preset: lookup("CRCFORGE_PRESET")
                .and_then(|name| match name.parse() {
                    Ok(preset) => Some(preset),
                    Err(err) => {
                        warn!(%err, "Falling back to default preset");
                        None
                    }
                })
                .unwrap_or(Preset::Crc32),

            polynomial: parsed("CRCFORGE_POLY", parse_hex),
            init_xor: parsed("CRCFORGE_INIT_XOR", parse_hex).unwrap_or(0),
            end_xor: parsed("CRCFORGE_END_XOR", parse_hex).unwrap_or(0),

            seed: narrowed("CRCFORGE_SEED", 0),
            search_limit: narrowed("CRCFORGE_SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT),
        }
    }

    /// Build the configured engine
    pub fn engine(&self) -> Result<Engine, CliError> {
        let Some(polynomial) = self.polynomial else {
            return Ok(self.preset.engine()?);
        };
        let init_xor = narrow_mask("CRCFORGE_INIT_XOR", self.init_xor)?;
        let end_xor = narrow_mask("CRCFORGE_END_XOR", self.end_xor)?;
        Ok(Engine::new(polynomial, init_xor, end_xor)?)
    }

    /// Human-readable name of the configured CRC
    pub fn crc_name(&self) -> String {
        match self.polynomial {
            Some(polynomial) => format!("poly:{polynomial:#x}"),
            None => self.preset.name().to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn narrow_mask(key: &'static str, value: u128) -> Result<u64, CliError> {
    u64::try_from(value).map_err(|_| CliError::MaskOutOfRange { key, value })
}

/// Parse a hex number, with or without a `0x` prefix.
pub fn parse_hex(s: &str) -> Option<u128> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
        .replace('_', "");
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(&digits, 16).ok()
}

/// Parse decimal, or hex when prefixed with `0x`.
pub fn parse_decimal_or_hex(s: &str) -> Option<u128> {
    if s.starts_with("0x") || s.starts_with("0X") {
        parse_hex(s)
    } else {
        s.replace('_', "").parse().ok()
    }
}
