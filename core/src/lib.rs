//! crcforge core - CRC computation and checksum forgery.
//!
//! This library provides:
//! - Table-driven reflected CRCs of any whole-byte width from 8 to 64 bits
//! - Suffix forgery: append `width_bytes` bytes to reach any chosen checksum
//! - Named presets (CRC-32, CRC-32C, CRC-64/XZ, CRC-64/GO-ISO, CRC-8)
//! - A bounded, cancellable brute-force search for short suffixes
//! - The CRC-preserving tampering attack on XOR-stream ciphertexts
//!
//! # Not a MAC
//!
//! CRCs detect accidental corruption only. Everything here exists to show how
//! easily an adversary can choose a CRC; nothing here defends against it.
//!
//! # Constraints
//!
//! This library intentionally does NOT:
//! - Access the network
//! - Perform file I/O
//! - Access OS randomness (caller provides the generator)
//! - Mutate engine state after construction
//!
//! # Example: Forging a CRC-32
//!
//! ```
//! use crcforge_core::{Engine, Preset};
//!
//! // Polynomial in reciprocal form, init/final masks
//! let raw = Engine::new(0x1DB710640, 0, 0).unwrap();
//! let fox = b"The quick brown fox jumps over the lazy dog";
//! let forged = raw.forge(fox, 0xDEADBEEF).unwrap();
//! assert_eq!(forged.len(), fox.len() + 4);
//! assert_eq!(raw.checksum(&forged), 0xDEADBEEF);
//!
//! // Presets carry the standard masks
//! let crc32 = Preset::Crc32.engine().unwrap();
//! assert_eq!(crc32.checksum(b"123456789"), 0xCBF43926);
//! ```
//!
//! # Example: Tampering Without the Key
//!
//! ```
//! use crcforge_core::{Preset, TamperScenario};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let crc32 = Preset::Crc32.engine().unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! let outcome = TamperScenario::new(&crc32)
//!     .run(b"CRC is easy to break do not use it", &mut rng)
//!     .unwrap();
//! assert!(outcome.message_changed());
//! assert!(outcome.checksum_preserved());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod preset;
pub mod search;
pub mod table;
pub mod tamper;

// Re-export main types at crate root
pub use engine::Engine;
pub use error::{Error, Result};
pub use preset::{Preset, UnknownPreset};
pub use search::{BruteForce, MAX_SUFFIX_LEN};
pub use table::{polynomial_width, ForwardTable, InverseTable, MAX_WIDTH_BYTES, TABLE_SIZE};
pub use tamper::{forge_delta, TamperOutcome, TamperScenario};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
