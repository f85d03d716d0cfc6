//! CRC-preserving tampering of XOR-stream ciphertexts.
//!
//! A CRC is affine over XOR: for equal-length `m` and `d`,
//! `crc(m ^ d) == crc(m) ^ crc(d) ^ crc(0…0)`. If an attacker forges a delta
//! `d` whose checksum equals the checksum of the all-zero buffer, flipping
//! ciphertext bits with `d` changes the decrypted message while its CRC stays
//! intact. The key is never needed.
//!
//! Keys come from a caller-supplied generator, so runs are reproducible with
//! a seeded one.

use crate::engine::Engine;
use crate::error::{Error, Result};
use rand::RngCore;
use tracing::debug;

/// Encrypt `plaintext` with a key stream of the same length.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if lengths don't match.
///
/// # Example
///
/// ```
/// use crcforge_core::tamper;
///
/// let key = [0xAB, 0xCD, 0xEF];
/// let plaintext = [0x01, 0x02, 0x03];
/// let ciphertext = tamper::encrypt(&key, &plaintext).unwrap();
/// assert_eq!(ciphertext, vec![0xAA, 0xCF, 0xEC]);
/// ```
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    xor(key, plaintext)
}

/// Decrypt `ciphertext`; the same operation as [`encrypt`].
pub fn decrypt(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    xor(key, ciphertext)
}

/// XOR two byte slices of equal length.
#[inline]
pub fn xor(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if key.len() != data.len() {
        return Err(Error::LengthMismatch {
            key_len: key.len(),
            data_len: data.len(),
        });
    }

    Ok(key.iter().zip(data.iter()).map(|(k, d)| k ^ d).collect())
}

/// Draw `len` key bytes from `rng`.
pub fn random_key<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    rng.fill_bytes(&mut key);
    key
}

/// Forge a `len`-byte delta that leaves any `len`-byte message's CRC unchanged.
///
/// The first `len - width_bytes` bytes cycle through `pattern` (zeros if it
/// is empty); the remaining bytes are forged so that the delta's checksum
/// equals the checksum of `len` zero bytes.
///
/// # Errors
///
/// Returns `Error::DeltaTooShort` if `len < width_bytes`.
pub fn forge_delta(engine: &Engine, pattern: &[u8], len: usize) -> Result<Vec<u8>> {
    let width_bytes = engine.width_bytes();
    let Some(body_len) = len.checked_sub(width_bytes) else {
        return Err(Error::DeltaTooShort { len, width_bytes });
    };

    let body: Vec<u8> = if pattern.is_empty() {
        vec![0; body_len]
    } else {
        pattern.iter().copied().cycle().take(body_len).collect()
    };
    let zero_crc = engine.checksum(&vec![0u8; len]);
    engine.forge(&body, zero_crc)
}

/// Result of one tampering run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TamperOutcome {
    /// Message the victim encrypted.
    pub message: Vec<u8>,
    /// Key stream drawn for the run.
    pub key: Vec<u8>,
    /// Ciphertext as sent.
    pub ciphertext: Vec<u8>,
    /// Delta XORed into the ciphertext.
    pub delta: Vec<u8>,
    /// Ciphertext after tampering.
    pub tampered_ciphertext: Vec<u8>,
    /// What the victim decrypts.
    pub tampered_message: Vec<u8>,
    /// CRC of `message`.
    pub original_crc: u64,
    /// CRC of `tampered_message`.
    pub tampered_crc: u64,
}

impl TamperOutcome {
    /// Whether the receiver's CRC check still passes.
    pub fn checksum_preserved(&self) -> bool {
        self.original_crc == self.tampered_crc
    }

    /// Whether the decrypted message actually changed.
    pub fn message_changed(&self) -> bool {
        self.message != self.tampered_message
    }
}

/// Encrypt, tamper, decrypt: the full attack against CRC-protected XOR streams.
#[derive(Debug, Clone)]
pub struct TamperScenario<'a> {
    engine: &'a Engine,
    pattern: Vec<u8>,
}

impl<'a> TamperScenario<'a> {
    /// Default delta body byte.
    pub const DEFAULT_PATTERN: u8 = 0x42;

    /// Scenario on `engine` with the default pattern.
    pub fn new(engine: &'a Engine) -> Self {
        Self {
            engine,
            pattern: vec![Self::DEFAULT_PATTERN],
        }
    }

    /// Use `pattern` for the delta body.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &[u8]) -> Self {
        self.pattern = pattern.to_vec();
        self
    }

    /// Run the attack on `message` with a key drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeltaTooShort` if `message` is shorter than the checksum.
    pub fn run<R: RngCore + ?Sized>(&self, message: &[u8], rng: &mut R) -> Result<TamperOutcome> {
        let key = random_key(rng, message.len());
        let ciphertext = encrypt(&key, message)?;

        // Attacker side: only the ciphertext and the message length are known.
        let delta = forge_delta(self.engine, &self.pattern, message.len())?;
        let tampered_ciphertext = xor(&delta, &ciphertext)?;

        let tampered_message = decrypt(&key, &tampered_ciphertext)?;
        let outcome = TamperOutcome {
            original_crc: self.engine.checksum(message),
            tampered_crc: self.engine.checksum(&tampered_message),
            message: message.to_vec(),
            key,
            ciphertext,
            delta,
            tampered_ciphertext,
            tampered_message,
        };

        debug!(
            len = message.len(),
            preserved = outcome.checksum_preserved(),
            "Tampering scenario finished"
        );
        Ok(outcome)
    }
}
