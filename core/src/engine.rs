//! CRC engine: forward computation and suffix forgery.
//!
//! The register update `crc = (crc >> 8) ^ T[(crc ^ byte) & 0xFF]` is linear
//! over XOR, and the top byte of `T[i]` determines `i` uniquely. Walking the
//! update backwards from a target therefore fixes which table entry each of
//! the last `width_bytes` steps must use; walking forwards from the real
//! register then tells which input byte selects that entry.
//!
//! # Example
//!
//! ```
//! use crcforge_core::Engine;
//!
//! let crc32 = Engine::new(0x1DB710640, 0xFFFF_FFFF, 0xFFFF_FFFF).unwrap();
//! assert_eq!(crc32.checksum(b"123456789"), 0xCBF4_3926);
//!
//! let forged = crc32.forge(b"hello", 0xDEAD_BEEF).unwrap();
//! assert_eq!(&forged[..5], b"hello");
//! assert_eq!(crc32.checksum(&forged), 0xDEAD_BEEF);
//! ```

use crate::error::{Error, Result};
use crate::table::{width_mask, ForwardTable, InverseTable};
use tracing::{debug, trace};

/// Reflected table-driven CRC of 1 to 8 bytes, with its inverse table.
///
/// Immutable after construction; `compute` and `forge` only read it, so an
/// engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    polynomial: u128,
    init_xor: u64,
    end_xor: u64,
    mask: u64,
    forward: ForwardTable,
    inverse: InverseTable,
}

impl Engine {
    /// Create an engine for `polynomial` in reciprocal form.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPolynomial` if the bit length is not `8 * n + 1`, `n` in 1..=8
    /// - `Error::ValueOutOfRange` if a mask is wider than the checksum
    /// - `Error::NonInvertibleTable` if forgery would be ambiguous
    pub fn new(polynomial: u128, init_xor: u64, end_xor: u64) -> Result<Self> {
        let forward = ForwardTable::new(polynomial)?;
        let width_bytes = forward.width_bytes();
        let mask = width_mask(width_bytes);

        check_range(init_xor, mask, width_bytes)?;
        check_range(end_xor, mask, width_bytes)?;

        let inverse = InverseTable::from_forward(&forward);
        inverse.check()?;

        debug!(
            polynomial = %format!("{polynomial:#x}"),
            width_bytes,
            "CRC engine ready"
        );

        Ok(Self {
            polynomial,
            init_xor,
            end_xor,
            mask,
            forward,
            inverse,
        })
    }

    /// Checksum of `data`, continuing from `seed`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValueOutOfRange` if `seed` is wider than the checksum.
    pub fn compute(&self, data: &[u8], seed: u64) -> Result<u64> {
        self.check_value(seed)?;
        Ok(self.update(seed ^ self.init_xor, data) ^ self.end_xor)
    }

    /// Checksum of `data` from a zero seed.
    #[inline]
    pub fn checksum(&self, data: &[u8]) -> u64 {
        self.update(self.init_xor, data) ^ self.end_xor
    }

    /// Verify the checksum of `data` matches `expected`.
    #[inline]
    pub fn verify(&self, data: &[u8], expected: u64) -> bool {
        self.checksum(data) == expected
    }

    /// Append `width_bytes` bytes to `data` so its checksum becomes `target`.
    ///
    /// The original bytes are left untouched.
    ///
    /// # Errors
    ///
    /// - `Error::ValueOutOfRange` if `target` is wider than the checksum
    /// - `Error::ForgeryMismatch` if the suffix fails its own consistency check
    pub fn forge(&self, data: &[u8], target: u64) -> Result<Vec<u8>> {
        let suffix = self.forge_suffix(data, target)?;
        let mut forged = Vec::with_capacity(data.len() + suffix.len());
        forged.extend_from_slice(data);
        forged.extend_from_slice(&suffix);
        Ok(forged)
    }

    /// The `width_bytes` bytes [`Engine::forge`] would append.
    pub fn forge_suffix(&self, data: &[u8], target: u64) -> Result<Vec<u8>> {
        self.check_value(target)?;
        let width = self.width_bytes();
        let shift = self.forward.top_shift();

        // Backward: peel one table entry per step off the wanted register.
        let wanted = target ^ self.end_xor;
        let mut indices = vec![0u8; width];
        let mut states = vec![0u64; width + 1];
        let mut prev = wanted;
        states[width] = prev;
        for step in (0..width).rev() {
            let head = (prev >> shift) as u8;
            let index = self.inverse.get(head);
            indices[step] = index;
            prev = ((prev ^ self.forward.get(index)) << 8) & self.mask;
            states[step] = prev;
        }

        // Forward: pick the byte that steers the real register into each entry.
        states[0] = self.update(self.init_xor, data);
        let mut suffix = Vec::with_capacity(width);
        for step in 0..width {
            suffix.push((states[step] as u8) ^ indices[step]);
            states[step + 1] = (states[step] >> 8) ^ self.forward.get(indices[step]);
        }

        let reached = states[width];
        if reached != wanted {
            return Err(Error::ForgeryMismatch {
                expected: wanted,
                actual: reached,
            });
        }

        trace!(data_len = data.len(), target, "Forged suffix");
        Ok(suffix)
    }

    /// Raw register state after `data`, starting from `register`.
    ///
    /// No masks are applied. Exposed for searches that fix a prefix once.
    #[inline]
    pub fn update(&self, register: u64, data: &[u8]) -> u64 {
        data.iter().fold(register, |crc, &byte| {
            (crc >> 8) ^ self.forward.get((crc as u8) ^ byte)
        })
    }

    /// Polynomial in reciprocal form, as given.
    #[inline]
    pub fn polynomial(&self) -> u128 {
        self.polynomial
    }

    /// Mask applied to the register before the first byte.
    #[inline]
    pub fn init_xor(&self) -> u64 {
        self.init_xor
    }

    /// Mask applied to the register after the last byte.
    #[inline]
    pub fn end_xor(&self) -> u64 {
        self.end_xor
    }

    /// Checksum width in bytes.
    #[inline]
    pub fn width_bytes(&self) -> usize {
        self.forward.width_bytes()
    }

    /// Checksum width in bits.
    #[inline]
    pub fn width_bits(&self) -> u32 {
        (self.width_bytes() * 8) as u32
    }

    /// Mask of all valid checksum bits.
    #[inline]
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// The forward (per-byte step) table.
    pub fn forward_table(&self) -> &ForwardTable {
        &self.forward
    }

    /// The top-byte inverse table.
    pub fn inverse_table(&self) -> &InverseTable {
        &self.inverse
    }

    fn check_value(&self, value: u64) -> Result<()> {
        check_range(value, self.mask, self.width_bytes())
    }
}

fn check_range(value: u64, mask: u64, width_bytes: usize) -> Result<()> {
    if value & !mask != 0 {
        return Err(Error::ValueOutOfRange { value, width_bytes });
    }
    Ok(())
}
