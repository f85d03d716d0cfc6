//! Forward and inverse lookup tables for reflected CRCs.
//!
//! The forward table is the classic 256-entry table of a reflected,
//! byte-at-a-time CRC. The inverse table maps the top byte of each forward
//! entry back to the byte index that produced it, which is what makes the
//! register update reversible.

use crate::error::{Error, Result};

/// Number of entries in both tables.
pub const TABLE_SIZE: usize = 256;

/// Largest supported checksum width in bytes.
pub const MAX_WIDTH_BYTES: usize = 8;

/// Derive the checksum width in bytes from a reciprocal-form polynomial.
///
/// The implicit leading bit must sit at bit `8 * width_bytes`, so the bit
/// length must be `8 * n + 1` with `n` in `1..=8`.
///
/// # Example
///
/// ```
/// use crcforge_core::table::polynomial_width;
///
/// assert_eq!(polynomial_width(0x1DB710640).unwrap(), 4);
/// assert_eq!(polynomial_width(0x1E9).unwrap(), 1);
/// assert!(polynomial_width(0x3DB710640).is_err());
/// ```
pub fn polynomial_width(polynomial: u128) -> Result<usize> {
    let bits = u128::BITS - polynomial.leading_zeros();
    let invalid = Error::InvalidPolynomial { polynomial, bits };

    if bits < 9 || (bits - 1) % 8 != 0 {
        return Err(invalid);
    }
    let width_bytes = ((bits - 1) / 8) as usize;
    if width_bytes > MAX_WIDTH_BYTES {
        return Err(invalid);
    }
    Ok(width_bytes)
}

/// Mask covering `width_bytes` low bytes of a register.
#[inline]
pub const fn width_mask(width_bytes: usize) -> u64 {
    if width_bytes >= MAX_WIDTH_BYTES {
        u64::MAX
    } else {
        (1u64 << (width_bytes * 8)) - 1
    }
}

/// Generate forward table entries for the reduced polynomial.
///
/// XOR-then-shift of the full polynomial drops its bit 0, so stepping with
/// `polynomial >> 1` after the shift yields the same table.
const fn generate_table(reduced: u64) -> [u64; TABLE_SIZE] {
    let mut table = [0u64; TABLE_SIZE];
    let mut i = 0;
    while i < TABLE_SIZE {
        let mut crc = i as u64;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ reduced;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// One reflected CRC step for every byte value, with a zero low register byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTable {
    entries: [u64; TABLE_SIZE],
    width_bytes: usize,
}

impl ForwardTable {
    /// Build the table for a polynomial in reciprocal form.
    pub fn new(polynomial: u128) -> Result<Self> {
        let width_bytes = polynomial_width(polynomial)?;
        let reduced = (polynomial >> 1) as u64;
        Ok(Self {
            entries: generate_table(reduced),
            width_bytes,
        })
    }

    /// Wrap precomputed entries.
    ///
    /// Entries are masked to the width. Mainly useful for exercising the
    /// inverse builder on tables no polynomial produces.
    pub fn from_entries(mut entries: [u64; TABLE_SIZE], width_bytes: usize) -> Self {
        let width_bytes = width_bytes.clamp(1, MAX_WIDTH_BYTES);
        let mask = width_mask(width_bytes);
        for entry in &mut entries {
            *entry &= mask;
        }
        Self {
            entries,
            width_bytes,
        }
    }

    /// Table entry for `index`.
    #[inline]
    pub fn get(&self, index: u8) -> u64 {
        self.entries[index as usize]
    }

    /// All 256 entries.
    #[inline]
    pub fn entries(&self) -> &[u64; TABLE_SIZE] {
        &self.entries
    }

    /// Checksum width in bytes.
    #[inline]
    pub fn width_bytes(&self) -> usize {
        self.width_bytes
    }

    /// Shift that brings the register's top byte down to bits 0..8.
    #[inline]
    pub fn top_shift(&self) -> u32 {
        ((self.width_bytes - 1) * 8) as u32
    }

    /// Top byte of the entry for `index`.
    #[inline]
    pub fn top_byte(&self, index: u8) -> u8 {
        (self.get(index) >> self.top_shift()) as u8
    }
}

/// A top byte claimed by more than one forward entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// The contested top byte.
    pub top_byte: u8,
    /// Index kept in the inverse table (the lowest one).
    pub kept: u8,
    /// Later index that produced the same top byte.
    pub dropped: u8,
}

/// Reverse lookup from a forward entry's top byte to its index.
///
/// Ties are broken by keeping the lowest index. Collisions and unfilled
/// slots are recorded so callers can refuse a non-bijective table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverseTable {
    entries: [u8; TABLE_SIZE],
    collisions: Vec<Collision>,
    missing: Vec<u8>,
}

impl InverseTable {
    /// Build the inverse of `forward` in a single scan.
    pub fn from_forward(forward: &ForwardTable) -> Self {
        let mut entries = [0u8; TABLE_SIZE];
        let mut filled = [false; TABLE_SIZE];
        let mut collisions = Vec::new();

        for index in 0..=u8::MAX {
            let top = forward.top_byte(index);
            let slot = top as usize;
            if filled[slot] {
                collisions.push(Collision {
                    top_byte: top,
                    kept: entries[slot],
                    dropped: index,
                });
            } else {
                entries[slot] = index;
                filled[slot] = true;
            }
        }

        let missing = (0..=u8::MAX).filter(|&top| !filled[top as usize]).collect();

        Self {
            entries,
            collisions,
            missing,
        }
    }

    /// Index whose forward entry has `top` as its top byte.
    ///
    /// Returns 0 for a top byte nothing produced; see [`InverseTable::check`].
    #[inline]
    pub fn get(&self, top: u8) -> u8 {
        self.entries[top as usize]
    }

    /// All 256 entries.
    #[inline]
    pub fn entries(&self) -> &[u8; TABLE_SIZE] {
        &self.entries
    }

    /// Collisions met while building, in scan order.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Top bytes no forward entry produced.
    pub fn missing(&self) -> &[u8] {
        &self.missing
    }

    /// Whether every top byte has exactly one preimage.
    #[inline]
    pub fn is_bijective(&self) -> bool {
        self.collisions.is_empty()
    }

    /// Fail with the first defect if the table is not a bijection.
    pub fn check(&self) -> Result<()> {
        if let Some(collision) = self.collisions.first() {
            return Err(Error::NonInvertibleTable {
                top_byte: collision.top_byte,
                first: Some(collision.kept),
                second: Some(collision.dropped),
            });
        }
        if let Some(&top_byte) = self.missing.first() {
            return Err(Error::NonInvertibleTable {
                top_byte,
                first: None,
                second: None,
            });
        }
        Ok(())
    }
}
