//! Error types for crcforge-core.
//!
//! All errors are explicit values; nothing in the engine panics on bad input.
//!
//! # Error Categories
//!
//! - **Construction errors**: `InvalidPolynomial`, `NonInvertibleTable`
//! - **Range errors**: `ValueOutOfRange`
//! - **Forgery errors**: `ForgeryMismatch`
//! - **Search errors**: `InvalidSuffixLength`, `SearchExhausted`, `SearchCancelled`
//! - **Tampering errors**: `LengthMismatch`, `DeltaTooShort`

/// Result type alias for crcforge-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during crcforge-core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    // ==================== Construction Errors ====================
    /// Polynomial bit length does not describe a whole number of bytes.
    ///
    /// The implicit leading bit must sit at bit `8 * width_bytes`, with
    /// `width_bytes` between 1 and 8.
    #[error("invalid polynomial {polynomial:#x}: bit length {bits} is not 8*n+1 for n in 1..=8")]
    InvalidPolynomial {
        /// The rejected polynomial.
        polynomial: u128,
        /// Its bit length.
        bits: u32,
    },

    /// The forward table's top bytes are not a permutation of 0..=255.
    ///
    /// `second` is `None` when `top_byte` is produced by no input at all.
    #[error("forward table is not invertible at top byte {top_byte:#04x} (first {first:?}, second {second:?})")]
    NonInvertibleTable {
        /// Top byte with zero or several preimages.
        top_byte: u8,
        /// Lowest input byte producing `top_byte`, if any.
        first: Option<u8>,
        /// Next input byte producing `top_byte`, if any.
        second: Option<u8>,
    },

    // ==================== Range Errors ====================
    /// A mask, seed or target does not fit in the checksum width.
    #[error("value {value:#x} does not fit in {width_bytes} byte(s)")]
    ValueOutOfRange {
        /// The rejected value.
        value: u64,
        /// Checksum width in bytes.
        width_bytes: usize,
    },

    // ==================== Forgery Errors ====================
    /// The forged suffix did not drive the register to the requested state.
    #[error("forgery mismatch: expected register {expected:#x}, got {actual:#x}")]
    ForgeryMismatch {
        /// Register value required before the final mask.
        expected: u64,
        /// Register value actually reached.
        actual: u64,
    },

    // ==================== Search Errors ====================
    /// Brute-force suffix length outside 1..=4.
    #[error("invalid brute-force suffix length {len}, expected 1..=4")]
    InvalidSuffixLength {
        /// Requested length.
        len: usize,
    },

    /// Every candidate within the search bound was tried without a match.
    #[error("search exhausted after {tried} candidates")]
    SearchExhausted {
        /// Number of candidates in the searched range.
        tried: u64,
    },

    /// The search was cancelled through its cancellation flag.
    #[error("search cancelled")]
    SearchCancelled,

    // ==================== Tampering Errors ====================
    /// Key and data lengths don't match for a XOR stream operation.
    #[error("length mismatch: key has {key_len} bytes, data has {data_len} bytes")]
    LengthMismatch {
        /// Length of the key.
        key_len: usize,
        /// Length of the data.
        data_len: usize,
    },

    /// A tampering delta cannot be shorter than the checksum width.
    #[error("delta of {len} bytes cannot carry a {width_bytes}-byte forged suffix")]
    DeltaTooShort {
        /// Requested delta length.
        len: usize,
        /// Checksum width in bytes.
        width_bytes: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = Error::ValueOutOfRange {
            value: 0x1FF,
            width_bytes: 1,
        };
        assert_eq!(err.to_string(), "value 0x1ff does not fit in 1 byte(s)");

        let err = Error::InvalidPolynomial {
            polynomial: 0x3FF,
            bits: 10,
        };
        assert!(err.to_string().contains("0x3ff"));
        assert!(err.to_string().contains("bit length 10"));

        let err = Error::SearchCancelled;
        assert_eq!(err.to_string(), "search cancelled");
    }

    #[test]
    fn error_implements_std_error() {
        let err = Error::SearchCancelled;
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn error_is_clone_and_eq() {
        let err1 = Error::ForgeryMismatch {
            expected: 123,
            actual: 456,
        };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
