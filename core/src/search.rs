//! Exhaustive suffix search.
//!
//! The algebraic [`Engine::forge`] always needs exactly `width_bytes` bytes.
//! This search is the slow alternative: it tries every suffix of a fixed
//! length up to 4 bytes, so it can also find shorter suffixes when the target
//! happens to be reachable. It is bounded by a candidate limit and can be
//! cancelled from another thread.
//!
//! # Example
//!
//! ```
//! use crcforge_core::{BruteForce, Preset};
//!
//! let crc8 = Preset::Crc8.engine().unwrap();
//! let forged = BruteForce::new(1).unwrap().search(&crc8, b"data", 0x42).unwrap();
//! assert_eq!(crc8.checksum(&forged), 0x42);
//! ```

use crate::engine::Engine;
use crate::error::{Error, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Longest suffix the search will enumerate.
pub const MAX_SUFFIX_LEN: usize = 4;

/// Bounded, cancellable parallel search over fixed-length suffixes.
#[derive(Debug, Clone)]
pub struct BruteForce {
    suffix_len: usize,
    limit: u64,
    cancel: Option<Arc<AtomicBool>>,
}

impl BruteForce {
    /// Search all suffixes of `suffix_len` bytes (1..=4).
    pub fn new(suffix_len: usize) -> Result<Self> {
        if suffix_len == 0 || suffix_len > MAX_SUFFIX_LEN {
            return Err(Error::InvalidSuffixLength { len: suffix_len });
        }
        Ok(Self {
            suffix_len,
            limit: u64::MAX,
            cancel: None,
        })
    }

    /// Stop after `limit` candidates.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Abort as soon as `flag` is set.
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Suffix length in bytes.
    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    /// Number of distinct suffixes of this length.
    pub fn space(&self) -> u64 {
        1u64 << (8 * self.suffix_len)
    }

    /// Number of candidates a full search visits.
    pub fn bound(&self) -> u64 {
        self.space().min(self.limit)
    }

    /// Find a suffix that gives `data` the checksum `target`.
    ///
    /// Candidates are enumerated as little-endian integers; the lowest
    /// matching one is returned, appended to `data`.
    ///
    /// # Errors
    ///
    /// - `Error::ValueOutOfRange` if `target` is wider than the checksum
    /// - `Error::SearchExhausted` if no candidate within the bound matches
    /// - `Error::SearchCancelled` if the cancellation flag was raised before
    ///   the scan finished
    pub fn search(&self, engine: &Engine, data: &[u8], target: u64) -> Result<Vec<u8>> {
        if target & !engine.mask() != 0 {
            return Err(Error::ValueOutOfRange {
                value: target,
                width_bytes: engine.width_bytes(),
            });
        }

        let len = self.suffix_len;
        let prefix = engine.update(engine.init_xor(), data);
        let wanted = target ^ engine.end_xor();
        let bound = self.bound();
        let matches = |candidate: u64| engine.update(prefix, &candidate.to_le_bytes()[..len]) == wanted;

        debug!(suffix_len = len, bound, "Starting brute-force search");

        // Set only when a worker saw the flag mid-scan
        let interrupted = AtomicBool::new(false);
        let found = (0..bound).into_par_iter().find_first(|&candidate| {
            if self.is_cancelled() {
                interrupted.store(true, Ordering::Relaxed);
                return true;
            }
            matches(candidate)
        });

        match found {
            Some(candidate) if matches(candidate) => {
                let mut forged = Vec::with_capacity(data.len() + len);
                forged.extend_from_slice(data);
                forged.extend_from_slice(&candidate.to_le_bytes()[..len]);
                debug!(candidate, "Brute-force search matched");
                Ok(forged)
            }
            _ if interrupted.load(Ordering::Relaxed) => Err(Error::SearchCancelled),
            _ => {
                warn!(tried = bound, "Brute-force search exhausted");
                Err(Error::SearchExhausted { tried: bound })
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Preset;

    #[test]
    fn rejects_bad_lengths() {
        assert_eq!(
            BruteForce::new(0).unwrap_err(),
            Error::InvalidSuffixLength { len: 0 }
        );
        assert!(BruteForce::new(5).is_err());
        assert!(BruteForce::new(4).is_ok());
    }

    #[test]
    fn bound_respects_limit() {
        let search = BruteForce::new(2).unwrap();
        assert_eq!(search.space(), 65_536);
        assert_eq!(search.bound(), 65_536);
        assert_eq!(search.with_limit(100).bound(), 100);
        assert_eq!(BruteForce::new(4).unwrap().space(), 1 << 32);
    }

    #[test]
    fn finds_single_byte_for_crc8() {
        let engine = Preset::Crc8.engine().unwrap();
        let search = BruteForce::new(1).unwrap();
        for target in [0x00, 0x42, 0xEF, 0xFF] {
            let forged = search.search(&engine, b"prefix", target).unwrap();
            assert_eq!(forged.len(), 7);
            assert_eq!(engine.checksum(&forged), target);
        }
    }

    #[test]
    fn finds_two_byte_suffix_for_crc32() {
        let engine = Preset::Crc32.engine().unwrap();
        let target = engine.checksum(b"payload\x12\x34");
        let forged = BruteForce::new(2)
            .unwrap()
            .search(&engine, b"payload", target)
            .unwrap();
        assert_eq!(forged, b"payload\x12\x34");
    }

    #[test]
    fn agrees_with_algebraic_forge_for_crc8() {
        let engine = Preset::Crc8.engine().unwrap();
        let brute = BruteForce::new(1)
            .unwrap()
            .search(&engine, b"abc", 0x5A)
            .unwrap();
        assert_eq!(brute, engine.forge(b"abc", 0x5A).unwrap());
    }

    #[test]
    fn exhausts_under_tight_limit() {
        let engine = Preset::Crc32.engine().unwrap();
        let target = engine.checksum(b"x\xFF\xFF");
        let result = BruteForce::new(2)
            .unwrap()
            .with_limit(10)
            .search(&engine, b"x", target);
        assert_eq!(result, Err(Error::SearchExhausted { tried: 10 }));
    }

    #[test]
    fn honours_cancellation() {
        let engine = Preset::Crc32.engine().unwrap();
        let flag = Arc::new(AtomicBool::new(true));
        let result = BruteForce::new(4)
            .unwrap()
            .with_cancel(flag)
            .search(&engine, b"x", 0xDEAD_BEEF);
        assert_eq!(result, Err(Error::SearchCancelled));
    }

    #[test]
    fn cancellation_without_a_scan_reports_exhaustion() {
        let engine = Preset::Crc32.engine().unwrap();
        let flag = Arc::new(AtomicBool::new(true));
        let result = BruteForce::new(2)
            .unwrap()
            .with_limit(0)
            .with_cancel(flag)
            .search(&engine, b"x", 0xDEAD_BEEF);
        assert_eq!(result, Err(Error::SearchExhausted { tried: 0 }));
    }

    #[test]
    fn rejects_wide_target() {
        let engine = Preset::Crc8.engine().unwrap();
        assert!(matches!(
            BruteForce::new(1).unwrap().search(&engine, b"", 0x100),
            Err(Error::ValueOutOfRange { .. })
        ));
    }
}
