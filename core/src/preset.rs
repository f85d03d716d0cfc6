//! Named CRC parameter sets.
//!
//! Polynomials are in the engine's reciprocal form (reflected generator
//! shifted left by one, leading bit at `8 * width_bytes`).

use crate::engine::Engine;
use crate::error::Result;
use std::fmt;
use std::str::FromStr;

/// Catalogued reflected CRCs the engine can reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// CRC-32 (ISO-HDLC): Ethernet, ZIP, PNG
    Crc32,
    /// CRC-32C (Castagnoli): iSCSI, ext4, SCTP
    Crc32c,
    /// CRC-64/XZ (ECMA-182 generator)
    Crc64Xz,
    /// CRC-64/GO-ISO (ISO 3309 generator)
    Crc64GoIso,
    /// 8-bit CRC on generator `0x1E9` with zero masks
    Crc8,
}

impl Preset {
    /// Every preset, in catalogue order.
    pub const ALL: [Preset; 5] = [
        Preset::Crc32,
        Preset::Crc32c,
        Preset::Crc64Xz,
        Preset::Crc64GoIso,
        Preset::Crc8,
    ];

    /// Polynomial in reciprocal form.
    pub const fn polynomial(self) -> u128 {
        match self {
            Preset::Crc32 => 0x1_DB71_0640,
            Preset::Crc32c => 0x1_05EC_76F1,
            Preset::Crc64Xz => 0x1_92D8_AF2B_AF0E_1E85,
            Preset::Crc64GoIso => 0x1_B000_0000_0000_0001,
            Preset::Crc8 => 0x1E9,
        }
    }

    /// Register mask applied before the first byte.
    pub const fn init_xor(self) -> u64 {
        match self {
            Preset::Crc32 | Preset::Crc32c => 0xFFFF_FFFF,
            Preset::Crc64Xz | Preset::Crc64GoIso => u64::MAX,
            Preset::Crc8 => 0,
        }
    }

    /// Register mask applied after the last byte.
    pub const fn end_xor(self) -> u64 {
        // All catalogued presets use symmetric masks
        self.init_xor()
    }

    /// Canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            Preset::Crc32 => "crc32",
            Preset::Crc32c => "crc32c",
            Preset::Crc64Xz => "crc64-xz",
            Preset::Crc64GoIso => "crc64-go-iso",
            Preset::Crc8 => "crc8",
        }
    }

    /// Checksum of `"123456789"`.
    pub const fn check(self) -> u64 {
        match self {
            Preset::Crc32 => 0xCBF4_3926,
            Preset::Crc32c => 0xE306_9283,
            Preset::Crc64Xz => 0x995D_C9BB_DF19_39FA,
            Preset::Crc64GoIso => 0xB909_56C7_75A4_1001,
            Preset::Crc8 => 0x43,
        }
    }

    /// Build an engine for this preset.
    pub fn engine(self) -> Result<Engine> {
        Engine::new(self.polynomial(), self.init_xor(), self.end_xor())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown CRC preset: {name}")]
pub struct UnknownPreset {
    /// The name that failed to parse.
    pub name: String,
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    /// Case-insensitive; `-` and `_` are ignored, so `CRC-32C` and `crc_32c` both parse.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "crc32" | "crc32isohdlc" => Ok(Preset::Crc32),
            "crc32c" | "crc32castagnoli" => Ok(Preset::Crc32c),
            "crc64xz" | "crc64ecma" => Ok(Preset::Crc64Xz),
            "crc64goiso" | "crc64iso" => Ok(Preset::Crc64GoIso),
            "crc8" => Ok(Preset::Crc8),
            _ => Err(UnknownPreset {
                name: s.to_string(),
            }),
        }
    }
}
