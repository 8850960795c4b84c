//! Fixed-width words and their bit patterns

use std::fmt;

use crate::error::ConfigurationError;

/// Width of the words handled by a synthesis run
///
/// Only a closed set of widths is recognized. The width determines the encoding of both
/// operands and results, and the number of output expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    /// 2-bit words, small enough for fully exhaustive tables
    W2,
    /// 8-bit words
    W8,
    /// 32-bit words
    W32,
    /// 64-bit words
    W64,
}

impl Width {
    /// Number of bits in a word
    pub fn bits(&self) -> usize {
        match self {
            Width::W2 => 2,
            Width::W8 => 8,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }

    /// Mask keeping the low bits of a value
    pub fn mask(&self) -> u64 {
        match self {
            Width::W64 => !0,
            w => (1u64 << w.bits()) - 1,
        }
    }

    /// Returns true if the value is representable without truncation
    pub fn fits(&self, value: u64) -> bool {
        value & !self.mask() == 0
    }
}

impl TryFrom<usize> for Width {
    type Error = ConfigurationError;

    fn try_from(bits: usize) -> Result<Width, ConfigurationError> {
        match bits {
            2 => Ok(Width::W2),
            8 => Ok(Width::W8),
            32 => Ok(Width::W32),
            64 => Ok(Width::W64),
            _ => Err(ConfigurationError::UnsupportedWidth(bits)),
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// A value reduced to a fixed width
///
/// Bits are indexed by significance: bit 0 is the least significant bit.
/// The string representation is most-significant-bit first, padded to the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitVector {
    value: u64,
    width: Width,
}

impl BitVector {
    /// Create a bit vector, truncating the value to the width
    pub fn new(value: u64, width: Width) -> BitVector {
        BitVector {
            value: value & width.mask(),
            width,
        }
    }

    /// Raw value, already reduced to the width
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Width of the vector
    pub fn width(&self) -> Width {
        self.width
    }

    /// Value of the bit at index i
    pub fn bit(&self, i: usize) -> bool {
        assert!(i < self.width.bits());
        (self.value >> i) & 1 != 0
    }

    /// Number of bits set
    pub fn count_ones(&self) -> usize {
        self.value.count_ones() as usize
    }

    /// Indices of the bits set, in increasing order
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width.bits()).filter(move |i| self.bit(*i))
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0w$b}", self.value, w = self.width.bits())
    }
}
