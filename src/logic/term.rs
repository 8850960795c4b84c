use std::fmt;

use crate::bits::{BitVector, Width};
use crate::table::OperandPair;

/// Role of an input bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operand {
    /// First operand, literals named a0, a1, ...
    A,
    /// Second operand, literals named b0, b1, ...
    B,
}

/// Reference to an input bit, always asserted
///
/// There is no negated literal: terms are restricted to positive literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    /// Operand the bit belongs to
    pub operand: Operand,
    /// Index of the bit, 0 being the least significant
    pub index: usize,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Operand::A => write!(f, "a{}", self.index),
            Operand::B => write!(f, "b{}", self.index),
        }
    }
}

/// Both operand bit vectors of a table row, concatenated
///
/// Positions 0..W are the bits of the first operand, positions W..2W those of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MintermKey {
    first: BitVector,
    second: BitVector,
}

impl MintermKey {
    /// Create a key from both operands
    pub fn new(first: BitVector, second: BitVector) -> MintermKey {
        MintermKey { first, second }
    }

    /// First operand
    pub fn first(&self) -> BitVector {
        self.first
    }

    /// Second operand
    pub fn second(&self) -> BitVector {
        self.second
    }

    /// Number of positions in the key
    pub fn len(&self) -> usize {
        self.first.width().bits() + self.second.width().bits()
    }

    /// Always false: keys contain both operands
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value at a position; false when out of range
    pub fn get(&self, i: usize) -> bool {
        let w = self.first.width().bits();
        if i < w {
            self.first.bit(i)
        } else if i < self.len() {
            self.second.bit(i - w)
        } else {
            false
        }
    }

    /// Positions set in the key
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        let w = self.first.width().bits();
        self.first.ones().chain(self.second.ones().map(move |i| i + w))
    }
}

impl fmt::Display for MintermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}

/// Conjunction of asserted literals, derived from one table row
///
/// The term keeps the full operand pair it was derived from. The key identifies the term;
/// its printed form only lists the literals that are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term {
    key: MintermKey,
}

impl Term {
    /// Create the term of a pair of operands
    pub fn new(first: BitVector, second: BitVector) -> Term {
        Term {
            key: MintermKey::new(first, second),
        }
    }

    /// Create the term from raw operand values
    pub fn from_values(a: u64, b: u64, width: Width) -> Term {
        Term::new(BitVector::new(a, width), BitVector::new(b, width))
    }

    /// Create the term of a table row
    pub fn from_pair(pair: &OperandPair) -> Term {
        Term::new(pair.first, pair.second)
    }

    /// Identity of the term
    pub fn key(&self) -> &MintermKey {
        &self.key
    }

    /// Literals of the term: those of the first operand, then those of the second
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        let a = self.key.first.ones().map(|index| Literal {
            operand: Operand::A,
            index,
        });
        let b = self.key.second.ones().map(|index| Literal {
            operand: Operand::B,
            index,
        });
        a.chain(b)
    }

    /// Number of literals
    pub fn nb_literals(&self) -> usize {
        self.key.first.count_ones() + self.key.second.count_ones()
    }

    /// Returns true if every position set in the other term is also set in this one
    ///
    /// Positions are compared up to the length of the shorter key. A position set in the
    /// other term beyond that length is never covered.
    pub fn covers(&self, other: &Term) -> bool {
        let len = self.key.len().min(other.key.len());
        other.key.ones().all(|i| i < len && self.key.get(i))
    }

    /// Minterm reading: true only for the exact operand pair of the term
    pub fn matches(&self, a: u64, b: u64) -> bool {
        let mask_a = self.key.first.width().mask();
        let mask_b = self.key.second.width().mask();
        a & mask_a == self.key.first.value() && b & mask_b == self.key.second.value()
    }

    /// Literal reading: true when every literal of the term is set
    pub fn implies(&self, a: u64, b: u64) -> bool {
        let fa = self.key.first.value();
        let fb = self.key.second.value();
        a & fa == fa && b & fb == fb
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nb_literals() == 0 {
            return write!(f, "1");
        }
        let st = self
            .literals()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", st)
    }
}
