//! Builtin operations to synthesize
//!
//! The synthesis core accepts any pure function of two operands. These are the operations
//! exposed on the command line; all of them wrap around, and the result is truncated to the
//! configured width by the table generator.

use std::fmt;

use clap::ValueEnum;

/// A builtin binary operation over 64b words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum BuiltinOp {
    /// Wrapping addition
    Add,
    /// Wrapping subtraction
    Sub,
    /// Wrapping multiplication
    Mul,
    /// Bitwise and
    And,
    /// Bitwise or
    Or,
    /// Bitwise xor
    Xor,
}

impl BuiltinOp {
    /// Apply the operation
    pub fn apply(&self, a: u64, b: u64) -> u64 {
        use BuiltinOp::*;
        match self {
            Add => a.wrapping_add(b),
            Sub => a.wrapping_sub(b),
            Mul => a.wrapping_mul(b),
            And => a & b,
            Or => a | b,
            Xor => a ^ b,
        }
    }

    /// Symbol used when printing the operation
    pub fn symbol(&self) -> &'static str {
        use BuiltinOp::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            And => "&",
            Or => "|",
            Xor => "^",
        }
    }

    /// Whether the operation is mathematically commutative
    ///
    /// This is only a hint: unordered enumeration is never selected automatically.
    pub fn is_commutative(&self) -> bool {
        !matches!(self, BuiltinOp::Sub)
    }

    /// Closure form, as accepted by the synthesis core
    pub fn as_fn(self) -> impl Fn(u64, u64) -> u64 {
        move |a, b| self.apply(a, b)
    }
}

impl fmt::Display for BuiltinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
