//! Sum-of-products synthesis of fixed-width arithmetic operations
//!
//! This crate derives a boolean expression for each output bit of a binary operation over
//! fixed-width words, such as addition or multiplication, by brute force: every pair of
//! operands of a domain is enumerated, and the resulting truth table is turned into one
//! sum-of-products expression per output bit.
//!
//! # Usage
//!
//! ```bash
//! # Show available commands
//! bitsynth help
//! # Expressions for a 2-bit adder
//! bitsynth synth --op add -w 2
//! # Truth table of 8-bit multiplication on small operands
//! bitsynth table --op mul -w 8 --max 16
//! # Export the expressions as a netlist
//! bitsynth synth --op add -w 8 --max 32 -o adder.bench
//! ```
//!
//! # Algorithm
//!
//! The synthesis runs in three steps:
//! * the [`TruthTable`] is generated by applying the operation to all pairs of operands,
//!   with results truncated to the width;
//! * for each output bit, [`extract_minterms`] collects one term per row setting this bit;
//!   a term is the And of the operand bits that are set in the row, named `a{i}` and `b{i}`;
//! * [`simplify`] removes terms whose literals all appear in another term of the same output,
//!   until a fixpoint is reached.
//!
//! For example, here are the expressions of a 2-bit adder:
//! ```
//! # use bitsynth::{Domain, SynthesisConfig, Synthesizer};
//! let config = SynthesisConfig::new(2).unwrap();
//! let synthesis = Synthesizer::new(config)
//!     .domain(Domain::range(0..4).unwrap())
//!     .operation(|a, b| a + b)
//!     .run()
//!     .unwrap();
//! assert_eq!(
//!     synthesis.expressions.output(0).to_string(),
//!     "a1.b0.b1 + a0.a1.b1"
//! );
//! ```
//!
//! # Limitations
//!
//! Terms only contain positive literals: they keep the operand pair they come from, but do not
//! print or evaluate its bits that are not set. The simplification is a greedy subsumption
//! filter, far from an exact prime implicant selection. Enumeration is quadratic in the domain
//! size, so full 32b or 64b domains are out of reach: domains are bounded explicitly.

#![warn(missing_docs)]

pub mod bits;
pub mod cmd;
pub mod domain;
pub mod error;
pub mod io;
pub mod logic;
pub mod ops;
pub mod synth;
pub mod table;

pub use bits::{BitVector, Width};
pub use domain::{validate_group, Domain};
pub use error::{ConfigurationError, DomainViolation, Result, SynthError};
pub use logic::{extract_minterms, simplify, Expressions, Term};
pub use synth::{synthesize, Synthesis, SynthesisConfig, Synthesizer};
pub use table::{Pairing, TruthTable};
