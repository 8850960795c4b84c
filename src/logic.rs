//! Sum-of-products expressions derived from a truth table
//!
//! Each output bit of the operation gets an expression: a list of terms implicitly Or'ed.
//! Terms only contain asserted literals of the input bits, and are derived from table rows
//! by [`extract_minterms`]. [`simplify`] then removes terms covered by another one until a
//! fixpoint is reached.

mod expression;
mod extract;
mod simplify;
mod term;

pub use expression::{BitExpression, Expressions, Reading};
pub use extract::{extract_minterms, RowSelection};
pub use simplify::{
    find_redundant, simplify, simplify_bit, PassReport, Removal, SimplifyReport,
    DEFAULT_MAX_PASSES,
};
pub use term::{Literal, MintermKey, Operand, Term};
