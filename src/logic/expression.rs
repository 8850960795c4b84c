use std::fmt;

use fxhash::FxHashMap;
use volute::Lut;

use crate::bits::{BitVector, Width};
use crate::logic::Term;
use crate::table::{OperandPair, MAX_LUT_VARS, TruthTable};

/// How a term is evaluated on an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reading {
    /// The term is true only on the operand pair it was derived from
    #[default]
    Minterm,
    /// The term is true whenever all its (positive) literals are set
    Literals,
}

/// Expression for a single output bit: Or of its terms
#[derive(Debug, Clone, Default)]
pub struct BitExpression {
    terms: Vec<Term>,
    occurrences: Vec<usize>,
    index: FxHashMap<Term, usize>,
}

impl BitExpression {
    /// Create an empty expression, always false
    pub fn new() -> BitExpression {
        BitExpression::default()
    }

    /// Create an expression from a list of terms; duplicates are merged
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> BitExpression {
        let mut ret = BitExpression::new();
        for t in terms {
            ret.add(t);
        }
        ret
    }

    /// Add a term. Returns false if the term was already present, in which case only its
    /// occurrence count is updated
    pub fn add(&mut self, term: Term) -> bool {
        match self.index.get(&term) {
            Some(i) => {
                self.occurrences[*i] += 1;
                false
            }
            None => {
                self.index.insert(term, self.terms.len());
                self.terms.push(term);
                self.occurrences.push(1);
                true
            }
        }
    }

    /// Terms, in the order they were first added
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Number of table rows that produced each term
    pub fn occurrences(&self) -> &[usize] {
        &self.occurrences
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the expression is constant false
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if the expression contains this term
    pub fn contains(&self, term: &Term) -> bool {
        self.index.contains_key(term)
    }

    /// Remove the terms at the given positions, keeping the order of the others
    pub(crate) fn remove_positions(&mut self, positions: &[usize]) {
        if positions.is_empty() {
            return;
        }
        let mut removed = vec![false; self.terms.len()];
        for p in positions {
            removed[*p] = true;
        }
        let mut i = 0;
        self.terms.retain(|_| {
            i += 1;
            !removed[i - 1]
        });
        let mut i = 0;
        self.occurrences.retain(|_| {
            i += 1;
            !removed[i - 1]
        });
        self.index = self
            .terms
            .iter()
            .enumerate()
            .map(|(i, t)| (*t, i))
            .collect();
    }

    /// Evaluate the expression on a pair of operands
    pub fn evaluate(&self, reading: Reading, a: u64, b: u64) -> bool {
        match reading {
            Reading::Minterm => self.terms.iter().any(|t| t.matches(a, b)),
            Reading::Literals => self.terms.iter().any(|t| t.implies(a, b)),
        }
    }
}

impl fmt::Display for BitExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        let st = self
            .terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        write!(f, "{}", st)
    }
}

/// Expressions for all output bits of an operation
#[derive(Debug, Clone)]
pub struct Expressions {
    width: Width,
    bits: Vec<BitExpression>,
}

impl Expressions {
    /// Create constant false expressions for every output bit
    pub fn new(width: Width) -> Expressions {
        Expressions {
            width,
            bits: vec![BitExpression::new(); width.bits()],
        }
    }

    /// Width of the operation
    pub fn width(&self) -> Width {
        self.width
    }

    /// Number of output bits; always equal to the width
    pub fn nb_outputs(&self) -> usize {
        self.bits.len()
    }

    /// Expression of output bit i
    pub fn output(&self, i: usize) -> &BitExpression {
        &self.bits[i]
    }

    /// Mutable expression of output bit i
    pub fn output_mut(&mut self, i: usize) -> &mut BitExpression {
        &mut self.bits[i]
    }

    /// All expressions, least significant output first
    pub fn outputs(&self) -> &[BitExpression] {
        &self.bits
    }

    /// Total number of terms over all outputs
    pub fn nb_terms(&self) -> usize {
        self.bits.iter().map(|e| e.len()).sum()
    }

    /// Evaluate all outputs on a pair of operands and assemble the resulting word
    pub fn evaluate(&self, reading: Reading, a: u64, b: u64) -> BitVector {
        let mut value = 0u64;
        for (i, e) in self.bits.iter().enumerate() {
            if e.evaluate(reading, a, b) {
                value |= 1 << i;
            }
        }
        BitVector::new(value, self.width)
    }

    /// Lookup table of output bit i, with the same variable order as [`TruthTable::output_lut`]
    ///
    /// Returns None if the width is too large to build a lookup table.
    pub fn to_lut(&self, i: usize, reading: Reading) -> Option<Lut> {
        let nb_vars = 2 * self.width.bits();
        if nb_vars > MAX_LUT_VARS {
            return None;
        }
        let mut lut = Lut::zero(nb_vars);
        let expr = &self.bits[i];
        let same_width = |t: &Term| {
            t.key().first().width() == self.width && t.key().second().width() == self.width
        };
        if reading == Reading::Minterm && expr.terms().iter().all(same_width) {
            // Each term is true on exactly one input
            for t in expr.terms() {
                let pair = OperandPair {
                    first: t.key().first(),
                    second: t.key().second(),
                };
                lut.set_value(TruthTable::lut_mask(&pair), true);
            }
            return Some(lut);
        }
        let all = self.width.mask() + 1;
        for a in 0..all {
            for b in 0..all {
                if expr.evaluate(reading, a, b) {
                    let pair = OperandPair {
                        first: BitVector::new(a, self.width),
                        second: BitVector::new(b, self.width),
                    };
                    lut.set_value(TruthTable::lut_mask(&pair), true);
                }
            }
        }
        Some(lut)
    }
}

impl fmt::Display for Expressions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.bits.iter().enumerate() {
            writeln!(f, "c{} = {}", i, e)?;
        }
        Ok(())
    }
}
