//! Truth table generation by exhaustive enumeration of operand pairs

use std::fmt;

use fxhash::FxHashMap;
use itertools::Itertools;
use volute::Lut;

use crate::bits::{BitVector, Width};
use crate::domain::Domain;

/// Maximum number of input variables for which lookup tables are built
pub const MAX_LUT_VARS: usize = 16;

/// How operand pairs are drawn from the domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pairing {
    /// Every ordered pair, including a member paired with itself
    #[default]
    Product,
    /// Ordered pairs of members at distinct positions
    Permutations,
    /// Unordered pairs of members at distinct positions
    Combinations,
    /// Unordered pairs, including a member paired with itself
    CombinationsWithReplacement,
}

impl Pairing {
    /// Select the pairing from the commutative flag and whether self pairs are kept
    pub fn select(commutative: bool, self_pairs: bool) -> Pairing {
        match (commutative, self_pairs) {
            (false, true) => Pairing::Product,
            (false, false) => Pairing::Permutations,
            (true, false) => Pairing::Combinations,
            (true, true) => Pairing::CombinationsWithReplacement,
        }
    }

    /// Number of pairs enumerated for a domain of this size
    pub fn nb_pairs(&self, n: usize) -> usize {
        match self {
            Pairing::Product => n * n,
            Pairing::Permutations => n * n.saturating_sub(1),
            Pairing::Combinations => n * n.saturating_sub(1) / 2,
            Pairing::CombinationsWithReplacement => n * (n + 1) / 2,
        }
    }

    /// Enumerate the pairs, in a deterministic order
    pub fn pairs<'a>(&self, values: &'a [u64]) -> Box<dyn Iterator<Item = (u64, u64)> + 'a> {
        match self {
            Pairing::Product => Box::new(
                values
                    .iter()
                    .cartesian_product(values.iter())
                    .map(|(a, b)| (*a, *b)),
            ),
            Pairing::Permutations => {
                Box::new(values.iter().permutations(2).map(|v| (*v[0], *v[1])))
            }
            Pairing::Combinations => Box::new(
                values
                    .iter()
                    .tuple_combinations()
                    .map(|(a, b): (&u64, &u64)| (*a, *b)),
            ),
            Pairing::CombinationsWithReplacement => Box::new(
                values
                    .iter()
                    .combinations_with_replacement(2)
                    .map(|v| (*v[0], *v[1])),
            ),
        }
    }
}

/// Pair of operands, in the order they were passed to the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandPair {
    /// First operand
    pub first: BitVector,
    /// Second operand
    pub second: BitVector,
}

impl fmt::Display for OperandPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.second)
    }
}

/// A single enumerated pair and its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// Operands
    pub pair: OperandPair,
    /// Result of the operation, truncated to the width
    pub result: BitVector,
}

/// Truth table of an operation over a domain
///
/// All enumerated rows are kept in order. The table is also indexed by result: when several
/// pairs produce the same result, the pair enumerated last wins the entry.
#[derive(Debug, Clone)]
pub struct TruthTable {
    width: Width,
    rows: Vec<Row>,
    index: FxHashMap<BitVector, usize>,
    keys: Vec<BitVector>,
}

impl TruthTable {
    /// Build the table by applying the operation to every pair of the domain
    ///
    /// Results are truncated to the width. Operands are expected to fit already.
    pub fn generate<F: Fn(u64, u64) -> u64>(
        domain: &Domain,
        op: F,
        width: Width,
        pairing: Pairing,
    ) -> TruthTable {
        let mut ret = TruthTable {
            width,
            rows: Vec::with_capacity(pairing.nb_pairs(domain.len())),
            index: FxHashMap::default(),
            keys: Vec::new(),
        };
        for (a, b) in pairing.pairs(domain.values()) {
            let pair = OperandPair {
                first: BitVector::new(a, width),
                second: BitVector::new(b, width),
            };
            ret.push(Row {
                pair,
                result: BitVector::new(op(a, b), width),
            });
        }
        ret
    }

    fn push(&mut self, row: Row) {
        let ind = self.rows.len();
        if self.index.insert(row.result, ind).is_none() {
            self.keys.push(row.result);
        }
        self.rows.push(row);
    }

    /// Width of operands and results
    pub fn width(&self) -> Width {
        self.width
    }

    /// Every enumerated row, in enumeration order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of enumerated rows
    pub fn nb_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of distinct results
    pub fn nb_entries(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if nothing was enumerated
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pair recorded for a result; the last one enumerated if several produce it
    pub fn lookup(&self, result: &BitVector) -> Option<&OperandPair> {
        self.index.get(result).map(|i| &self.rows[*i].pair)
    }

    /// Distinct results and the pair recorded for each, in order of first appearance
    pub fn entries(&self) -> impl Iterator<Item = &Row> + '_ {
        self.keys.iter().map(|k| &self.rows[self.index[k]])
    }

    /// First row enumerated for this pair of operands
    pub fn row_for(&self, a: u64, b: u64) -> Option<&Row> {
        self.rows
            .iter()
            .find(|r| r.pair.first.value() == a && r.pair.second.value() == b)
    }

    /// Number of input variables: both operands
    pub fn nb_vars(&self) -> usize {
        2 * self.width.bits()
    }

    /// Lookup table index for a pair of operands
    ///
    /// Variable i is bit i of the first operand, variable W + i is bit i of the second.
    /// Only meaningful for widths small enough to build lookup tables.
    pub(crate) fn lut_mask(pair: &OperandPair) -> usize {
        let w = pair.first.width().bits();
        (pair.first.value() | (pair.second.value() << w)) as usize
    }

    /// Reference function of an output bit, over the enumerated rows
    ///
    /// Input combinations that were not enumerated are false.
    /// Returns None if the width is too large to build a lookup table.
    pub fn output_lut(&self, bit: usize) -> Option<Lut> {
        assert!(bit < self.width.bits());
        if self.nb_vars() > MAX_LUT_VARS {
            return None;
        }
        let mut lut = Lut::zero(self.nb_vars());
        for row in &self.rows {
            if row.result.bit(bit) {
                lut.set_value(Self::lut_mask(&row.pair), true);
            }
        }
        Some(lut)
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Truth table: {} rows, {} distinct results",
            self.nb_rows(),
            self.nb_entries()
        )?;
        for row in self.entries() {
            writeln!(f, "  {} <- {}", row.result, row.pair)?;
        }
        Ok(())
    }
}
