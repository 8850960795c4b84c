use log::{debug, info, warn};

use crate::logic::{BitExpression, Expressions, Term};

/// Default bound on the number of simplification passes
pub const DEFAULT_MAX_PASSES: usize = 64;

/// A term removed from an output expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    /// Output bit
    pub bit: usize,
    /// Removed term
    pub term: Term,
    /// Surviving term covering it
    pub covered_by: Term,
}

/// Terms removed during one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Removed terms, by output bit then term order
    pub removed: Vec<Removal>,
}

/// Diagnostics of a simplification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifyReport {
    /// Passes that were run; when converged, the last one removed nothing
    pub passes: Vec<PassReport>,
    /// Whether a fixpoint was reached before the pass bound
    pub converged: bool,
}

impl SimplifyReport {
    /// Report of a simplification that did not run yet
    pub fn new() -> SimplifyReport {
        SimplifyReport {
            passes: Vec::new(),
            converged: true,
        }
    }

    /// Number of passes run
    pub fn nb_passes(&self) -> usize {
        self.passes.len()
    }

    /// Total number of terms removed
    pub fn nb_removed(&self) -> usize {
        self.passes.iter().map(|p| p.removed.len()).sum()
    }

    /// Merge the report of an independent simplification, pass by pass
    pub fn merge(&mut self, other: SimplifyReport) {
        for (k, pass) in other.passes.into_iter().enumerate() {
            if k < self.passes.len() {
                self.passes[k].removed.extend(pass.removed);
            } else {
                self.passes.push(pass);
            }
        }
        self.converged &= other.converged;
    }
}

impl Default for SimplifyReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the terms covered by another term, for a single pass
///
/// Returns pairs (removed, covering) of positions. A term is only removed by a term that is not
/// itself pending removal in this pass, so that two terms covering each other are never both
/// removed. Terms are examined in order, and the first suitable covering term is used.
pub fn find_redundant(terms: &[Term]) -> Vec<(usize, usize)> {
    let mut pending = vec![false; terms.len()];
    let mut ret = Vec::new();
    for (i, t) in terms.iter().enumerate() {
        let covering = terms
            .iter()
            .enumerate()
            .position(|(j, u)| j != i && !pending[j] && u.covers(t));
        if let Some(j) = covering {
            pending[i] = true;
            ret.push((i, j));
        }
    }
    ret
}

/// Run a single pass on one output expression
fn run_pass(bit: usize, expr: &mut BitExpression) -> Vec<Removal> {
    let redundant = find_redundant(expr.terms());
    let removed: Vec<Removal> = redundant
        .iter()
        .map(|(i, j)| Removal {
            bit,
            term: expr.terms()[*i],
            covered_by: expr.terms()[*j],
        })
        .collect();
    for r in &removed {
        debug!("c{}: removing {}, covered by {}", bit, r.term, r.covered_by);
    }
    let positions: Vec<usize> = redundant.iter().map(|(i, _)| *i).collect();
    expr.remove_positions(&positions);
    removed
}

/// Simplify the expression of a single output bit until a fixpoint is reached
///
/// Output bits are independent, so this gives the same expression as [`simplify`].
pub fn simplify_bit(bit: usize, expr: &mut BitExpression, max_passes: usize) -> SimplifyReport {
    let mut report = SimplifyReport::new();
    report.converged = false;
    for _ in 0..max_passes {
        let removed = run_pass(bit, expr);
        let done = removed.is_empty();
        report.passes.push(PassReport { removed });
        if done {
            report.converged = true;
            break;
        }
    }
    if !report.converged {
        warn!("c{}: no fixpoint after {} passes", bit, max_passes);
    }
    report
}

/// Remove redundant terms from all output expressions until a fixpoint is reached
///
/// Each pass removes, for every output, the terms whose literals are all present in another
/// term of the same output. Passes are repeated until one of them removes nothing, or the pass
/// bound is reached.
///
/// This is a greedy subsumption filter, not an exact prime implicant selection. The result
/// may not be minimal.
pub fn simplify(exprs: &mut Expressions, max_passes: usize) -> SimplifyReport {
    let mut report = SimplifyReport::new();
    report.converged = false;
    for k in 0..max_passes {
        let mut pass = PassReport::default();
        for bit in 0..exprs.nb_outputs() {
            pass.removed.extend(run_pass(bit, exprs.output_mut(bit)));
        }
        info!(
            "Pass {}: removed {} terms, {} remaining",
            k + 1,
            pass.removed.len(),
            exprs.nb_terms()
        );
        let done = pass.removed.is_empty();
        report.passes.push(pass);
        if done {
            report.converged = true;
            break;
        }
    }
    if !report.converged {
        warn!(
            "No fixpoint after {} passes, {} terms remaining",
            max_passes,
            exprs.nb_terms()
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{find_redundant, simplify, simplify_bit, SimplifyReport, DEFAULT_MAX_PASSES};
    use crate::bits::{BitVector, Width};
    use crate::domain::Domain;
    use crate::logic::{extract_minterms, BitExpression, Expressions, RowSelection, Term};
    use crate::table::{Pairing, TruthTable};

    fn add_expressions() -> Expressions {
        let d = Domain::range(0..4).unwrap();
        let t = TruthTable::generate(&d, |a, b| a + b, Width::W2, Pairing::Product);
        extract_minterms(&t, RowSelection::All)
    }

    fn term(a: u64, b: u64) -> Term {
        Term::from_values(a, b, Width::W2)
    }

    #[test]
    fn test_find_redundant() {
        // a0, a0.b1, a1
        let terms = [term(1, 0), term(1, 2), term(2, 0)];
        assert_eq!(find_redundant(&terms), vec![(0, 1)]);
    }

    #[test]
    fn test_chain() {
        // a0 < a0.a1 < a0.a1.b0: only the largest survives, in a single pass
        let mut e = BitExpression::from_terms([term(1, 0), term(3, 0), term(3, 1)]);
        let report = simplify_bit(0, &mut e, DEFAULT_MAX_PASSES);
        assert_eq!(e.terms(), &[term(3, 1)]);
        assert!(report.converged);
        assert_eq!(report.nb_passes(), 2);
        assert_eq!(report.passes[0].removed.len(), 2);
        assert_eq!(report.passes[0].removed[0].covered_by, term(3, 0));
        assert_eq!(report.passes[0].removed[1].covered_by, term(3, 1));
        assert!(report.passes[1].removed.is_empty());
    }

    #[test]
    fn test_mutual_coverage() {
        // Keys of different widths covering each other: only one of them is removed
        let t1 = Term::new(BitVector::new(1, Width::W2), BitVector::new(0, Width::W2));
        let t2 = Term::new(BitVector::new(1, Width::W8), BitVector::new(0, Width::W8));
        assert!(t1.covers(&t2) && t2.covers(&t1));
        let mut e = BitExpression::from_terms([t1, t2]);
        let report = simplify_bit(0, &mut e, DEFAULT_MAX_PASSES);
        assert_eq!(e.terms(), &[t2]);
        assert_eq!(report.nb_removed(), 1);
    }

    #[test]
    fn test_add_low_bit() {
        let mut exprs = add_expressions();
        let report = simplify(&mut exprs, DEFAULT_MAX_PASSES);
        assert!(report.converged);
        assert_eq!(report.nb_passes(), 2);
        assert_eq!(exprs.output(0).to_string(), "a1.b0.b1 + a0.a1.b1");
        assert_eq!(report.passes[0].removed.iter().filter(|r| r.bit == 0).count(), 6);
    }

    #[test]
    fn test_idempotence() {
        let mut exprs = add_expressions();
        simplify(&mut exprs, DEFAULT_MAX_PASSES);
        let before = exprs.to_string();
        let report = simplify(&mut exprs, DEFAULT_MAX_PASSES);
        assert_eq!(report.nb_removed(), 0);
        assert_eq!(report.nb_passes(), 1);
        assert_eq!(exprs.to_string(), before);
    }

    #[test]
    fn test_no_dominated_term() {
        let mut exprs = add_expressions();
        simplify(&mut exprs, DEFAULT_MAX_PASSES);
        for e in exprs.outputs() {
            for (i, t) in e.terms().iter().enumerate() {
                for (j, u) in e.terms().iter().enumerate() {
                    assert!(i == j || !u.covers(t), "{} covers {}", u, t);
                }
            }
        }
    }

    #[test]
    fn test_pass_bound() {
        let mut exprs = add_expressions();
        let report = simplify(&mut exprs, 1);
        assert!(!report.converged);
        assert_eq!(report.nb_passes(), 1);
        let report = simplify(&mut exprs, 0);
        assert!(!report.converged);
        assert_eq!(report.nb_passes(), 0);
    }

    #[test]
    fn test_per_bit_matches_global() {
        let mut global = add_expressions();
        let global_report = simplify(&mut global, DEFAULT_MAX_PASSES);
        let mut per_bit = add_expressions();
        let mut report = SimplifyReport::new();
        for bit in 0..per_bit.nb_outputs() {
            report.merge(simplify_bit(bit, per_bit.output_mut(bit), DEFAULT_MAX_PASSES));
        }
        assert_eq!(global.to_string(), per_bit.to_string());
        assert_eq!(global_report.nb_removed(), report.nb_removed());
        assert!(report.converged);
    }

    #[test]
    fn test_empty() {
        let mut exprs = Expressions::new(Width::W8);
        let report = simplify(&mut exprs, DEFAULT_MAX_PASSES);
        assert!(report.converged);
        assert_eq!(report.nb_removed(), 0);
        assert_eq!(exprs.nb_outputs(), 8);
    }
}
