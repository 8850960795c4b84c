//! Synthesis runs: table generation, minterm extraction and simplification
//!
//! ```
//! # use bitsynth::{Domain, SynthesisConfig, Synthesizer};
//! let config = SynthesisConfig::new(2).unwrap();
//! let synthesis = Synthesizer::new(config)
//!     .domain(Domain::range(0..4).unwrap())
//!     .operation(|a, b| a + b)
//!     .run()
//!     .unwrap();
//! assert_eq!(synthesis.table.nb_rows(), 16);
//! assert_eq!(synthesis.expressions.nb_outputs(), 2);
//! println!("{}", synthesis.expressions);
//! ```

use log::info;

use crate::bits::Width;
pub use crate::domain::DEFAULT_MAX_DOMAIN_SIZE;

use crate::domain::Domain;
use crate::error::{ConfigurationError, Result};
use crate::logic::{
    extract_minterms, simplify, Expressions, Reading, RowSelection, SimplifyReport,
    DEFAULT_MAX_PASSES,
};
use crate::table::{Pairing, TruthTable};

/// Parameters of a synthesis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Width of operands and results
    pub width: Width,
    /// How pairs are drawn from the domain
    pub pairing: Pairing,
    /// Which table rows contribute terms
    pub rows: RowSelection,
    /// Whether redundant terms are removed
    pub simplify: bool,
    /// Bound on the number of simplification passes
    pub max_passes: usize,
    /// Bound on the number of operands
    pub max_domain_size: usize,
}

impl SynthesisConfig {
    /// Default configuration for a width, given in bits
    pub fn new(bits: usize) -> Result<SynthesisConfig> {
        let width = Width::try_from(bits)?;
        Ok(SynthesisConfig {
            width,
            pairing: Pairing::default(),
            rows: RowSelection::default(),
            simplify: true,
            max_passes: DEFAULT_MAX_PASSES,
            max_domain_size: DEFAULT_MAX_DOMAIN_SIZE,
        })
    }

    /// Set the pairing
    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Set the row selection
    pub fn with_rows(mut self, rows: RowSelection) -> Self {
        self.rows = rows;
        self
    }

    /// Enable or disable simplification
    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    /// Set the bound on simplification passes
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Set the bound on the domain size
    pub fn with_max_domain_size(mut self, max_domain_size: usize) -> Self {
        self.max_domain_size = max_domain_size;
        self
    }

    /// Check the configuration on its own
    pub fn check(&self) -> Result<()> {
        if self.simplify && self.max_passes == 0 {
            return Err(ConfigurationError::NoPass.into());
        }
        Ok(())
    }
}

/// Artifacts of a synthesis run
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// Truth table of the operation
    pub table: TruthTable,
    /// One expression per output bit
    pub expressions: Expressions,
    /// Simplification diagnostics, if simplification was enabled
    pub report: Option<SimplifyReport>,
}

impl Synthesis {
    /// Output bits whose expression differs from the table on the enumerated rows
    ///
    /// Returns None if the width is too large to compare lookup tables.
    pub fn mismatches(&self, reading: Reading) -> Option<Vec<usize>> {
        let mut ret = Vec::new();
        for bit in 0..self.expressions.nb_outputs() {
            let expected = self.table.output_lut(bit)?;
            let actual = self.expressions.to_lut(bit, reading)?;
            if expected != actual {
                ret.push(bit);
            }
        }
        Some(ret)
    }
}

/// Setup of a synthesis run
///
/// The operation and the domain are supplied by the caller. All preconditions are checked
/// before any enumeration.
pub struct Synthesizer<'a> {
    config: SynthesisConfig,
    domain: Option<Domain>,
    op: Option<Box<dyn Fn(u64, u64) -> u64 + 'a>>,
}

impl<'a> Synthesizer<'a> {
    /// Start a run with this configuration
    pub fn new(config: SynthesisConfig) -> Synthesizer<'a> {
        Synthesizer {
            config,
            domain: None,
            op: None,
        }
    }

    /// Set the operand domain
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Set the operation; it must be pure and defined on every pair of the domain
    pub fn operation<F: Fn(u64, u64) -> u64 + 'a>(mut self, op: F) -> Self {
        self.op = Some(Box::new(op));
        self
    }

    /// Configuration of the run
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Check every precondition of the run, and return the operation and the domain
    fn checked(&self) -> Result<(&(dyn Fn(u64, u64) -> u64 + 'a), &Domain)> {
        let op = self
            .op
            .as_deref()
            .ok_or(ConfigurationError::MissingOperation)?;
        let domain = self
            .domain
            .as_ref()
            .ok_or(ConfigurationError::EmptyDomain)?;
        self.config.check()?;
        domain.check(self.config.width, self.config.max_domain_size)?;
        Ok((op, domain))
    }

    /// Check every precondition of the run
    pub fn check(&self) -> Result<()> {
        self.checked().map(|_| ())
    }

    /// Build the truth table only
    pub fn generate_table(&self) -> Result<TruthTable> {
        let (op, domain) = self.checked()?;
        let table = TruthTable::generate(domain, op, self.config.width, self.config.pairing);
        info!(
            "Generated table of width {}: {} rows, {} distinct results",
            self.config.width,
            table.nb_rows(),
            table.nb_entries()
        );
        Ok(table)
    }

    /// Extract the expressions without simplifying them
    pub fn extract(&self) -> Result<(TruthTable, Expressions)> {
        let table = self.generate_table()?;
        let expressions = extract_minterms(&table, self.config.rows);
        Ok((table, expressions))
    }

    /// Run the whole synthesis
    pub fn run(&self) -> Result<Synthesis> {
        let (table, mut expressions) = self.extract()?;
        let report = if self.config.simplify {
            Some(simplify(&mut expressions, self.config.max_passes))
        } else {
            None
        };
        Ok(Synthesis {
            table,
            expressions,
            report,
        })
    }
}

/// Run a synthesis with an operation that may be missing
pub fn synthesize<F: Fn(u64, u64) -> u64>(
    config: &SynthesisConfig,
    domain: &Domain,
    op: Option<F>,
) -> Result<Synthesis> {
    let op = op.ok_or(ConfigurationError::MissingOperation)?;
    Synthesizer::new(config.clone())
        .domain(domain.clone())
        .operation(op)
        .run()
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::{synthesize, Synthesis, SynthesisConfig, Synthesizer};
    use crate::bits::{BitVector, Width};
    use crate::domain::Domain;
    use crate::error::{ConfigurationError, SynthError};
    use crate::logic::{Reading, RowSelection};
    use crate::table::Pairing;

    fn run<F: Fn(u64, u64) -> u64>(config: SynthesisConfig, op: F) -> Synthesis {
        Synthesizer::new(config)
            .domain(Domain::range(0..4).unwrap())
            .operation(op)
            .run()
            .unwrap()
    }

    /// Random operation over 2b words, as a lookup table
    fn random_op(seed: u64) -> impl Fn(u64, u64) -> u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let values: Vec<u64> = (0..16).map(|_| rng.gen_range(0..4)).collect();
        move |a, b| values[(a * 4 + b) as usize]
    }

    #[test]
    fn test_addition_low_bit_is_xor() {
        let config = SynthesisConfig::new(2).unwrap().with_simplify(false);
        let s = run(config, |a, b| (a + b) % 4);
        assert_eq!(s.table.nb_rows(), 16);
        for a in 0..4 {
            for b in 0..4 {
                let expected = (a & 1) ^ (b & 1) != 0;
                let e = s.expressions.output(0);
                assert_eq!(e.evaluate(Reading::Minterm, a, b), expected);
            }
        }
        assert_eq!(s.mismatches(Reading::Minterm), Some(vec![]));
        assert!(s.report.is_none());

        // Subsumption keeps only the widest terms, and the result is no longer a Xor
        let s = run(SynthesisConfig::new(2).unwrap(), |a, b| (a + b) % 4);
        assert_eq!(s.expressions.output(0).to_string(), "a1.b0.b1 + a0.a1.b1");
        assert!(s.mismatches(Reading::Minterm).unwrap().contains(&0));
        assert!(s.mismatches(Reading::Literals).unwrap().contains(&0));
        let e = s.expressions.output(0);
        assert!(e.evaluate(Reading::Minterm, 2, 3));
        assert!(!e.evaluate(Reading::Minterm, 1, 0));
    }

    #[test]
    fn test_positive_literals_are_monotone() {
        // Xor is not monotone, so no positive-literal expression computes it
        let config = SynthesisConfig::new(2).unwrap().with_simplify(false);
        let s = run(config, |a, b| a + b);
        assert!(s.expressions.output(0).evaluate(Reading::Literals, 3, 3));
        assert_eq!(s.mismatches(Reading::Literals).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_multiplication_entry() {
        let config = SynthesisConfig::new(2).unwrap();
        let s = run(config, |a, b| a * b);
        let row = s.table.row_for(2, 2).unwrap();
        assert_eq!(row.result.to_string(), "00");
        assert_eq!(row.pair.first.to_string(), "10");
        assert_eq!(row.pair.second.to_string(), "10");
    }

    #[test]
    fn test_unsupported_width() {
        assert!(matches!(
            SynthesisConfig::new(4),
            Err(SynthError::Configuration(ConfigurationError::UnsupportedWidth(4)))
        ));
    }

    #[test]
    fn test_single_member() {
        let config = SynthesisConfig::new(8)
            .unwrap()
            .with_pairing(Pairing::Permutations);
        let domain = Domain::new(vec![7]).unwrap();
        let s = synthesize(&config, &domain, Some(|a: u64, b: u64| a + b)).unwrap();
        assert!(s.table.is_empty());
        assert_eq!(s.expressions.nb_outputs(), 8);
        assert_eq!(s.expressions.nb_terms(), 0);
        assert_eq!(s.report.unwrap().nb_removed(), 0);
        // With self pairs, the only row is 7 + 7
        let config = config.with_pairing(Pairing::Product);
        let s = synthesize(&config, &domain, Some(|a: u64, b: u64| a + b)).unwrap();
        assert_eq!(s.table.nb_rows(), 1);
        assert_eq!(s.table.rows()[0].result, BitVector::new(14, Width::W8));
        assert_eq!(s.expressions.nb_terms(), 3);
    }

    #[test]
    fn test_missing_preconditions() {
        let config = SynthesisConfig::new(2).unwrap();
        let err = Synthesizer::new(config.clone())
            .domain(Domain::range(0..4).unwrap())
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            SynthError::Configuration(ConfigurationError::MissingOperation)
        ));
        let err = Synthesizer::new(config.clone())
            .operation(|a, b| a + b)
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            SynthError::Configuration(ConfigurationError::EmptyDomain)
        ));
        let err = synthesize(
            &config,
            &Domain::range(0..4).unwrap(),
            None::<fn(u64, u64) -> u64>,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SynthError::Configuration(ConfigurationError::MissingOperation)
        ));
        let err = synthesize(
            &config.clone().with_max_passes(0),
            &Domain::range(0..4).unwrap(),
            Some(|a: u64, b: u64| a + b),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SynthError::Configuration(ConfigurationError::NoPass)
        ));
    }

    #[test]
    fn test_domain_bounds() {
        let config = SynthesisConfig::new(8).unwrap().with_max_domain_size(16);
        let mul = |a: u64, b: u64| a * b;
        let err = synthesize(&config, &Domain::range(0..17).unwrap(), Some(mul)).unwrap_err();
        assert!(matches!(
            err,
            SynthError::Configuration(ConfigurationError::DomainTooLarge { .. })
        ));
        let err = synthesize(&config, &Domain::new(vec![1, 300]).unwrap(), Some(mul)).unwrap_err();
        assert!(matches!(
            err,
            SynthError::Configuration(ConfigurationError::OperandOutOfRange { value: 300, .. })
        ));
    }

    #[test]
    fn test_operation_not_called_on_error() {
        let config = SynthesisConfig::new(8).unwrap().with_max_domain_size(2);
        let called = std::cell::Cell::new(false);
        let res = Synthesizer::new(config)
            .domain(Domain::range(0..3).unwrap())
            .operation(|a, b| {
                called.set(true);
                a + b
            })
            .run();
        assert!(res.is_err());
        assert!(!called.get());
    }

    #[test]
    fn test_random_operations() {
        for seed in 0..20 {
            let op = random_op(seed);
            let config = SynthesisConfig::new(2).unwrap().with_simplify(false);
            let raw = run(config.clone(), &op);
            let simplified = run(config.with_simplify(true), &op);
            // Unsimplified expressions reproduce the function exactly
            assert_eq!(raw.mismatches(Reading::Minterm), Some(vec![]));
            for bit in 0..2 {
                let before = raw.expressions.output(bit);
                let after = simplified.expressions.output(bit);
                // Never increases, and never empties a non-empty expression
                assert!(after.len() <= before.len());
                assert_eq!(after.is_empty(), before.is_empty());
                for t in after.terms() {
                    assert!(before.contains(t));
                }
            }
            assert!(simplified.report.unwrap().converged);
        }
    }

    #[test]
    fn test_distinct_rows() {
        let config = SynthesisConfig::new(2)
            .unwrap()
            .with_rows(RowSelection::Distinct)
            .with_simplify(false);
        let s = run(config, |a, b| a + b);
        // At most one term per distinct result
        assert!(s.expressions.outputs().iter().all(|e| e.len() <= 4));
        assert_eq!(s.table.nb_entries(), 4);
    }
}
