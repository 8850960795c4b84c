//! Operand domains and their validation

use std::ops::Range;

use fxhash::FxHashSet;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::bits::Width;
use crate::error::{ConfigurationError, DomainViolation, GroupRule, Result};

/// Default bound on the domain size: about 16M pairs
pub const DEFAULT_MAX_DOMAIN_SIZE: usize = 4096;

/// Ordered, finite list of operands to enumerate
///
/// Duplicates are allowed; they only add redundant enumeration work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    values: Vec<u64>,
}

impl Domain {
    /// Create a domain from a list of operands
    pub fn new(values: Vec<u64>) -> Result<Domain> {
        if values.is_empty() {
            return Err(ConfigurationError::EmptyDomain.into());
        }
        Ok(Domain { values })
    }

    /// Create a domain from a range of operands, with at most [`DEFAULT_MAX_DOMAIN_SIZE`] operands
    pub fn range(r: Range<u64>) -> Result<Domain> {
        Domain::bounded_range(r, DEFAULT_MAX_DOMAIN_SIZE)
    }

    /// Create a domain from a range of operands, with at most `limit` operands
    ///
    /// The size is checked before any operand is stored.
    pub fn bounded_range(r: Range<u64>, limit: usize) -> Result<Domain> {
        let size = r.end.saturating_sub(r.start);
        if size > limit as u64 {
            return Err(ConfigurationError::DomainTooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                limit,
            }
            .into());
        }
        Domain::new(r.collect())
    }

    /// All operands, in enumeration order
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Number of operands
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: an empty domain cannot be built
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check that the domain can be enumerated at this width
    ///
    /// All operands must be representable, and the domain size must stay below the limit
    /// so that pairwise enumeration remains tractable.
    pub fn check(&self, width: Width, limit: usize) -> Result<()> {
        if self.len() > limit {
            return Err(ConfigurationError::DomainTooLarge {
                size: self.len(),
                limit,
            }
            .into());
        }
        if let Some(v) = self.values.iter().find(|v| !width.fits(**v)) {
            return Err(ConfigurationError::OperandOutOfRange {
                value: *v,
                width: width.bits(),
            }
            .into());
        }
        Ok(())
    }

    /// Randomize the enumeration order
    ///
    /// This only changes which pair wins a result in the table, and the order of the terms.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.values.shuffle(&mut rng);
    }
}

/// Validate group members given as pairs of inverses, and build the corresponding domain
///
/// Each pair (x, y) must satisfy op(x, y) = op(y, x) = identity, and composing either member
/// with the identity must leave it unchanged. The resulting domain lists the members in the
/// order they first appear.
pub fn validate_group(
    op: Option<&dyn Fn(u64, u64) -> u64>,
    identity: Option<u64>,
    pairs: &[(u64, u64)],
) -> Result<Domain> {
    let op = op.ok_or(ConfigurationError::MissingOperation)?;
    let e = identity.ok_or(ConfigurationError::MissingIdentity)?;
    let mut seen = FxHashSet::default();
    let mut members = Vec::new();
    for &(x, y) in pairs {
        let violation = |rule| DomainViolation {
            first: x,
            second: y,
            rule,
        };
        if op(x, y) != e || op(y, x) != e {
            return Err(violation(GroupRule::Inverse).into());
        }
        if op(x, e) != x || op(y, e) != y {
            return Err(violation(GroupRule::Identity).into());
        }
        for m in [x, y] {
            if seen.insert(m) {
                members.push(m);
            }
        }
    }
    Domain::new(members)
}
