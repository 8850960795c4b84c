//! Error types for synthesis runs
//!
//! Every error aborts the current run: no partial table or expression is returned.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors of a synthesis run
#[derive(Error, Debug)]
pub enum SynthError {
    /// A precondition on the run configuration failed before enumeration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A domain failed the algebraic checks of group validation
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainViolation),

    /// IO error while exporting results
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which configuration precondition failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No operation was provided
    #[error("an operation must be provided")]
    MissingOperation,

    /// No identity element was provided for group validation
    #[error("an identity element must be provided")]
    MissingIdentity,

    /// The operand domain has no member
    #[error("the operand domain is empty")]
    EmptyDomain,

    /// The width is not one of the supported widths
    #[error("unsupported width {0}: expected one of 2, 8, 32 or 64")]
    UnsupportedWidth(usize),

    /// An operand does not fit in the configured width
    #[error("operand {value} does not fit in {width} bits")]
    OperandOutOfRange {
        /// Offending operand
        value: u64,
        /// Configured width
        width: usize,
    },

    /// The domain is too large for exhaustive pairwise enumeration
    #[error("domain of {size} operands exceeds the limit of {limit} for pairwise enumeration")]
    DomainTooLarge {
        /// Number of operands in the domain
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// The pass bound of the simplifier must allow at least one pass
    #[error("the simplifier needs at least one pass")]
    NoPass,
}

/// Algebraic rule broken by a member pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRule {
    /// The pair members are not inverses of each other
    Inverse,
    /// Composing a member with the identity changed it
    Identity,
}

/// A member pair failing group validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("pair ({first}, {second}) breaks the {rule:?} rule")]
pub struct DomainViolation {
    /// First member of the pair
    pub first: u64,
    /// Second member of the pair
    pub second: u64,
    /// Rule that failed
    pub rule: GroupRule,
}
