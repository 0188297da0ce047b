//! Error types for blossom separation.

use thiserror::Error;

/// Reasons a cut is rejected before its inequality is evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedCut {
    /// The cut has no handle.
    #[error("cut has no cliques")]
    NoCliques,

    /// A clique has no intervals.
    #[error("clique {clique} has no intervals")]
    EmptyClique {
        /// Clique index within the cut (0 is the handle).
        clique: usize,
    },

    /// An interval bound is negative.
    #[error("clique {clique} interval [{lo}, {hi}] has a negative bound")]
    NegativeBound {
        /// Clique index within the cut.
        clique: usize,
        /// Lower bound.
        lo: i32,
        /// Upper bound.
        hi: i32,
    },

    /// An interval with `lo > hi`.
    #[error("clique {clique} interval [{lo}, {hi}] is inverted")]
    InvertedInterval {
        /// Clique index within the cut.
        clique: usize,
        /// Lower bound.
        lo: i32,
        /// Upper bound.
        hi: i32,
    },
}

/// Errors that can occur during separation.
#[derive(Error, Debug)]
pub enum SepError {
    /// Graph or fractional solution failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A separation oracle signalled failure.
    #[error("Oracle {oracle} failed: {reason}")]
    OracleFailure {
        /// Name of the failing oracle.
        oracle: &'static str,
        /// Oracle-supplied reason.
        reason: String,
    },

    /// A cut could not be evaluated.
    #[error("Malformed cut: {0}")]
    MalformedCut(#[from] MalformedCut),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SepError {
    /// Build an oracle failure.
    pub fn oracle(oracle: &'static str, reason: impl Into<String>) -> Self {
        SepError::OracleFailure {
            oracle,
            reason: reason.into(),
        }
    }

    /// Returns true if this error is fatal to a separation run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SepError::MalformedCut(_))
    }
}

/// Result type for separation operations.
pub type SepResult<T> = Result<T, SepError>;
