//! Error kinds for the mining core (spec §7).
//!
//! Recoverable conditions (`DuplicateEdge`, `MissingEdge`) are deliberately
//! *not* part of this enum: per spec §7's propagation policy they surface
//! as a plain `bool` return from the mutating methods, not as `Err`.

use thiserror::Error;

/// Fatal errors: anything reaching one of these terminates the owning
/// `MiningSession`, per spec §7.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MiningError {
    /// The enumerator (or optimized-path dispatch) was invoked with a `k`
    /// outside the set it supports.
    #[error("unsupported subgraph size k={k} (supported: {supported:?})")]
    UnsupportedK { k: usize, supported: &'static [usize] },

    /// A reservoir or adjacency-map internal consistency check failed.
    /// Spec §7 classifies this as a bug indicator, not a recoverable
    /// condition, so callers should treat it as fatal.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
