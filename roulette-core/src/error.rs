//! Errors raised by the roulette container and its random sources.

use thiserror::Error;

/// Errors from roulette operations.
///
/// All variants are local and synchronous: there is no I/O underneath, so
/// none of them is worth retrying. A failed operation never leaves the
/// container partially mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouletteError {
    /// A `[min, max)` interval with `min >= max` or a non-finite bound.
    #[error("invalid range [{min}, {max}): min must be finite and strictly below max")]
    InvalidRange { min: f64, max: f64 },

    /// A weight that is zero, negative, NaN or infinite.
    #[error("invalid weight {weight}: weight must be finite and greater than 0")]
    InvalidWeight { weight: f64 },

    #[error("cannot roll an empty roulette")]
    EmptyContainer,

    /// The binary search found no range owning the sampled point. The range
    /// sequence is corrupt; this is never a caller error.
    #[error("no range contains roll {roll} (total {total}, {len} ranges)")]
    InvariantViolation { roll: f64, total: f64, len: usize },
}
