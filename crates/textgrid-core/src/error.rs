//! Error taxonomy for buffer operations.
//!
//! Row- and rectangle-level failures abort only the in-progress row or
//! rectangle; rows already committed by a multi-row operation stay committed.
//! Callers are expected to tolerate partial writes; there is no rollback.

/// Errors produced by buffer mutations and resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Bad geometry: zero-sized buffer, inverted rectangle, column or row
    /// outside the addressable range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Row or attribute-run storage could not be allocated. The row being
    /// mutated is left unmodified.
    #[error("out of memory")]
    OutOfMemory,

    /// The buffer reached a state a mutation cannot interpret (for example a
    /// trailing cell with no leading half). Defensive; should not occur.
    #[error("unsupported buffer state: {0}")]
    Unsupported(&'static str),

    /// Source rectangle arithmetic would read outside the provided cells.
    /// Aborts the copy; destination rows already written stay written.
    #[error("source rectangle exceeds its buffer bounds")]
    BufferOverflow,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
