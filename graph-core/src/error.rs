//! Error types for graph encoding.

use thiserror::Error;

/// Errors that can occur while validating a program or building its graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An input array does not have the length implied by the constraint matrix.
    #[error("Shape mismatch: {what} has length {actual}, expected {expected}")]
    ShapeMismatch {
        /// Which input disagreed (e.g. `"b"`, `"cone mask"`).
        what: &'static str,
        /// Length implied by the constraint matrix.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Constraint sense symbol not in `<`, `<=`, `=`, `==`, `>`, `>=`.
    #[error("Unknown constraint sense: {0:?}")]
    UnknownSense(String),

    /// A graph that was not produced by the encoder breaks an invariant.
    #[error("Inconsistent graph: {0}")]
    Inconsistent(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Fail with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> GraphResult<()> {
    if expected != actual {
        return Err(GraphError::ShapeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
