//! Error types for the transform module

use thiserror::Error;

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that can occur while tokenizing source text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A string literal, char literal or block comment never closes
    #[error("unterminated {what} starting on line {line}")]
    Unterminated {
        /// Kind of construct left open
        what: &'static str,
        /// 1-based line where it starts
        line: usize,
    },
}
