//! Errors for filter parsing.

use thiserror::Error;

/// A syntax error in a filter string. `position` is a byte offset into the
/// filter text; errors at end of input point one past the last byte.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}
