//! Errors for query translation.

use query_engine_metadata::metadata::{ComparisonOperator, ScalarType};
use thiserror::Error;

use super::filter::ParseError;

/// Everything that can go wrong building a statement. Each variant maps to a
/// distinct client-facing failure: an unknown entity, a malformed filter
/// string, or semantically invalid options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Entity '{0}' not found.")]
    SchemaNotFound(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A semantically invalid set of query options. The variant is the error
/// kind; each carries the offending field or value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' not found.")]
    UnknownField { field: String },
    #[error("Field '{field}' cannot be selected.")]
    FieldNotSelectable { field: String },
    #[error("Field '{field}' cannot be used for ordering.")]
    FieldNotSortable { field: String },
    #[error("Field '{field}' cannot be used in a filter.")]
    FieldNotFilterable { field: String },
    #[error("Literal {literal} cannot be read as {expected} for field '{field}'.")]
    TypeMismatch {
        field: String,
        expected: ScalarType,
        literal: String,
    },
    #[error("Operator '{operator}' is not supported for field '{field}' of type {field_type}.")]
    OperatorNotSupported {
        field: String,
        operator: ComparisonOperator,
        field_type: ScalarType,
    },
    #[error("skip must be between 0 and {max}, got {skip}.")]
    SkipOutOfRange { skip: i64, max: u32 },
    #[error("top must be between 0 and {max}, got {top}.")]
    TopOutOfRange { top: i64, max: u32 },
}
