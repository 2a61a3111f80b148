//! Translate incoming query options to a statement to be run against the
//! database: parse the filter, validate the whole options model against the
//! catalog, compile to a SQL AST and render it.

pub mod error;
pub mod filter;
pub mod options;
pub mod query;
pub mod validation;
pub mod values;

use query_engine_metadata::metadata;
use query_engine_sql::sql::execution_plan::CompiledStatement;

pub use error::{QueryError, ValidationError};
pub use filter::ParseError;

/// Build a statement for an entity from raw query options.
///
/// Pure orchestration: stateless and deterministic, the same inputs always
/// produce the same statement. The result is the statement actually handed
/// to the data-access layer, or the first error found, typed for a
/// client-facing response.
pub fn build(
    catalog: &metadata::Catalog,
    limits: &options::Limits,
    entity_name: &str,
    raw_options: options::RawQueryOptions,
) -> Result<CompiledStatement, QueryError> {
    let schema = catalog
        .schema_for(entity_name)
        .ok_or_else(|| QueryError::SchemaNotFound(entity_name.to_string()))?;

    let decoded = options::QueryOptions::from_raw(raw_options, limits)?;

    let validated = validation::validate(&decoded, schema, limits)?;

    let plan = query::translate(schema, &validated);
    tracing::debug!("SQL AST: {:?}", plan);

    let statement = plan.compile();
    tracing::debug!("SQL: {}", statement.query.sql);

    Ok(statement)
}
