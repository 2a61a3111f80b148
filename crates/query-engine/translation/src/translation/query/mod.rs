//! Translate a validated query to an ExecutionPlan (SQL) to be run against
//! the database.

pub mod fields;
pub mod filtering;
pub mod sorting;

use query_engine_metadata::metadata::EntitySchema;
use query_engine_sql::sql;

use super::validation::ValidatedQuery;

/// Compile a validated query into the SQL AST for the primary statement and,
/// when a count was requested, a count statement over the same restriction.
///
/// Infallible by construction: every field reference was resolved during
/// validation and every literal already carries its typed value.
pub fn translate(schema: &EntitySchema, query: &ValidatedQuery) -> sql::execution_plan::ExecutionPlan {
    let table_alias = sql::helpers::make_table_alias(schema.table_name.clone());
    let table = sql::ast::TableReference::AliasedTable(table_alias.clone());

    let from = sql::ast::From {
        reference: sql::ast::TableReference::DBTable {
            schema: sql::ast::SchemaName(schema.schema_name.clone()),
            table: sql::ast::TableName(schema.table_name.clone()),
        },
        alias: table_alias,
    };

    let select_list = fields::translate_fields(&table, &query.select);

    let where_ = sql::ast::Where(match &query.filter {
        Some(predicate) => filtering::translate_expression(&table, predicate),
        None => sql::helpers::empty_where(),
    });

    let order_by = sorting::translate_order_by(&table, &query.order_by);

    // paging is always explicit on the primary statement
    let limit = sql::ast::Limit {
        limit: Some(query.top),
        offset: Some(query.skip),
    };

    // the count statement shares FROM and WHERE but carries no ordering or
    // paging: it counts the filtered population, not the page
    let count = query
        .include_count
        .then(|| sql::helpers::count_star_select(from.clone(), where_.clone()));

    let select = sql::ast::Select {
        select_list,
        from,
        where_,
        order_by,
        limit,
    };

    sql::execution_plan::ExecutionPlan {
        query: select,
        count,
    }
}
