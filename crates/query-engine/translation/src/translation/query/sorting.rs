//! Handle the translation of ordering.

use query_engine_sql::sql;

use crate::translation::options::OrderDirection;
use crate::translation::validation::TypedOrderByElement;

/// Translate the resolved order-by list to a SQL ORDER BY clause. The clause
/// is empty (and renders as nothing) when no ordering was requested.
pub fn translate_order_by(
    table: &sql::ast::TableReference,
    order_by: &[TypedOrderByElement],
) -> sql::ast::OrderBy {
    sql::ast::OrderBy {
        elements: order_by
            .iter()
            .map(|element| sql::ast::OrderByElement {
                target: sql::ast::Expression::ColumnReference(sql::ast::ColumnReference {
                    table: table.clone(),
                    name: sql::ast::ColumnName(element.field.name.clone()),
                }),
                direction: match element.direction {
                    OrderDirection::Asc => sql::ast::OrderByDirection::Asc,
                    OrderDirection::Desc => sql::ast::OrderByDirection::Desc,
                },
            })
            .collect(),
    }
}
