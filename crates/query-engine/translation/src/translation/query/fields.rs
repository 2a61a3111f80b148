//! Handle the translation of field selection.

use query_engine_metadata::metadata::FieldInfo;
use query_engine_sql::sql;

/// Translate the resolved select list to SQL. Each output column is the
/// schema's column for the field, aliased by the field's exposed name; the
/// column name comes from the matched schema entry, never from request text.
pub fn translate_fields(
    table: &sql::ast::TableReference,
    select: &[(String, FieldInfo)],
) -> sql::ast::SelectList {
    sql::ast::SelectList(
        select
            .iter()
            .map(|(alias, field)| {
                sql::helpers::make_column(
                    table.clone(),
                    sql::ast::ColumnName(field.name.clone()),
                    sql::helpers::make_column_alias(alias.clone()),
                )
            })
            .collect(),
    )
}
