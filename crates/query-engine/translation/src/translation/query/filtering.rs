//! Handle filtering/where clause translation.

use query_engine_metadata::metadata::ComparisonOperator;
use query_engine_sql::sql;

use crate::translation::validation::TypedExpression;

/// Lower a typed filter tree to a SQL expression. Every literal renders as a
/// placeholder, so bind values line up with placeholders in left-to-right
/// tree-walk order.
pub fn translate_expression(
    table: &sql::ast::TableReference,
    predicate: &TypedExpression,
) -> sql::ast::Expression {
    match predicate {
        TypedExpression::And { left, right } => sql::ast::Expression::And {
            left: Box::new(translate_expression(table, left)),
            right: Box::new(translate_expression(table, right)),
        },
        TypedExpression::Or { left, right } => sql::ast::Expression::Or {
            left: Box::new(translate_expression(table, left)),
            right: Box::new(translate_expression(table, right)),
        },
        TypedExpression::Not(inner) => {
            sql::ast::Expression::Not(Box::new(translate_expression(table, inner)))
        }
        TypedExpression::Comparison {
            field,
            operator,
            value,
        } => {
            let column = sql::ast::Expression::ColumnReference(sql::ast::ColumnReference {
                table: table.clone(),
                name: sql::ast::ColumnName(field.name.clone()),
            });
            let (operator, value) = translate_operator(*operator, value);
            sql::ast::Expression::BinaryOperation {
                left: Box::new(column),
                operator,
                right: Box::new(sql::ast::Expression::Value(value)),
            }
        }
    }
}

/// Map a comparison operator to its SQL operator. The text-matching
/// operators become LIKE, turning the operand into a wildcard pattern.
fn translate_operator(
    operator: ComparisonOperator,
    value: &sql::ast::Value,
) -> (sql::ast::BinaryOperator, sql::ast::Value) {
    match operator {
        ComparisonOperator::Equals => (sql::ast::BinaryOperator::Equals, value.clone()),
        ComparisonOperator::NotEquals => (sql::ast::BinaryOperator::NotEquals, value.clone()),
        ComparisonOperator::GreaterThan => (sql::ast::BinaryOperator::GreaterThan, value.clone()),
        ComparisonOperator::GreaterThanOrEqualTo => (
            sql::ast::BinaryOperator::GreaterThanOrEqualTo,
            value.clone(),
        ),
        ComparisonOperator::LessThan => (sql::ast::BinaryOperator::LessThan, value.clone()),
        ComparisonOperator::LessThanOrEqualTo => {
            (sql::ast::BinaryOperator::LessThanOrEqualTo, value.clone())
        }
        ComparisonOperator::Contains => (
            sql::ast::BinaryOperator::Like,
            like_pattern(value, true, true),
        ),
        ComparisonOperator::StartsWith => (
            sql::ast::BinaryOperator::Like,
            like_pattern(value, false, true),
        ),
    }
}

/// Build a LIKE pattern from a text value, escaping the wildcard characters
/// so the operand matches literally.
fn like_pattern(
    value: &sql::ast::Value,
    wildcard_before: bool,
    wildcard_after: bool,
) -> sql::ast::Value {
    match value {
        sql::ast::Value::String(text) => {
            let mut pattern = String::with_capacity(text.len() + 2);
            if wildcard_before {
                pattern.push('%');
            }
            for char in text.chars() {
                if matches!(char, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(char);
            }
            if wildcard_after {
                pattern.push('%');
            }
            sql::ast::Value::String(pattern)
        }
        // only text values carry text operators; validated upstream
        other => other.clone(),
    }
}
