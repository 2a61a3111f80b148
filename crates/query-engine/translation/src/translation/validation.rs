//! Validate a decoded request against an entity schema.
//!
//! The checks run in a fixed order, each over the whole options model, so the
//! first failure reported is deterministic: selected fields, order-by fields,
//! filter fields, literal types, operator/type compatibility, paging bounds.

use query_engine_metadata::metadata::{ComparisonOperator, EntitySchema, FieldInfo};
use query_engine_sql::sql;

use super::error::ValidationError;
use super::filter;
use super::options::{Limits, OrderByElement, OrderDirection, QueryOptions};
use super::values;

/// A fully validated request, ready for compilation. Field references are
/// resolved to their schema entries and literals carry typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    /// Exposed name and schema entry of each output column, in output order.
    pub select: Vec<(String, FieldInfo)>,
    pub filter: Option<TypedExpression>,
    pub order_by: Vec<TypedOrderByElement>,
    pub skip: u32,
    pub top: u32,
    pub include_count: bool,
}

/// The filter tree after validation: fields resolved, literals typed.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedExpression {
    Comparison {
        field: FieldInfo,
        operator: ComparisonOperator,
        value: sql::ast::Value,
    },
    And {
        left: Box<TypedExpression>,
        right: Box<TypedExpression>,
    },
    Or {
        left: Box<TypedExpression>,
        right: Box<TypedExpression>,
    },
    Not(Box<TypedExpression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedOrderByElement {
    pub field: FieldInfo,
    pub direction: OrderDirection,
}

/// Check every part of the options model against the schema and the
/// configured limits. First failure wins.
pub fn validate(
    options: &QueryOptions,
    schema: &EntitySchema,
    limits: &Limits,
) -> Result<ValidatedQuery, ValidationError> {
    let select = validate_select(options, schema)?;

    let order_by = validate_order_by(options, schema)?;

    if let Some(predicate) = &options.filter {
        check_filter_fields(predicate, schema)?;
    }

    let filter = match &options.filter {
        Some(predicate) => Some(coerce_filter_literals(predicate, schema)?),
        None => None,
    };

    if let Some(predicate) = &options.filter {
        check_filter_operators(predicate, schema)?;
    }

    let (skip, top) = validate_paging(options, limits)?;

    Ok(ValidatedQuery {
        select,
        filter,
        order_by,
        skip,
        top,
        include_count: options.include_count,
    })
}

/// Every selected field must exist and be selectable. An empty select list
/// means every selectable field, in schema order.
fn validate_select(
    options: &QueryOptions,
    schema: &EntitySchema,
) -> Result<Vec<(String, FieldInfo)>, ValidationError> {
    if options.select.is_empty() {
        return Ok(schema
            .fields
            .iter()
            .filter(|(_, field)| field.selectable)
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect());
    }

    options
        .select
        .iter()
        .map(|name| {
            let field = lookup_field(schema, name)?;
            if !field.selectable {
                return Err(ValidationError::FieldNotSelectable {
                    field: name.clone(),
                });
            }
            Ok((name.clone(), field.clone()))
        })
        .collect()
}

/// Every ordering field must exist and be sortable.
fn validate_order_by(
    options: &QueryOptions,
    schema: &EntitySchema,
) -> Result<Vec<TypedOrderByElement>, ValidationError> {
    options
        .order_by
        .iter()
        .map(|OrderByElement { field, direction }| {
            let field_info = lookup_field(schema, field)?;
            if !field_info.sortable {
                return Err(ValidationError::FieldNotSortable {
                    field: field.clone(),
                });
            }
            Ok(TypedOrderByElement {
                field: field_info.clone(),
                direction: *direction,
            })
        })
        .collect()
}

/// Every field referenced in the filter must exist and be filterable.
fn check_filter_fields(
    predicate: &filter::Expression,
    schema: &EntitySchema,
) -> Result<(), ValidationError> {
    match predicate {
        filter::Expression::Comparison { field, .. } => {
            let field_info = lookup_field(schema, field)?;
            if !field_info.filterable {
                return Err(ValidationError::FieldNotFilterable {
                    field: field.clone(),
                });
            }
            Ok(())
        }
        filter::Expression::And { left, right } | filter::Expression::Or { left, right } => {
            check_filter_fields(left, schema)?;
            check_filter_fields(right, schema)
        }
        filter::Expression::Not(inner) => check_filter_fields(inner, schema),
    }
}

/// Convert every literal to its field's declared type, building the typed
/// tree. Fails on the leftmost literal that does not coerce.
fn coerce_filter_literals(
    predicate: &filter::Expression,
    schema: &EntitySchema,
) -> Result<TypedExpression, ValidationError> {
    match predicate {
        filter::Expression::Comparison {
            field,
            operator,
            literal,
        } => {
            let field_info = lookup_field(schema, field)?;
            let value = values::coerce_literal(field, field_info, literal)?;
            Ok(TypedExpression::Comparison {
                field: field_info.clone(),
                operator: *operator,
                value,
            })
        }
        filter::Expression::And { left, right } => Ok(TypedExpression::And {
            left: Box::new(coerce_filter_literals(left, schema)?),
            right: Box::new(coerce_filter_literals(right, schema)?),
        }),
        filter::Expression::Or { left, right } => Ok(TypedExpression::Or {
            left: Box::new(coerce_filter_literals(left, schema)?),
            right: Box::new(coerce_filter_literals(right, schema)?),
        }),
        filter::Expression::Not(inner) => Ok(TypedExpression::Not(Box::new(
            coerce_filter_literals(inner, schema)?,
        ))),
    }
}

/// Every operator must be legal for its field's type; in particular the text
/// operators only apply to text fields.
fn check_filter_operators(
    predicate: &filter::Expression,
    schema: &EntitySchema,
) -> Result<(), ValidationError> {
    match predicate {
        filter::Expression::Comparison {
            field, operator, ..
        } => {
            let field_info = lookup_field(schema, field)?;
            if !field_info.r#type.supports_operator(*operator) {
                return Err(ValidationError::OperatorNotSupported {
                    field: field.clone(),
                    operator: *operator,
                    field_type: field_info.r#type,
                });
            }
            Ok(())
        }
        filter::Expression::And { left, right } | filter::Expression::Or { left, right } => {
            check_filter_operators(left, schema)?;
            check_filter_operators(right, schema)
        }
        filter::Expression::Not(inner) => check_filter_operators(inner, schema),
    }
}

/// `skip` and `top` must sit inside the configured bounds. Out-of-range
/// values are rejected, never clamped.
fn validate_paging(options: &QueryOptions, limits: &Limits) -> Result<(u32, u32), ValidationError> {
    let skip = u32::try_from(options.skip).map_err(|_| ValidationError::SkipOutOfRange {
        skip: options.skip,
        max: u32::MAX,
    })?;

    let top = u32::try_from(options.top)
        .ok()
        .filter(|top| *top <= limits.max_top)
        .ok_or(ValidationError::TopOutOfRange {
            top: options.top,
            max: limits.max_top,
        })?;

    Ok((skip, top))
}

fn lookup_field<'a>(
    schema: &'a EntitySchema,
    field_name: &str,
) -> Result<&'a FieldInfo, ValidationError> {
    schema
        .field(field_name)
        .ok_or_else(|| ValidationError::UnknownField {
            field: field_name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use query_engine_metadata::metadata::ScalarType;
    use crate::translation::options::RawQueryOptions;

    fn schema() -> EntitySchema {
        let mut fields = IndexMap::new();
        for (name, scalar_type) in [
            ("Id", ScalarType::Integer),
            ("Title", ScalarType::Text),
            ("Price", ScalarType::Numeric),
            ("Published", ScalarType::Date),
        ] {
            fields.insert(
                name.to_string(),
                FieldInfo {
                    name: name.to_string(),
                    r#type: scalar_type,
                    selectable: true,
                    filterable: true,
                    sortable: true,
                },
            );
        }
        fields.insert(
            "Secret".to_string(),
            FieldInfo {
                name: "Secret".to_string(),
                r#type: ScalarType::Text,
                selectable: false,
                filterable: false,
                sortable: false,
            },
        );
        EntitySchema {
            schema_name: "public".to_string(),
            table_name: "Books".to_string(),
            fields,
        }
    }

    fn options(raw: RawQueryOptions) -> QueryOptions {
        QueryOptions::from_raw(raw, &Limits::default()).unwrap()
    }

    #[test]
    fn test_empty_select_resolves_to_selectable_fields_in_schema_order() {
        let validated =
            validate(&options(RawQueryOptions::default()), &schema(), &Limits::default()).unwrap();
        let names: Vec<&str> = validated
            .select
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["Id", "Title", "Price", "Published"]);
    }

    #[test]
    fn test_unknown_select_field_is_rejected() {
        let error = validate(
            &options(RawQueryOptions {
                select: vec!["Publisher".to_string()],
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            ValidationError::UnknownField {
                field: "Publisher".to_string()
            }
        );
    }

    #[test]
    fn test_unselectable_field_is_rejected() {
        let error = validate(
            &options(RawQueryOptions {
                select: vec!["Secret".to_string()],
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            ValidationError::FieldNotSelectable {
                field: "Secret".to_string()
            }
        );
    }

    #[test]
    fn test_unsortable_field_is_rejected() {
        let error = validate(
            &options(RawQueryOptions {
                order_by: vec![OrderByElement {
                    field: "Secret".to_string(),
                    direction: OrderDirection::Asc,
                }],
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            ValidationError::FieldNotSortable {
                field: "Secret".to_string()
            }
        );
    }

    #[test]
    fn test_unfilterable_field_is_rejected() {
        let error = validate(
            &options(RawQueryOptions {
                filter: Some("Secret eq 'x'".to_string()),
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            ValidationError::FieldNotFilterable {
                field: "Secret".to_string()
            }
        );
    }

    #[test]
    fn test_field_checks_run_before_literal_checks() {
        // the left comparison has a bad literal, the right one an unknown
        // field; the field pass covers the whole tree first
        let error = validate(
            &options(RawQueryOptions {
                filter: Some("Id eq 'one' and Publisher eq 'X'".to_string()),
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            ValidationError::UnknownField {
                field: "Publisher".to_string()
            }
        );
    }

    #[test]
    fn test_literal_checks_run_before_operator_checks() {
        // the first comparison misuses both its literal and its operator;
        // the literal pass reports first
        let error = validate(
            &options(RawQueryOptions {
                filter: Some("Price contains 'x' and Id eq 'one'".to_string()),
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert!(matches!(error, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_contains_on_non_text_field_is_rejected() {
        // the literal coerces fine for a date field, so this is an operator
        // defect rather than a type defect
        let error = validate(
            &options(RawQueryOptions {
                filter: Some("Published contains '2013-01-01'".to_string()),
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            ValidationError::OperatorNotSupported {
                field: "Published".to_string(),
                operator: ComparisonOperator::Contains,
                field_type: ScalarType::Date,
            }
        );
    }

    #[test]
    fn test_top_above_maximum_is_rejected_not_clamped() {
        let error = validate(
            &options(RawQueryOptions {
                top: Some(101),
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            ValidationError::TopOutOfRange { top: 101, max: 100 }
        );
    }

    #[test]
    fn test_negative_skip_is_rejected() {
        let error = validate(
            &options(RawQueryOptions {
                skip: Some(-1),
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap_err();
        assert!(matches!(error, ValidationError::SkipOutOfRange { .. }));
    }

    #[test]
    fn test_zero_page_is_valid() {
        let validated = validate(
            &options(RawQueryOptions {
                skip: Some(0),
                top: Some(0),
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap();
        assert_eq!((validated.skip, validated.top), (0, 0));
    }

    #[test]
    fn test_valid_filter_produces_typed_tree() {
        let validated = validate(
            &options(RawQueryOptions {
                filter: Some("Price gt 50 and Title eq 'Enterprise Games'".to_string()),
                ..RawQueryOptions::default()
            }),
            &schema(),
            &Limits::default(),
        )
        .unwrap();

        match validated.filter.unwrap() {
            TypedExpression::And { left, right } => {
                assert!(matches!(
                    *left,
                    TypedExpression::Comparison {
                        value: sql::ast::Value::Float8(_),
                        ..
                    }
                ));
                assert!(matches!(
                    *right,
                    TypedExpression::Comparison {
                        value: sql::ast::Value::String(_),
                        ..
                    }
                ));
            }
            other => panic!("expected an and at the root, got {:?}", other),
        }
    }
}
