//! Metadata information regarding the database and tracked entities.

use std::collections::BTreeMap;

use enum_iterator::Sequence;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The scalar types supported by the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Boolean,
    Integer,
    Numeric,
    Text,
    Date,
}

impl ScalarType {
    const OPERATORS_SUPPORTED_BY_ALL_TYPES: &'static [ComparisonOperator] = &[
        ComparisonOperator::Equals,
        ComparisonOperator::NotEquals,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessThanOrEqualTo,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThanOrEqualTo,
    ];

    const TEXT_OPERATORS: &'static [ComparisonOperator] = &[
        ComparisonOperator::Contains,
        ComparisonOperator::StartsWith,
    ];

    /// Returns the complete set of comparison operators for the given type.
    pub fn comparison_operators(&self) -> Vec<ComparisonOperator> {
        let mut operators = Self::OPERATORS_SUPPORTED_BY_ALL_TYPES.to_vec();
        if let ScalarType::Text = self {
            operators.extend(Self::TEXT_OPERATORS.iter());
        }
        operators
    }

    /// Whether the given operator is legal against a field of this type.
    pub fn supports_operator(&self, operator: ComparisonOperator) -> bool {
        self.comparison_operators().contains(&operator)
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ScalarType::Boolean => "boolean",
            ScalarType::Integer => "integer",
            ScalarType::Numeric => "numeric",
            ScalarType::Text => "text",
            ScalarType::Date => "date",
        };
        write!(f, "{}", name)
    }
}

/// The complete list of supported comparison operators.
/// Not all of these are supported for every scalar type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Sequence,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Contains,
    StartsWith,
}

impl ComparisonOperator {
    /// The name of the operator as it appears in a filter string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals => "eq",
            Self::NotEquals => "ne",
            Self::LessThan => "lt",
            Self::LessThanOrEqualTo => "le",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqualTo => "ge",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
        }
    }

    /// Look up an operator by its filter-string name.
    pub fn from_name(name: &str) -> Option<Self> {
        enum_iterator::all::<Self>().find(|operator| operator.name() == name)
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mapping from an exposed entity name to its schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Catalog(pub BTreeMap<String, EntitySchema>);

impl Catalog {
    pub fn empty() -> Self {
        Catalog(BTreeMap::new())
    }

    /// Look up the schema for an entity. `None` means the entity is unknown.
    pub fn schema_for(&self, entity_name: &str) -> Option<&EntitySchema> {
        self.0.get(entity_name)
    }
}

/// The schema of a single queryable entity.
///
/// Fields are keyed by their exposed name; the map's order is the entity's
/// declaration order, which is also the order used when a query selects
/// every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntitySchema {
    pub schema_name: String,
    pub table_name: String,
    pub fields: IndexMap<String, FieldInfo>,
}

impl EntitySchema {
    /// Look up a field by its exposed name.
    pub fn field(&self, field_name: &str) -> Option<&FieldInfo> {
        self.fields.get(field_name)
    }
}

/// Information about a single field of an entity: the database column it
/// maps to, its scalar type, and what query operations it participates in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldInfo {
    pub name: String,
    pub r#type: ScalarType,
    #[serde(default = "default_capability")]
    pub selectable: bool,
    #[serde(default = "default_capability")]
    pub filterable: bool,
    #[serde(default = "default_capability")]
    pub sortable: bool,
}

fn default_capability() -> bool {
    true
}
