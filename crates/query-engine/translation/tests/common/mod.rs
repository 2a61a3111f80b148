use indexmap::IndexMap;

use query_engine_metadata::metadata::{Catalog, EntitySchema, FieldInfo, ScalarType};
use query_engine_sql::sql::execution_plan::CompiledStatement;
use query_engine_translation::translation;
use query_engine_translation::translation::error::QueryError;
use query_engine_translation::translation::options::{Limits, RawQueryOptions};

/// The bookstore catalog used across the integration tests.
pub fn books_catalog() -> Catalog {
    let mut fields = IndexMap::new();
    for (name, scalar_type) in [
        ("Id", ScalarType::Integer),
        ("ISBN", ScalarType::Text),
        ("Title", ScalarType::Text),
        ("Author", ScalarType::Text),
        ("Price", ScalarType::Numeric),
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

    Catalog(
        [(
            "Books".to_string(),
            EntitySchema {
                schema_name: "public".to_string(),
                table_name: "Books".to_string(),
                fields,
            },
        )]
        .into(),
    )
}

/// Build a statement for the `Books` entity with the default limits.
pub fn build_books(raw_options: RawQueryOptions) -> Result<CompiledStatement, QueryError> {
    translation::build(
        &books_catalog(),
        &Limits::default(),
        "Books",
        raw_options,
    )
}
