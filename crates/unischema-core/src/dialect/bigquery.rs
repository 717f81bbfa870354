//! BigQuery table schemas and their canonical conversion.

use crate::model::{
    ColumnConstraint, ColumnDef, DataType, Options, QualifiedName, StructField, Table,
    TableElement,
};

use super::ToCanonical;

/// A table as returned by the table metadata endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BqTable {
    /// `project.dataset.table`.
    pub name: QualifiedName,
    /// `TABLE`, `VIEW`, `EXTERNAL`, ...
    pub table_type: String,
    /// Table description.
    pub description: String,
    /// Top-level fields.
    pub schema: Vec<BqField>,
}

/// A field of a table schema. `RECORD` fields nest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BqField {
    /// Field name.
    pub name: String,
    /// Legacy or standard SQL type name (`STRING`, `INT64`, `RECORD`, ...).
    pub field_type: String,
    /// `NULLABLE`, `REQUIRED` or `REPEATED`.
    pub mode: String,
    /// Field description.
    pub description: String,
    /// Sub-fields of a `RECORD`/`STRUCT`.
    pub fields: Vec<BqField>,
}

impl BqField {
    /// Creates a `NULLABLE` field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            mode: "NULLABLE".to_string(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    /// Sets the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Appends a sub-field.
    #[must_use]
    pub fn with_field(mut self, field: Self) -> Self {
        self.fields.push(field);
        self
    }

    fn is_mode(&self, mode: &str) -> bool {
        self.mode.eq_ignore_ascii_case(mode)
    }
}

impl ToCanonical for BqTable {
    type Canonical = Table;

    fn to_canonical(&self) -> Option<Table> {
        Some(Table {
            name: self.name.clone(),
            table_type: self.table_type.clone(),
            comment: self.description.clone(),
            options: Options::new(),
            elements: self
                .schema
                .iter()
                .filter_map(ToCanonical::to_canonical)
                .map(TableElement::Column)
                .collect(),
        })
    }
}

impl ToCanonical for BqField {
    type Canonical = ColumnDef;

    fn to_canonical(&self) -> Option<ColumnDef> {
        let mut column = ColumnDef::new(self.name.clone(), map_type(self));
        column.comment.clone_from(&self.description);
        if self.is_mode("REQUIRED") {
            column.constraints.push(ColumnConstraint::not_null());
        }
        Some(column)
    }
}

/// Maps a field's type, recursing into records and wrapping repeated
/// fields in [`DataType::Array`].
#[must_use]
pub fn map_type(field: &BqField) -> DataType {
    let element = match field.field_type.to_ascii_uppercase().as_str() {
        "INTEGER" | "INT64" => DataType::Integer,
        "FLOAT" | "FLOAT64" => DataType::Real,
        "BOOLEAN" | "BOOL" => DataType::Boolean,
        "STRING" => DataType::Text,
        "BYTES" => DataType::Bytea,
        "NUMERIC" => DataType::Decimal {
            precision: 38,
            scale: 9,
        },
        "TIMESTAMP" => DataType::Timestamp {
            with_time_zone: true,
        },
        "STRUCT" | "RECORD" => DataType::Struct(
            field
                .fields
                .iter()
                .map(|sub| StructField::new(sub.name.clone(), map_type(sub)))
                .collect(),
        ),
        other => DataType::Custom(other.to_string()),
    };
    if field.is_mode("REPEATED") {
        DataType::array_of(element)
    } else {
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnConstraintSpec;

    #[test]
    fn table_conversion() {
        let t = BqTable {
            name: QualifiedName::new(["proj", "analytics", "events"]).unwrap(),
            table_type: "TABLE".to_string(),
            description: "Raw events".to_string(),
            schema: vec![
                BqField {
                    description: "Event id".to_string(),
                    ..BqField::new("id", "STRING").with_mode("REQUIRED")
                },
                BqField::new("tags", "STRING").with_mode("REPEATED"),
            ],
        };
        let meta = t.to_canonical().unwrap();
        assert_eq!(meta.comment, "Raw events");
        assert_eq!(meta.name.simple_name(), "events");

        let id = meta.column("id").unwrap();
        assert_eq!(id.comment, "Event id");
        assert_eq!(id.data_type, DataType::Text);
        assert_eq!(id.constraints[0].spec, ColumnConstraintSpec::NotNull);

        let tags = meta.column("tags").unwrap();
        assert_eq!(tags.data_type, DataType::array_of(DataType::Text));
        assert!(tags.is_nullable());
    }

    #[test]
    fn nested_record_maps_to_struct() {
        let field = BqField::new("payload", "RECORD")
            .with_mode("REPEATED")
            .with_field(BqField::new("n", "INT64"))
            .with_field(BqField::new("inner", "STRUCT").with_field(BqField::new("ok", "BOOL")));
        let expected = DataType::array_of(DataType::Struct(vec![
            StructField::new("n", DataType::Integer),
            StructField::new(
                "inner",
                DataType::Struct(vec![StructField::new("ok", DataType::Boolean)]),
            ),
        ]));
        assert_eq!(map_type(&field), expected);
    }

    #[test]
    fn unknown_type_is_custom() {
        assert_eq!(
            map_type(&BqField::new("g", "GEOGRAPHY")),
            DataType::Custom("GEOGRAPHY".to_string())
        );
        let missing: Option<BqField> = None;
        assert!(missing.to_canonical().is_none());
    }
}
