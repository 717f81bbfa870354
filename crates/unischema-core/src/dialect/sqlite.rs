//! SQLite shapes and their canonical conversion.
//!
//! SQLite has no schemas, so a table name is always a single segment, and
//! nothing is folded into options. A single-column primary key is mirrored
//! inline on its column; a composite one becomes an unnamed table-level
//! primary key.

use crate::model::{
    ColumnDef, DataType, Database, Expr, Options, QualifiedName, Table, TableConstraint,
    TableConstraintSpec, TableElement, UniqueConstraint,
};

use super::{ToCanonical, inline_constraints};

/// All user tables of one SQLite file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqliteDatabase {
    /// Database name (usually the file stem or `main`).
    pub name: String,
    /// Tables in `sqlite_master` order.
    pub tables: Vec<SqliteTable>,
}

/// A `sqlite_master` row of type `table` or `view`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteTable {
    /// Table name.
    pub name: String,
    /// `type` column of `sqlite_master`.
    pub table_type: String,
    /// Original `CREATE` statement. Not carried into the canonical model.
    pub definition: String,
    /// Columns in `cid` order.
    pub columns: Vec<SqliteColumn>,
    /// Members of a composite primary key in key order. Empty when the key
    /// has at most one column.
    pub primary_key: Vec<String>,
}

impl SqliteTable {
    /// Creates an empty table of type `table`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: "table".to_string(),
            definition: String::new(),
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }
}

/// A `PRAGMA table_info` row.
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteColumn {
    /// Column name.
    pub name: String,
    /// Mapped type.
    pub data_type: DataType,
    /// `notnull = 0`.
    pub is_nullable: bool,
    /// `dflt_value`, empty when none.
    pub default_value: String,
    /// Sole member of the primary key.
    pub is_primary_key: bool,
}

impl SqliteColumn {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_nullable: true,
            default_value: String::new(),
            is_primary_key: false,
        }
    }
}

impl ToCanonical for SqliteDatabase {
    type Canonical = Database;

    fn to_canonical(&self) -> Option<Database> {
        Some(Database {
            name: self.name.clone(),
            tables: self
                .tables
                .iter()
                .filter_map(ToCanonical::to_canonical)
                .collect(),
        })
    }
}

impl ToCanonical for SqliteTable {
    type Canonical = Table;

    fn to_canonical(&self) -> Option<Table> {
        let mut elements: Vec<TableElement> = self
            .columns
            .iter()
            .filter_map(ToCanonical::to_canonical)
            .map(TableElement::Column)
            .collect();
        if self.primary_key.len() > 1 {
            elements.push(TableElement::Constraint(TableConstraint::unnamed(
                TableConstraintSpec::Unique(UniqueConstraint {
                    is_primary: true,
                    columns: self.primary_key.clone(),
                    index_name: None,
                }),
            )));
        }

        Some(Table {
            name: QualifiedName::simple(self.name.clone()),
            table_type: self.table_type.clone(),
            comment: String::new(),
            options: Options::new(),
            elements,
        })
    }
}

impl ToCanonical for SqliteColumn {
    type Canonical = ColumnDef;

    fn to_canonical(&self) -> Option<ColumnDef> {
        Some(ColumnDef {
            name: self.name.clone(),
            data_type: self.data_type.clone(),
            comment: String::new(),
            default: Expr::from_optional_literal(&self.default_value),
            options: Options::new(),
            constraints: inline_constraints(self.is_primary_key, self.is_nullable),
            decorators: Vec::new(),
        })
    }
}

/// Maps a declared column type using SQLite's affinity rules.
#[must_use]
pub fn map_type(declared: &str) -> DataType {
    let declared = declared.trim().to_ascii_uppercase();
    let has = |needle: &str| declared.contains(needle);
    if has("INT") {
        DataType::Integer
    } else if has("CHAR") || has("CLOB") || has("TEXT") {
        DataType::Text
    } else if has("BLOB") {
        DataType::Bytea
    } else if has("REAL") || has("FLOA") || has("DOUB") {
        DataType::Real
    } else {
        DataType::Custom(declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_conversion() {
        let mut id = SqliteColumn::new("id", DataType::Integer);
        id.is_primary_key = true;
        id.is_nullable = false;
        let mut name = SqliteColumn::new("name", DataType::Text);
        name.default_value = "'anon'".to_string();

        let mut t = SqliteTable::new("users");
        t.definition = "CREATE TABLE users (...)".to_string();
        t.columns = vec![id, name];

        let meta = t.to_canonical().unwrap();
        assert_eq!(meta.name.segments(), ["users"]);
        assert_eq!(meta.table_type, "table");
        assert!(meta.options.is_empty());

        let id = meta.column("id").unwrap();
        assert!(id.is_primary_key());
        assert!(!id.is_nullable());
        assert_eq!(id.constraints.len(), 2);

        let name = meta.column("name").unwrap();
        assert_eq!(name.default, Some(Expr::literal("'anon'")));
        assert!(name.constraints.is_empty());
    }

    #[test]
    fn composite_primary_key_is_a_table_constraint() {
        let mut t = SqliteTable::new("memberships");
        t.columns = vec![
            SqliteColumn::new("user_id", DataType::Integer),
            SqliteColumn::new("org_id", DataType::Integer),
        ];
        t.primary_key = vec!["org_id".to_string(), "user_id".to_string()];

        let meta = t.to_canonical().unwrap();
        assert!(meta.columns().all(|c| !c.is_primary_key()));
        let constraints: Vec<_> = meta.constraints().collect();
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].name, None);
        assert_eq!(
            constraints[0].spec,
            TableConstraintSpec::Unique(UniqueConstraint {
                is_primary: true,
                columns: vec!["org_id".to_string(), "user_id".to_string()],
                index_name: None,
            })
        );
    }

    #[test]
    fn database_conversion_keeps_table_order() {
        let db = SqliteDatabase {
            name: "main".to_string(),
            tables: vec![SqliteTable::new("b"), SqliteTable::new("a")],
        };
        let meta = db.to_canonical().unwrap();
        assert_eq!(meta.name, "main");
        let names: Vec<&str> = meta.tables.iter().map(|t| t.name.simple_name()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn affinity_mapping() {
        assert_eq!(map_type("INTEGER"), DataType::Integer);
        assert_eq!(map_type("bigint"), DataType::Integer);
        assert_eq!(map_type("VARCHAR(255)"), DataType::Text);
        assert_eq!(map_type("clob"), DataType::Text);
        assert_eq!(map_type("BLOB"), DataType::Bytea);
        assert_eq!(map_type("double precision"), DataType::Real);
        assert_eq!(map_type("FLOAT"), DataType::Real);
        assert_eq!(map_type("numeric"), DataType::Custom("NUMERIC".to_string()));
        assert_eq!(map_type(""), DataType::Custom(String::new()));
    }
}
