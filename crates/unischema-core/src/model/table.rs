//! Databases, tables and column definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::constraint::{
    ColumnConstraint, ColumnConstraintSpec, ColumnDecorator, TableConstraint,
};
use super::data_type::DataType;
use super::expr::Expr;
use super::name::QualifiedName;

/// Dialect-specific flags (`Engine`, `Owner`, ...).
///
/// Boolean flags are only present when true.
pub type Options = BTreeMap<String, String>;

/// One snapshot of a database schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Database {
    /// Database name.
    pub name: String,
    /// Tables in source order.
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Adds a table.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Looks up a table by simple name. When several tables share it, the
    /// last one wins, as in [`diff`](fn@crate::diff).
    #[must_use]
    pub fn table(&self, simple_name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .rfind(|t| t.name.simple_name() == simple_name)
    }
}

/// A table (or view) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Qualified table name.
    pub name: QualifiedName,
    /// Type tag such as `BASE TABLE`, `VIEW`, `table`.
    #[serde(default)]
    pub table_type: String,
    /// Table comment; empty when unset.
    #[serde(default)]
    pub comment: String,
    /// Dialect-specific options.
    #[serde(default)]
    pub options: Options,
    /// Columns and table constraints.
    #[serde(default)]
    pub elements: Vec<TableElement>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            table_type: String::new(),
            comment: String::new(),
            options: Options::new(),
            elements: Vec::new(),
        }
    }

    /// Sets the type tag.
    #[must_use]
    pub fn with_type(mut self, table_type: impl Into<String>) -> Self {
        self.table_type = table_type.into();
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets one option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Appends a column.
    #[must_use]
    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.elements.push(TableElement::Column(column));
        self
    }

    /// Appends a table constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: TableConstraint) -> Self {
        self.elements.push(TableElement::Constraint(constraint));
        self
    }

    /// Columns in element order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.elements.iter().filter_map(|e| match e {
            TableElement::Column(c) => Some(c),
            TableElement::Constraint(_) => None,
        })
    }

    /// Table constraints in element order, named or not.
    pub fn constraints(&self) -> impl Iterator<Item = &TableConstraint> {
        self.elements.iter().filter_map(|e| match e {
            TableElement::Constraint(c) => Some(c),
            TableElement::Column(_) => None,
        })
    }

    /// Named table constraints with their names.
    pub fn named_constraints(&self) -> impl Iterator<Item = (&str, &TableConstraint)> {
        self.constraints()
            .filter_map(|c| c.diff_name().map(|name| (name, c)))
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns().find(|c| c.name == name)
    }
}

/// A member of a table body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableElement {
    /// A column definition.
    Column(ColumnDef),
    /// A table-level constraint.
    Constraint(TableConstraint),
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column type.
    pub data_type: DataType,
    /// Column comment; empty when unset.
    #[serde(default)]
    pub comment: String,
    /// Default value envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Expr>,
    /// Dialect-specific options.
    #[serde(default)]
    pub options: Options,
    /// Inline constraints.
    #[serde(default)]
    pub constraints: Vec<ColumnConstraint>,
    /// Non-portable decorators (auto-increment, ...).
    #[serde(default)]
    pub decorators: Vec<ColumnDecorator>,
}

impl ColumnDef {
    /// Creates a nullable column with no default.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            comment: String::new(),
            default: None,
            options: Options::new(),
            constraints: Vec::new(),
            decorators: Vec::new(),
        }
    }

    /// Adds a NOT NULL constraint.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.constraints.push(ColumnConstraint::not_null());
        self
    }

    /// Adds an inline PRIMARY KEY constraint.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.constraints.push(ColumnConstraint::primary_key());
        self
    }

    /// Sets the default to a literal expression.
    #[must_use]
    pub fn with_default(mut self, text: impl Into<String>) -> Self {
        self.default = Some(Expr::literal(text));
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets one option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Adds a decorator.
    #[must_use]
    pub fn with_decorator(mut self, decorator: ColumnDecorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    /// Returns `false` when a NOT NULL constraint is present.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        !self
            .constraints
            .iter()
            .any(|c| c.spec == ColumnConstraintSpec::NotNull)
    }

    /// Returns `true` when an inline PRIMARY KEY constraint is present.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.constraints.iter().any(|c| {
            c.spec
                == ColumnConstraintSpec::Unique {
                    is_primary_key: true,
                }
        })
    }

    /// Compares the parts of a column the diff engine tracks: name, comment,
    /// data type and default.
    ///
    /// Inline constraints, options and decorators are not compared, so a
    /// nullability change alone does not register as an alteration.
    #[must_use]
    pub fn same_definition(&self, other: &Self) -> bool {
        self.name == other.name
            && self.comment == other.comment
            && self.data_type == other.data_type
            && self.default == other.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableConstraintSpec, UniqueConstraint};

    fn users() -> Table {
        Table::new(QualifiedName::new(["public", "users"]).unwrap())
            .with_column(ColumnDef::new("id", DataType::BigInteger).primary_key().not_null())
            .with_column(ColumnDef::new("email", DataType::Text))
            .with_constraint(TableConstraint::named(
                "users_pkey",
                TableConstraintSpec::Unique(UniqueConstraint {
                    is_primary: true,
                    columns: vec!["id".into()],
                    index_name: None,
                }),
            ))
            .with_constraint(TableConstraint::unnamed(TableConstraintSpec::Check(
                Expr::literal("id > 0"),
            )))
    }

    #[test]
    fn element_accessors() {
        let t = users();
        let cols: Vec<&str> = t.columns().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, ["id", "email"]);
        assert_eq!(t.constraints().count(), 2);
        let named: Vec<&str> = t.named_constraints().map(|(n, _)| n).collect();
        assert_eq!(named, ["users_pkey"]);
        assert!(t.column("email").is_some());
        assert!(t.column("missing").is_none());
    }

    #[test]
    fn nullability_and_primary_key() {
        let t = users();
        let id = t.column("id").unwrap();
        assert!(!id.is_nullable());
        assert!(id.is_primary_key());
        let email = t.column("email").unwrap();
        assert!(email.is_nullable());
        assert!(!email.is_primary_key());
    }

    #[test]
    fn same_definition_ignores_constraints_and_options() {
        let a = ColumnDef::new("email", DataType::Text);
        let b = ColumnDef::new("email", DataType::Text)
            .not_null()
            .with_option("Collation", "utf8mb4_bin")
            .with_decorator(ColumnDecorator::AutoIncrement);
        assert!(a.same_definition(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn same_definition_tracks_type_comment_default() {
        let base = ColumnDef::new("n", DataType::Integer);
        assert!(!base.same_definition(&ColumnDef::new("n", DataType::BigInteger)));
        assert!(!base.same_definition(&base.clone().with_comment("count")));
        assert!(!base.same_definition(&base.clone().with_default("0")));
        assert!(!base.same_definition(&ColumnDef::new("m", DataType::Integer)));
    }

    #[test]
    fn database_lookup_by_simple_name() {
        let db = Database::new("app").with_table(users());
        assert!(db.table("users").is_some());
        assert!(db.table("public.users").is_none());
    }

    #[test]
    fn database_lookup_prefers_last_duplicate() {
        let db = Database::new("app")
            .with_table(Table::new(QualifiedName::new(["audit", "users"]).unwrap()))
            .with_table(Table::new(QualifiedName::new(["public", "users"]).unwrap()));
        assert_eq!(
            db.table("users").map(|t| t.name.to_string()),
            Some("public.users".to_string())
        );
    }
}
