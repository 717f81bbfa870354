//! MySQL `information_schema` shapes and their canonical conversion.

use crate::model::{
    ColumnDecorator, ColumnDef, DataType, Expr, Options, QualifiedName, ReferenceConstraint,
    ReferentialAction, Table, TableConstraint, TableConstraintSpec, TableElement,
    UniqueConstraint,
};

use super::{ToCanonical, inline_constraints, keys, push_constraints, set_flag, set_text};

/// A table as read from `information_schema.TABLES`.
#[derive(Debug, Clone, PartialEq)]
pub struct MyTable {
    /// `schema.table`.
    pub name: QualifiedName,
    /// `TABLE_COMMENT`.
    pub comment: String,
    /// Storage engine.
    pub engine: String,
    /// Default character set.
    pub charset: String,
    /// Default collation.
    pub collation: String,
    /// Columns in ordinal order.
    pub columns: Vec<MyColumn>,
    /// Foreign keys.
    pub foreign_keys: Vec<MyForeignKey>,
    /// Indexes, one entry per index with its column list.
    pub indexes: Vec<MyIndex>,
}

impl MyTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            comment: String::new(),
            engine: String::new(),
            charset: String::new(),
            collation: String::new(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }
}

/// A column as read from `information_schema.COLUMNS`.
#[derive(Debug, Clone, PartialEq)]
pub struct MyColumn {
    /// Column name.
    pub name: String,
    /// Mapped type.
    pub data_type: DataType,
    /// `IS_NULLABLE = 'YES'`.
    pub is_nullable: bool,
    /// `COLUMN_DEFAULT`, empty when none.
    pub default_value: String,
    /// `COLUMN_COMMENT`.
    pub comment: String,
    /// `COLUMN_KEY = 'PRI'`.
    pub is_primary_key: bool,
    /// `EXTRA` contains `auto_increment`.
    pub auto_increment: bool,
    /// `UNSIGNED` integer.
    pub is_unsigned: bool,
    /// Column character set.
    pub charset: String,
    /// Column collation.
    pub collation: String,
}

impl MyColumn {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_nullable: true,
            default_value: String::new(),
            comment: String::new(),
            is_primary_key: false,
            auto_increment: false,
            is_unsigned: false,
            charset: String::new(),
            collation: String::new(),
        }
    }
}

/// A foreign key from `KEY_COLUMN_USAGE` joined with
/// `REFERENTIAL_CONSTRAINTS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    pub local_columns: Vec<String>,
    /// Referenced table.
    pub foreign_table: QualifiedName,
    /// Referenced columns.
    pub foreign_columns: Vec<String>,
    /// `UPDATE_RULE`.
    pub on_update: String,
    /// `DELETE_RULE`.
    pub on_delete: String,
}

/// An index from `information_schema.STATISTICS`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MyIndex {
    /// Index name; `PRIMARY` for the primary key.
    pub name: String,
    /// Indexed columns in sequence order.
    pub columns: Vec<String>,
    /// `NON_UNIQUE = 0`.
    pub is_unique: bool,
    /// `INDEX_TYPE` (`BTREE`, `HASH`, `PRIMARY`, ...).
    pub index_type: String,
}

impl MyIndex {
    fn is_primary(&self) -> bool {
        self.name.eq_ignore_ascii_case("PRIMARY") || self.index_type.eq_ignore_ascii_case("PRIMARY")
    }
}

impl ToCanonical for MyTable {
    type Canonical = Table;

    fn to_canonical(&self) -> Option<Table> {
        let mut options = Options::new();
        set_text(&mut options, keys::ENGINE, &self.engine);
        set_text(&mut options, keys::CHARSET, &self.charset);
        set_text(&mut options, keys::COLLATION, &self.collation);

        let mut elements: Vec<TableElement> = self
            .columns
            .iter()
            .filter_map(ToCanonical::to_canonical)
            .map(TableElement::Column)
            .collect();
        push_constraints(&mut elements, &self.foreign_keys);
        push_constraints(&mut elements, &self.indexes);

        Some(Table {
            name: self.name.clone(),
            table_type: String::new(),
            comment: self.comment.clone(),
            options,
            elements,
        })
    }
}

impl ToCanonical for MyColumn {
    type Canonical = ColumnDef;

    fn to_canonical(&self) -> Option<ColumnDef> {
        let mut options = Options::new();
        set_text(&mut options, keys::CHARSET, &self.charset);
        set_text(&mut options, keys::COLLATION, &self.collation);
        set_flag(&mut options, keys::IS_UNSIGNED, self.is_unsigned);

        let decorators = if self.auto_increment {
            vec![ColumnDecorator::AutoIncrement]
        } else {
            Vec::new()
        };

        Some(ColumnDef {
            name: self.name.clone(),
            data_type: self.data_type.clone(),
            comment: self.comment.clone(),
            default: Expr::from_optional_literal(&self.default_value),
            options,
            constraints: inline_constraints(self.is_primary_key, self.is_nullable),
            decorators,
        })
    }
}

impl ToCanonical for MyForeignKey {
    type Canonical = TableConstraint;

    fn to_canonical(&self) -> Option<TableConstraint> {
        let mut reference = ReferenceConstraint::new(
            self.local_columns.clone(),
            self.foreign_table.clone(),
            self.foreign_columns.clone(),
        );
        reference.on_update = ReferentialAction::parse(&self.on_update);
        reference.on_delete = ReferentialAction::parse(&self.on_delete);
        Some(TableConstraint::named(
            self.name.clone(),
            TableConstraintSpec::Reference(reference),
        ))
    }
}

impl ToCanonical for MyIndex {
    type Canonical = TableConstraint;

    fn to_canonical(&self) -> Option<TableConstraint> {
        let is_primary = self.is_primary();
        if !is_primary && !self.is_unique {
            return None;
        }
        Some(TableConstraint::named(
            self.name.clone(),
            TableConstraintSpec::Unique(UniqueConstraint {
                is_primary,
                columns: self.columns.clone(),
                index_name: Some(self.name.clone()),
            }),
        ))
    }
}

/// Maps a `DATA_TYPE` value. `precision` and `scale` are only read for
/// `decimal`/`numeric`.
#[must_use]
pub fn map_type(my_type: &str, precision: u32, scale: u32) -> DataType {
    let my_type = my_type.trim().to_ascii_lowercase();
    match my_type.as_str() {
        "int" | "integer" | "mediumint" => DataType::Integer,
        "bigint" => DataType::BigInteger,
        "smallint" => DataType::SmallInteger,
        // tinyint(1) is how MySQL spells BOOLEAN.
        "tinyint" | "bool" | "boolean" => DataType::Boolean,
        "decimal" | "numeric" => DataType::Decimal { precision, scale },
        "float" | "double" | "real" => DataType::Real,
        "varchar" | "char" | "text" | "tinytext" | "mediumtext" | "longtext" => DataType::Text,
        "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" => {
            DataType::Bytea
        }
        "timestamp" | "datetime" => DataType::Timestamp {
            with_time_zone: false,
        },
        _ => DataType::Custom(my_type),
    }
}
