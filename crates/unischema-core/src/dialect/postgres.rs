//! PostgreSQL catalog shapes and their canonical conversion.

use crate::model::{
    ColumnDef, DataType, Expr, MatchOption, Options, QualifiedName, ReferenceConstraint,
    ReferentialAction, Table, TableConstraint, TableConstraintSpec, TableElement,
    UniqueConstraint,
};

use super::{ToCanonical, inline_constraints, keys, push_constraints, set_flag, set_text};

/// A table as read from `pg_catalog`.
#[derive(Debug, Clone, PartialEq)]
pub struct PgTable {
    /// `schema.table`.
    pub name: QualifiedName,
    /// `BASE TABLE`, `VIEW`, ...
    pub table_type: String,
    /// Table comment.
    pub comment: String,
    /// Owning role.
    pub owner: String,
    /// `relpersistence`.
    pub persistence: String,
    /// `relrowsecurity`.
    pub has_row_security: bool,
    /// `relforcerowsecurity`.
    pub row_security_forced: bool,
    /// Columns, in any order; conversion sorts by ordinal position.
    pub columns: Vec<PgColumn>,
    /// Primary, unique, check (and other) constraints.
    pub constraints: Vec<PgConstraint>,
    /// Foreign keys.
    pub foreign_keys: Vec<PgForeignKey>,
    /// Indexes.
    pub indexes: Vec<PgIndex>,
}

impl PgTable {
    /// Creates an empty base table.
    #[must_use]
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            table_type: "BASE TABLE".to_string(),
            comment: String::new(),
            owner: String::new(),
            persistence: String::new(),
            has_row_security: false,
            row_security_forced: false,
            columns: Vec::new(),
            constraints: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }
}

/// A column as read from `information_schema.columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct PgColumn {
    /// Column name.
    pub name: String,
    /// 1-based position.
    pub ordinal_position: i32,
    /// Mapped type.
    pub data_type: DataType,
    /// `is_nullable = 'YES'`.
    pub is_nullable: bool,
    /// `column_default`, empty when none.
    pub default_value: String,
    /// Column comment.
    pub comment: String,
    /// Sole primary key column.
    pub is_primary_key: bool,
    /// `is_identity = 'YES'`.
    pub is_identity: bool,
    /// `identity_generation`.
    pub identity_generation: String,
    /// Sequence backing the identity.
    pub identity_sequence: String,
    /// `is_generated = 'ALWAYS'`.
    pub is_generated: bool,
    /// `generation_expression`.
    pub generation_expression: String,
}

impl PgColumn {
    /// Creates a nullable column at position 0.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            ordinal_position: 0,
            data_type,
            is_nullable: true,
            default_value: String::new(),
            comment: String::new(),
            is_primary_key: false,
            is_identity: false,
            identity_generation: String::new(),
            identity_sequence: String::new(),
            is_generated: false,
            generation_expression: String::new(),
        }
    }
}

/// A `pg_constraint` row other than a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PgConstraint {
    /// Constraint name.
    pub name: String,
    /// `contype`: `p`, `u`, `c`, `x`, `t`.
    pub constraint_type: String,
    /// Constrained columns.
    pub columns: Vec<String>,
    /// `pg_get_constraintdef` output.
    pub definition: String,
}

/// A foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    pub local_columns: Vec<String>,
    /// Referenced table.
    pub foreign_table: QualifiedName,
    /// Referenced columns.
    pub foreign_columns: Vec<String>,
    /// `update_rule`.
    pub on_update: String,
    /// `delete_rule`.
    pub on_delete: String,
    /// `match_option`.
    pub match_option: String,
}

/// An index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PgIndex {
    /// Index name.
    pub name: String,
    /// Indexed columns.
    pub columns: Vec<String>,
    /// `indisprimary`.
    pub is_primary: bool,
    /// `indisunique`.
    pub is_unique: bool,
}

impl ToCanonical for PgTable {
    type Canonical = Table;

    fn to_canonical(&self) -> Option<Table> {
        let mut options = Options::new();
        set_text(&mut options, keys::OWNER, &self.owner);
        set_text(&mut options, keys::PERSISTENCE, &self.persistence);
        set_flag(&mut options, keys::HAS_ROW_SECURITY, self.has_row_security);
        set_flag(&mut options, keys::ROW_SECURITY_FORCED, self.row_security_forced);

        let mut columns: Vec<&PgColumn> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal_position);

        let mut elements: Vec<TableElement> = columns
            .into_iter()
            .filter_map(ToCanonical::to_canonical)
            .map(TableElement::Column)
            .collect();
        push_constraints(&mut elements, &self.constraints);
        push_constraints(&mut elements, &self.foreign_keys);
        // Not de-duplicated against the primary key constraint above.
        push_constraints(&mut elements, &self.indexes);

        Some(Table {
            name: self.name.clone(),
            table_type: self.table_type.clone(),
            comment: self.comment.clone(),
            options,
            elements,
        })
    }
}

impl ToCanonical for PgColumn {
    type Canonical = ColumnDef;

    fn to_canonical(&self) -> Option<ColumnDef> {
        let mut options = Options::new();
        if self.is_identity {
            set_flag(&mut options, keys::IS_IDENTITY, true);
            set_text(&mut options, keys::IDENTITY_GENERATION, &self.identity_generation);
        }
        if self.is_generated {
            set_flag(&mut options, keys::IS_GENERATED, true);
            set_text(
                &mut options,
                keys::GENERATION_EXPRESSION,
                &self.generation_expression,
            );
        }
        set_text(&mut options, keys::IDENTITY_SEQUENCE, &self.identity_sequence);

        Some(ColumnDef {
            name: self.name.clone(),
            data_type: self.data_type.clone(),
            comment: self.comment.clone(),
            default: Expr::from_optional_literal(&self.default_value),
            options,
            constraints: inline_constraints(self.is_primary_key, self.is_nullable),
            decorators: Vec::new(),
        })
    }
}

impl ToCanonical for PgConstraint {
    type Canonical = TableConstraint;

    fn to_canonical(&self) -> Option<TableConstraint> {
        let spec = match self.constraint_type.as_str() {
            "p" | "u" => TableConstraintSpec::Unique(UniqueConstraint {
                is_primary: self.constraint_type == "p",
                columns: self.columns.clone(),
                index_name: None,
            }),
            "c" => TableConstraintSpec::Check(Expr::literal(self.definition.clone())),
            // Exclusion and trigger constraints have no canonical form.
            _ => return None,
        };
        Some(TableConstraint::named(self.name.clone(), spec))
    }
}

impl ToCanonical for PgForeignKey {
    type Canonical = TableConstraint;

    fn to_canonical(&self) -> Option<TableConstraint> {
        Some(TableConstraint::named(
            self.name.clone(),
            TableConstraintSpec::Reference(ReferenceConstraint {
                columns: self.local_columns.clone(),
                foreign_table: self.foreign_table.clone(),
                foreign_columns: self.foreign_columns.clone(),
                on_update: ReferentialAction::parse(&self.on_update),
                on_delete: ReferentialAction::parse(&self.on_delete),
                match_option: MatchOption::parse(&self.match_option),
            }),
        ))
    }
}

impl ToCanonical for PgIndex {
    type Canonical = TableConstraint;

    fn to_canonical(&self) -> Option<TableConstraint> {
        if !self.is_primary && !self.is_unique {
            return None;
        }
        Some(TableConstraint::named(
            self.name.clone(),
            TableConstraintSpec::Unique(UniqueConstraint {
                is_primary: self.is_primary,
                columns: self.columns.clone(),
                index_name: Some(self.name.clone()),
            }),
        ))
    }
}

/// Maps an `information_schema` data type name.
#[must_use]
pub fn map_type(pg_type: &str) -> DataType {
    let pg_type = pg_type.trim().to_ascii_lowercase();
    match pg_type.as_str() {
        "integer" | "int" | "int4" => DataType::Integer,
        "bigint" | "int8" => DataType::BigInteger,
        "smallint" | "int2" => DataType::SmallInteger,
        "boolean" | "bool" => DataType::Boolean,
        "text" | "varchar" | "character varying" => DataType::Text,
        "real" | "float4" | "double precision" | "float8" => DataType::Real,
        "bytea" => DataType::Bytea,
        "timestamp" | "timestamp without time zone" => DataType::Timestamp {
            with_time_zone: false,
        },
        "timestamptz" | "timestamp with time zone" => DataType::Timestamp {
            with_time_zone: true,
        },
        _ => DataType::Custom(pg_type),
    }
}
