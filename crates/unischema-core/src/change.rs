//! Schema changes.
//!
//! A [`SchemaChange`] is one atomic add, drop or alter at table, column or
//! constraint granularity. Every change knows whether it can discard data
//! and which execution phase it belongs to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ColumnDef, Options, QualifiedName, Table, TableConstraint};

/// All schema change kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum SchemaChange {
    /// Create a table.
    AddTable(AddTableChange),
    /// Drop a table.
    DropTable(DropTableChange),
    /// Change a table's comment or options.
    AlterTableOptions(AlterTableOptionsChange),
    /// Add a column to an existing table.
    AddColumn(AddColumnChange),
    /// Drop a column.
    DropColumn(DropColumnChange),
    /// Replace a column definition.
    AlterColumn(AlterColumnChange),
    /// Add a named table constraint.
    AddConstraint(AddConstraintChange),
    /// Drop a named table constraint.
    DropConstraint(DropConstraintChange),
}

/// Discriminant of a [`SchemaChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// [`SchemaChange::AddTable`].
    AddTable,
    /// [`SchemaChange::DropTable`].
    DropTable,
    /// [`SchemaChange::AlterTableOptions`].
    AlterTableOptions,
    /// [`SchemaChange::AddColumn`].
    AddColumn,
    /// [`SchemaChange::DropColumn`].
    DropColumn,
    /// [`SchemaChange::AlterColumn`].
    AlterColumn,
    /// [`SchemaChange::AddConstraint`].
    AddConstraint,
    /// [`SchemaChange::DropConstraint`].
    DropConstraint,
}

impl ChangeKind {
    /// Returns the kind as a `snake_case` string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddTable => "add_table",
            Self::DropTable => "drop_table",
            Self::AlterTableOptions => "alter_table_options",
            Self::AddColumn => "add_column",
            Self::DropColumn => "drop_column",
            Self::AlterColumn => "alter_column",
            Self::AddConstraint => "add_constraint",
            Self::DropConstraint => "drop_constraint",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SchemaChange {
    /// Execution phase; lower runs earlier.
    ///
    /// | change                      | priority |
    /// |-----------------------------|----------|
    /// | drop constraint (foreign key) | 5      |
    /// | drop constraint (other)     | 10       |
    /// | drop column                 | 20       |
    /// | drop table                  | 30       |
    /// | add table                   | 40       |
    /// | add column                  | 50       |
    /// | add constraint              | 60       |
    /// | alter column, alter options | 70       |
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Self::DropConstraint(c) if c.is_foreign_key => 5,
            Self::DropConstraint(_) => 10,
            Self::DropColumn(_) => 20,
            Self::DropTable(_) => 30,
            Self::AddTable(_) => 40,
            Self::AddColumn(_) => 50,
            Self::AddConstraint(_) => 60,
            Self::AlterColumn(_) | Self::AlterTableOptions(_) => 70,
        }
    }

    /// Returns `true` when applying the change can discard stored data.
    ///
    /// Any column alteration counts, whether or not the new type is wider.
    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::DropColumn(_) | Self::DropTable(_) | Self::AlterColumn(_)
        )
    }

    /// The change's kind.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::AddTable(_) => ChangeKind::AddTable,
            Self::DropTable(_) => ChangeKind::DropTable,
            Self::AlterTableOptions(_) => ChangeKind::AlterTableOptions,
            Self::AddColumn(_) => ChangeKind::AddColumn,
            Self::DropColumn(_) => ChangeKind::DropColumn,
            Self::AlterColumn(_) => ChangeKind::AlterColumn,
            Self::AddConstraint(_) => ChangeKind::AddConstraint,
            Self::DropConstraint(_) => ChangeKind::DropConstraint,
        }
    }

    /// The table the change applies to.
    #[must_use]
    pub const fn table_name(&self) -> &QualifiedName {
        match self {
            Self::AddTable(c) => &c.table.name,
            Self::DropTable(c) => &c.table,
            Self::AlterTableOptions(c) => &c.table,
            Self::AddColumn(c) => &c.table,
            Self::DropColumn(c) => &c.table,
            Self::AlterColumn(c) => &c.table,
            Self::AddConstraint(c) => &c.table,
            Self::DropConstraint(c) => &c.table,
        }
    }
}

impl fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddTable(c) => {
                let columns = c.table.columns().count();
                write!(f, "add table {} ({columns} columns)", c.table.name)
            }
            Self::DropTable(c) => write!(f, "drop table {}", c.table),
            Self::AlterTableOptions(_) => {
                write!(f, "alter table {} options", self.table_name())
            }
            Self::AddColumn(c) => write!(
                f,
                "add column {}.{} {}",
                c.table, c.column.name, c.column.data_type
            ),
            Self::DropColumn(c) => write!(f, "drop column {}.{}", c.table, c.column),
            Self::AlterColumn(c) => write!(
                f,
                "alter column {}.{} {} -> {}",
                c.table, c.new.name, c.old.data_type, c.new.data_type
            ),
            Self::AddConstraint(c) => write!(
                f,
                "add constraint {} on {}",
                c.constraint.name.as_deref().unwrap_or_default(),
                c.table
            ),
            Self::DropConstraint(c) => {
                let what = if c.is_foreign_key {
                    "foreign key"
                } else {
                    "constraint"
                };
                write!(f, "drop {what} {} on {}", c.name, c.table)
            }
        }
    }
}

/// Add table change. Carries the full desired definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTableChange {
    /// The table to create.
    pub table: Table,
}

impl From<AddTableChange> for SchemaChange {
    fn from(change: AddTableChange) -> Self {
        Self::AddTable(change)
    }
}

/// Drop table change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTableChange {
    /// Table name.
    pub table: QualifiedName,
}

impl From<DropTableChange> for SchemaChange {
    fn from(change: DropTableChange) -> Self {
        Self::DropTable(change)
    }
}

/// Table comment/options change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterTableOptionsChange {
    /// Table name.
    pub table: QualifiedName,
    /// Current comment.
    pub old_comment: String,
    /// Desired comment.
    pub new_comment: String,
    /// Current options.
    pub old_options: Options,
    /// Desired options.
    pub new_options: Options,
}

impl From<AlterTableOptionsChange> for SchemaChange {
    fn from(change: AlterTableOptionsChange) -> Self {
        Self::AlterTableOptions(change)
    }
}

/// Add column change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddColumnChange {
    /// Table name.
    pub table: QualifiedName,
    /// Column definition.
    pub column: ColumnDef,
}

impl From<AddColumnChange> for SchemaChange {
    fn from(change: AddColumnChange) -> Self {
        Self::AddColumn(change)
    }
}

/// Drop column change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropColumnChange {
    /// Table name.
    pub table: QualifiedName,
    /// Column name.
    pub column: String,
}

impl From<DropColumnChange> for SchemaChange {
    fn from(change: DropColumnChange) -> Self {
        Self::DropColumn(change)
    }
}

/// Alter column change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterColumnChange {
    /// Table name.
    pub table: QualifiedName,
    /// Current definition.
    pub old: ColumnDef,
    /// Desired definition.
    pub new: ColumnDef,
}

impl From<AlterColumnChange> for SchemaChange {
    fn from(change: AlterColumnChange) -> Self {
        Self::AlterColumn(change)
    }
}

/// Add constraint change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddConstraintChange {
    /// Table name.
    pub table: QualifiedName,
    /// Constraint definition.
    pub constraint: TableConstraint,
}

impl From<AddConstraintChange> for SchemaChange {
    fn from(change: AddConstraintChange) -> Self {
        Self::AddConstraint(change)
    }
}

/// Drop constraint change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropConstraintChange {
    /// Table name.
    pub table: QualifiedName,
    /// Constraint name.
    pub name: String,
    /// Foreign keys are dropped in an earlier phase than other constraints.
    pub is_foreign_key: bool,
}

impl From<DropConstraintChange> for SchemaChange {
    fn from(change: DropConstraintChange) -> Self {
        Self::DropConstraint(change)
    }
}
