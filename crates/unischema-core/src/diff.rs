//! Schema diff engine.
//!
//! Compares a "current" and a "desired" [`Database`] snapshot and produces
//! the [`SchemaChange`]s needed to move from one to the other. [`diff`]
//! returns changes in emission order; [`plan`] additionally sorts them into
//! a safe execution order.
//!
//! Tables are matched by simple name only, so `public.users` and
//! `audit.users` are the same table as far as the diff is concerned.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::change::{
    AddColumnChange, AddConstraintChange, AddTableChange, AlterColumnChange,
    AlterTableOptionsChange, DropColumnChange, DropConstraintChange, DropTableChange,
    SchemaChange,
};
use crate::model::{ColumnDef, Database, QualifiedName, Table, TableConstraint};

// ================================================================
// Public types
// ================================================================

/// Which snapshot a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The snapshot being migrated from.
    Current,
    /// The snapshot being migrated to.
    Desired,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "current",
            Self::Desired => "desired",
        })
    }
}

/// Something the diff engine noticed but did not turn into a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffWarning {
    /// Several tables of one snapshot share a simple name. Only the last
    /// one listed takes part in the diff.
    AmbiguousTableName {
        /// Snapshot containing the tables.
        side: Side,
        /// The shared simple name.
        simple_name: String,
        /// Every colliding table, in snapshot order.
        qualified_names: Vec<QualifiedName>,
    },
}

impl fmt::Display for DiffWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousTableName {
                side,
                simple_name,
                qualified_names,
            } => {
                let names: Vec<String> = qualified_names.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "{side} snapshot has {} tables named {simple_name} ({}); using the last one",
                    names.len(),
                    names.join(", ")
                )
            }
        }
    }
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaDiff {
    /// Changes, in emission order or (after [`plan`]) execution order.
    pub changes: Vec<SchemaChange>,
    /// Informational warnings.
    pub warnings: Vec<DiffWarning>,
}

impl SchemaDiff {
    /// Returns `true` when there are no changes. Warnings are not counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Iterates over the changes.
    pub fn iter(&self) -> std::slice::Iter<'_, SchemaChange> {
        self.changes.iter()
    }

    /// Returns `true` if any change can discard data.
    #[must_use]
    pub fn has_destructive(&self) -> bool {
        self.changes.iter().any(SchemaChange::is_destructive)
    }

    /// Returns references to the destructive changes.
    #[must_use]
    pub fn destructive_changes(&self) -> Vec<&SchemaChange> {
        self.changes.iter().filter(|c| c.is_destructive()).collect()
    }

    /// Consumes the diff, returning only the changes.
    #[must_use]
    pub fn into_changes(self) -> Vec<SchemaChange> {
        self.changes
    }
}

impl<'a> IntoIterator for &'a SchemaDiff {
    type Item = &'a SchemaChange;
    type IntoIter = std::slice::Iter<'a, SchemaChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ================================================================
// Entry points
// ================================================================

/// Compares two snapshots. Changes come out unsorted but in a
/// reproducible order: dropped tables, added tables, then tables present
/// on both sides, each group by ascending simple name.
#[must_use]
pub fn diff(current: &Database, desired: &Database) -> SchemaDiff {
    let mut warnings = Vec::new();
    let current_tables = tables_by_name(current, Side::Current, &mut warnings);
    let desired_tables = tables_by_name(desired, Side::Desired, &mut warnings);

    let mut changes = Vec::new();

    for (name, table) in &current_tables {
        if !desired_tables.contains_key(name) {
            debug!(table = %table.name, "table dropped");
            drop_table(table, &mut changes);
        }
    }

    for (name, table) in &desired_tables {
        if !current_tables.contains_key(name) {
            debug!(table = %table.name, "table added");
            changes.push(
                AddTableChange {
                    table: (*table).clone(),
                }
                .into(),
            );
        }
    }

    for (name, desired_table) in &desired_tables {
        if let Some(current_table) = current_tables.get(name) {
            diff_table(current_table, desired_table, &mut changes);
        }
    }

    debug!(
        changes = changes.len(),
        warnings = warnings.len(),
        "diff complete"
    );
    SchemaDiff { changes, warnings }
}

/// Compares two snapshots and sorts the result into execution order.
#[must_use]
pub fn plan(current: &Database, desired: &Database) -> SchemaDiff {
    let mut result = diff(current, desired);
    sort_changes(&mut result.changes);
    result
}

/// Sorts changes by ascending priority. The sort is stable, so changes in
/// the same phase keep their emission order.
pub fn sort_changes(changes: &mut [SchemaChange]) {
    changes.sort_by_key(SchemaChange::priority);
}

// ================================================================
// Table-level diff
// ================================================================

fn tables_by_name<'a>(
    db: &'a Database,
    side: Side,
    warnings: &mut Vec<DiffWarning>,
) -> BTreeMap<&'a str, &'a Table> {
    let mut groups: BTreeMap<&str, Vec<&Table>> = BTreeMap::new();
    for table in &db.tables {
        groups.entry(table.name.simple_name()).or_default().push(table);
    }

    let mut tables = BTreeMap::new();
    for (name, group) in groups {
        if group.len() > 1 {
            let qualified_names: Vec<QualifiedName> =
                group.iter().map(|t| t.name.clone()).collect();
            warn!(
                %side,
                table = name,
                count = group.len(),
                "several tables share a simple name, using the last one"
            );
            warnings.push(DiffWarning::AmbiguousTableName {
                side,
                simple_name: name.to_string(),
                qualified_names,
            });
        }
        if let Some(last) = group.last() {
            tables.insert(name, *last);
        }
    }
    tables
}

/// A dropped table loses its named constraints first, then the table.
fn drop_table(table: &Table, changes: &mut Vec<SchemaChange>) {
    for (name, constraint) in table.named_constraints() {
        changes.push(
            DropConstraintChange {
                table: table.name.clone(),
                name: name.to_string(),
                is_foreign_key: constraint.is_foreign_key(),
            }
            .into(),
        );
    }
    changes.push(
        DropTableChange {
            table: table.name.clone(),
        }
        .into(),
    );
}

fn diff_table(current: &Table, desired: &Table, changes: &mut Vec<SchemaChange>) {
    let table = &desired.name;

    if current.comment != desired.comment || current.options != desired.options {
        debug!(%table, "table options changed");
        changes.push(
            AlterTableOptionsChange {
                table: table.clone(),
                old_comment: current.comment.clone(),
                new_comment: desired.comment.clone(),
                old_options: current.options.clone(),
                new_options: desired.options.clone(),
            }
            .into(),
        );
    }

    diff_columns(table, &columns_by_name(current), &columns_by_name(desired), changes);
    diff_constraints(
        table,
        &constraints_by_name(current),
        &constraints_by_name(desired),
        changes,
    );
}

// ================================================================
// Column and constraint diff
// ================================================================

fn columns_by_name(table: &Table) -> IndexMap<&str, &ColumnDef> {
    table.columns().map(|c| (c.name.as_str(), c)).collect()
}

fn constraints_by_name(table: &Table) -> IndexMap<&str, &TableConstraint> {
    table.named_constraints().collect()
}

fn diff_columns(
    table: &QualifiedName,
    current: &IndexMap<&str, &ColumnDef>,
    desired: &IndexMap<&str, &ColumnDef>,
    changes: &mut Vec<SchemaChange>,
) {
    for name in current.keys() {
        if !desired.contains_key(name) {
            changes.push(
                DropColumnChange {
                    table: table.clone(),
                    column: (*name).to_string(),
                }
                .into(),
            );
        }
    }

    for (name, column) in desired {
        if !current.contains_key(name) {
            changes.push(
                AddColumnChange {
                    table: table.clone(),
                    column: (*column).clone(),
                }
                .into(),
            );
        }
    }

    for (name, new) in desired {
        if let Some(old) = current.get(name) {
            if !old.same_definition(new) {
                debug!(%table, column = *name, "column changed");
                changes.push(
                    AlterColumnChange {
                        table: table.clone(),
                        old: (*old).clone(),
                        new: (*new).clone(),
                    }
                    .into(),
                );
            }
        }
    }
}

/// Constraints present under the same name on both sides are never
/// compared. A modified constraint has to be expressed as a drop and an add.
fn diff_constraints(
    table: &QualifiedName,
    current: &IndexMap<&str, &TableConstraint>,
    desired: &IndexMap<&str, &TableConstraint>,
    changes: &mut Vec<SchemaChange>,
) {
    for (name, constraint) in current {
        if !desired.contains_key(name) {
            changes.push(
                DropConstraintChange {
                    table: table.clone(),
                    name: (*name).to_string(),
                    is_foreign_key: constraint.is_foreign_key(),
                }
                .into(),
            );
        }
    }

    for (name, constraint) in desired {
        if !current.contains_key(name) {
            changes.push(
                AddConstraintChange {
                    table: table.clone(),
                    constraint: (*constraint).clone(),
                }
                .into(),
            );
        }
    }
}
