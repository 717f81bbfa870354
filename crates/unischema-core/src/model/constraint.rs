//! Column and table constraints.

use serde::{Deserialize, Serialize};

use super::expr::Expr;
use super::name::QualifiedName;

/// A constraint attached inline to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConstraint {
    /// Optional constraint name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// What the constraint enforces.
    pub spec: ColumnConstraintSpec,
}

impl ColumnConstraint {
    /// An unnamed NOT NULL constraint.
    #[must_use]
    pub const fn not_null() -> Self {
        Self {
            name: None,
            spec: ColumnConstraintSpec::NotNull,
        }
    }

    /// An unnamed single-column PRIMARY KEY constraint.
    #[must_use]
    pub const fn primary_key() -> Self {
        Self {
            name: None,
            spec: ColumnConstraintSpec::Unique {
                is_primary_key: true,
            },
        }
    }
}

/// Column constraint variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnConstraintSpec {
    /// UNIQUE, or PRIMARY KEY when `is_primary_key` is set.
    Unique {
        /// Whether this is the primary key.
        is_primary_key: bool,
    },
    /// NOT NULL.
    NotNull,
}

/// Non-portable column attributes kept apart from standard constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDecorator {
    /// MySQL `AUTO_INCREMENT`.
    AutoIncrement,
}

/// A table-level constraint.
///
/// Only named constraints take part in diffing; an unnamed one is carried
/// along in the table body but never produces a change on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConstraint {
    /// Constraint name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// What the constraint enforces.
    pub spec: TableConstraintSpec,
}

impl TableConstraint {
    /// Creates a named constraint.
    #[must_use]
    pub fn named(name: impl Into<String>, spec: TableConstraintSpec) -> Self {
        Self {
            name: Some(name.into()),
            spec,
        }
    }

    /// Creates an unnamed constraint.
    #[must_use]
    pub const fn unnamed(spec: TableConstraintSpec) -> Self {
        Self { name: None, spec }
    }

    /// Returns the name when it is present and non-empty.
    #[must_use]
    pub fn diff_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Returns `true` for foreign key constraints.
    #[must_use]
    pub const fn is_foreign_key(&self) -> bool {
        matches!(self.spec, TableConstraintSpec::Reference(_))
    }
}

/// Table constraint variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableConstraintSpec {
    /// UNIQUE or PRIMARY KEY over one or more columns.
    Unique(UniqueConstraint),
    /// CHECK with an opaque expression.
    Check(Expr),
    /// FOREIGN KEY.
    Reference(ReferenceConstraint),
}

/// UNIQUE / PRIMARY KEY over a column list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniqueConstraint {
    /// Whether this is the primary key.
    pub is_primary: bool,
    /// Covered columns in key order.
    pub columns: Vec<String>,
    /// Backing index, when the constraint was promoted from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
}

/// FOREIGN KEY definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceConstraint {
    /// Referencing columns in this table.
    pub columns: Vec<String>,
    /// Referenced table.
    pub foreign_table: QualifiedName,
    /// Referenced columns.
    pub foreign_columns: Vec<String>,
    /// ON UPDATE action.
    #[serde(default)]
    pub on_update: ReferentialAction,
    /// ON DELETE action.
    #[serde(default)]
    pub on_delete: ReferentialAction,
    /// MATCH option.
    #[serde(default, rename = "match")]
    pub match_option: MatchOption,
}

impl ReferenceConstraint {
    /// Creates a reference with unknown actions and match option.
    #[must_use]
    pub fn new(
        columns: Vec<String>,
        foreign_table: QualifiedName,
        foreign_columns: Vec<String>,
    ) -> Self {
        Self {
            columns,
            foreign_table,
            foreign_columns,
            on_update: ReferentialAction::Unknown,
            on_delete: ReferentialAction::Unknown,
            match_option: MatchOption::Unknown,
        }
    }
}

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    /// The dialect reported nothing we recognise.
    #[default]
    Unknown,
    /// NO ACTION.
    NoAction,
    /// RESTRICT.
    Restrict,
    /// CASCADE.
    Cascade,
    /// SET NULL.
    SetNull,
    /// SET DEFAULT.
    SetDefault,
}

impl ReferentialAction {
    /// Parses a catalog action string. Never fails.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASCADE" => Self::Cascade,
            "SET NULL" => Self::SetNull,
            "SET DEFAULT" => Self::SetDefault,
            "RESTRICT" => Self::Restrict,
            "NO ACTION" => Self::NoAction,
            _ => Self::Unknown,
        }
    }

    /// Returns the SQL keyword, or `None` for [`ReferentialAction::Unknown`].
    #[must_use]
    pub const fn as_sql(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::NoAction => Some("NO ACTION"),
            Self::Restrict => Some("RESTRICT"),
            Self::Cascade => Some("CASCADE"),
            Self::SetNull => Some("SET NULL"),
            Self::SetDefault => Some("SET DEFAULT"),
        }
    }
}

/// Foreign key MATCH option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOption {
    /// The dialect reported nothing we recognise.
    #[default]
    Unknown,
    /// MATCH SIMPLE.
    Simple,
    /// MATCH PARTIAL.
    Partial,
    /// MATCH FULL.
    Full,
}

impl MatchOption {
    /// Parses a catalog match string. Never fails.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "FULL" => Self::Full,
            "PARTIAL" => Self::Partial,
            "SIMPLE" => Self::Simple,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referential_action_parse() {
        assert_eq!(ReferentialAction::parse("cascade"), ReferentialAction::Cascade);
        assert_eq!(ReferentialAction::parse("SET NULL"), ReferentialAction::SetNull);
        assert_eq!(
            ReferentialAction::parse("set default"),
            ReferentialAction::SetDefault
        );
        assert_eq!(ReferentialAction::parse("Restrict"), ReferentialAction::Restrict);
        assert_eq!(ReferentialAction::parse("NO ACTION"), ReferentialAction::NoAction);
        assert_eq!(ReferentialAction::parse(""), ReferentialAction::Unknown);
        assert_eq!(ReferentialAction::parse("a"), ReferentialAction::Unknown);
        assert_eq!(ReferentialAction::Unknown.as_sql(), None);
        assert_eq!(ReferentialAction::Cascade.as_sql(), Some("CASCADE"));
    }

    #[test]
    fn match_option_parse() {
        assert_eq!(MatchOption::parse("full"), MatchOption::Full);
        assert_eq!(MatchOption::parse("PARTIAL"), MatchOption::Partial);
        assert_eq!(MatchOption::parse("Simple"), MatchOption::Simple);
        assert_eq!(MatchOption::parse("NONE"), MatchOption::Unknown);
    }

    #[test]
    fn diff_name_ignores_empty() {
        let spec = TableConstraintSpec::Check(Expr::literal("x > 0"));
        assert_eq!(TableConstraint::named("", spec.clone()).diff_name(), None);
        assert_eq!(TableConstraint::unnamed(spec.clone()).diff_name(), None);
        assert_eq!(
            TableConstraint::named("ck_x", spec).diff_name(),
            Some("ck_x")
        );
    }

    #[test]
    fn foreign_key_detection() {
        let fk = TableConstraint::named(
            "fk_user",
            TableConstraintSpec::Reference(ReferenceConstraint::new(
                vec!["user_id".into()],
                QualifiedName::simple("users"),
                vec!["id".into()],
            )),
        );
        assert!(fk.is_foreign_key());
        let uq = TableConstraint::named(
            "uq_email",
            TableConstraintSpec::Unique(UniqueConstraint {
                is_primary: false,
                columns: vec!["email".into()],
                index_name: None,
            }),
        );
        assert!(!uq.is_foreign_key());
    }
}
