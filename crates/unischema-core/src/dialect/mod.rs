//! Dialect conversion layer.
//!
//! Each submodule describes the schema tree one engine's introspector
//! produces and converts it into the canonical [`model`](crate::model).
//! Features with no portable equivalent (engine, owner, identity metadata,
//! ...) are folded into the generic options mapping under the fixed key
//! names in [`keys`].
//!
//! Conversion never fails. A missing dialect object converts to `None`, and
//! so does a dialect object with no canonical counterpart (a Postgres
//! exclusion constraint, say); enclosing conversions skip those.

pub mod bigquery;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::model::{ColumnConstraint, Options, TableConstraint, TableElement};

/// Fixed option key names.
pub mod keys {
    /// Postgres table owner.
    pub const OWNER: &str = "Owner";
    /// Postgres relation persistence (`p`, `u`, `t`).
    pub const PERSISTENCE: &str = "Persistence";
    /// Postgres row level security enabled.
    pub const HAS_ROW_SECURITY: &str = "HasRowSecurity";
    /// Postgres row level security forced for the owner.
    pub const ROW_SECURITY_FORCED: &str = "RowSecurityForced";
    /// Postgres identity column.
    pub const IS_IDENTITY: &str = "IsIdentity";
    /// Postgres identity generation (`ALWAYS`, `BY DEFAULT`).
    pub const IDENTITY_GENERATION: &str = "IdentityGeneration";
    /// Postgres identity sequence name.
    pub const IDENTITY_SEQUENCE: &str = "IdentitySequence";
    /// Postgres generated column.
    pub const IS_GENERATED: &str = "IsGenerated";
    /// Postgres generation expression.
    pub const GENERATION_EXPRESSION: &str = "GenerationExpression";
    /// MySQL storage engine.
    pub const ENGINE: &str = "Engine";
    /// MySQL character set.
    pub const CHARSET: &str = "Charset";
    /// MySQL collation.
    pub const COLLATION: &str = "Collation";
    /// MySQL unsigned integer column.
    pub const IS_UNSIGNED: &str = "IsUnsigned";
}

/// Conversion from a dialect-native schema value into the canonical model.
pub trait ToCanonical {
    /// The canonical type produced.
    type Canonical;

    /// Returns the canonical equivalent, or `None` when there is none.
    fn to_canonical(&self) -> Option<Self::Canonical>;
}

impl<T: ToCanonical> ToCanonical for Option<T> {
    type Canonical = T::Canonical;

    fn to_canonical(&self) -> Option<Self::Canonical> {
        self.as_ref().and_then(ToCanonical::to_canonical)
    }
}

/// Records `value` under `key` unless it is empty.
pub(crate) fn set_text(options: &mut Options, key: &str, value: &str) {
    if !value.is_empty() {
        options.insert(key.to_string(), value.to_string());
    }
}

/// Records `"true"` under `key` when `flag` is set; absence means false.
pub(crate) fn set_flag(options: &mut Options, key: &str, flag: bool) {
    if flag {
        options.insert(key.to_string(), "true".to_string());
    }
}

/// Inline constraints shared by every dialect: a mirrored single-column
/// primary key, then NOT NULL.
pub(crate) fn inline_constraints(is_primary_key: bool, is_nullable: bool) -> Vec<ColumnConstraint> {
    let mut constraints = Vec::new();
    if is_primary_key {
        constraints.push(ColumnConstraint::primary_key());
    }
    if !is_nullable {
        constraints.push(ColumnConstraint::not_null());
    }
    constraints
}

/// Converts every item and appends the successful ones as constraint
/// elements.
pub(crate) fn push_constraints<'a, T, I>(elements: &mut Vec<TableElement>, items: I)
where
    T: ToCanonical<Canonical = TableConstraint> + 'a,
    I: IntoIterator<Item = &'a T>,
{
    elements.extend(
        items
            .into_iter()
            .filter_map(ToCanonical::to_canonical)
            .map(TableElement::Constraint),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnConstraintSpec;

    struct Always(u8);

    impl ToCanonical for Always {
        type Canonical = u8;

        fn to_canonical(&self) -> Option<u8> {
            Some(self.0)
        }
    }

    #[test]
    fn missing_value_converts_to_none() {
        let missing: Option<Always> = None;
        assert_eq!(missing.to_canonical(), None);
        assert_eq!(Some(Always(3)).to_canonical(), Some(3));
    }

    #[test]
    fn flags_only_present_when_true() {
        let mut options = Options::new();
        set_flag(&mut options, keys::HAS_ROW_SECURITY, false);
        set_text(&mut options, keys::OWNER, "");
        assert!(options.is_empty());
        set_flag(&mut options, keys::HAS_ROW_SECURITY, true);
        set_text(&mut options, keys::OWNER, "postgres");
        assert_eq!(options[keys::HAS_ROW_SECURITY], "true");
        assert_eq!(options[keys::OWNER], "postgres");
    }

    #[test]
    fn inline_constraint_order() {
        let c = inline_constraints(true, false);
        assert_eq!(c.len(), 2);
        assert_eq!(
            c[0].spec,
            ColumnConstraintSpec::Unique {
                is_primary_key: true
            }
        );
        assert_eq!(c[1].spec, ColumnConstraintSpec::NotNull);
        assert!(inline_constraints(false, true).is_empty());
    }
}
