//! Canonical schema model.
//!
//! Every dialect converts into these types and the diff engine only ever
//! reads them. Snapshots are built once and treated as read-only.

mod constraint;
mod data_type;
mod expr;
mod name;
mod table;

pub use constraint::{
    ColumnConstraint, ColumnConstraintSpec, ColumnDecorator, MatchOption, ReferenceConstraint,
    ReferentialAction, TableConstraint, TableConstraintSpec, UniqueConstraint,
};
pub use data_type::{DataType, StructField};
pub use expr::Expr;
pub use name::QualifiedName;
pub use table::{ColumnDef, Database, Options, Table, TableElement};
