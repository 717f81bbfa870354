//! # unischema-core
//!
//! A canonical, dialect-agnostic schema model and a migration planner built
//! on top of it.
//!
//! This crate provides:
//! - The canonical model ([`model`]): databases, tables, columns,
//!   constraints and a closed set of data types
//! - Conversion from Postgres, MySQL, SQLite and BigQuery catalog shapes
//!   ([`dialect`])
//! - A diff engine that compares two snapshots ([`diff()`])
//! - A planner that orders the resulting changes into safe execution
//!   phases ([`plan()`])
//!
//! Nothing here performs I/O. Snapshots come from a loader or a decoder and
//! are only ever read.
//!
//! ## Planning a migration
//!
//! ```rust
//! use unischema_core::model::{ColumnDef, DataType, Database, QualifiedName, Table};
//! use unischema_core::{ChangeKind, plan};
//!
//! let users = Table::new(QualifiedName::simple("users"))
//!     .with_column(ColumnDef::new("id", DataType::BigInteger).primary_key().not_null());
//!
//! let current = Database::new("app").with_table(users.clone());
//! let desired = Database::new("app")
//!     .with_table(users.with_column(ColumnDef::new("email", DataType::Text)));
//!
//! let result = plan(&current, &desired);
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.changes[0].kind(), ChangeKind::AddColumn);
//! assert!(!result.has_destructive());
//! ```

pub mod change;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod model;

pub use change::{ChangeKind, SchemaChange};
pub use dialect::ToCanonical;
pub use diff::{DiffWarning, SchemaDiff, Side, diff, plan, sort_changes};
pub use error::ModelError;
pub use model::{Database, QualifiedName, Table};
