//! Snapshot persistence, live introspection and the `unischema` CLI.
//!
//! The planning logic itself lives in [`unischema_core`]; this crate adds
//! the I/O around it:
//!
//! - **Codec** - reads and writes snapshots as TOML, JSON or MessagePack,
//!   either one file per database or one file per table
//! - **Introspect** - snapshots a live SQLite database
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use unischema::prelude::*;
//!
//! # fn main() -> unischema::Result<()> {
//! let current = load_snapshot(Path::new("live.json"))?;
//! let desired = load_snapshot(Path::new("schema/"))?;
//! for change in plan(&current, &desired).iter() {
//!     println!("{change}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Snapshot a database
//! unischema introspect --database sqlite:app.db --out live.json
//!
//! # Show the ordered plan from live to desired
//! unischema plan --current live.json --desired schema/
//!
//! # Re-encode a snapshot
//! unischema convert live.json live.textpb
//! ```

pub mod codec;
pub mod error;
pub mod introspect;

pub use error::{Error, FormatError, Result};
pub use unischema_core;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::codec::{
        Format, load_database, load_database_from_dir, load_snapshot, load_table, save_database,
        save_table,
    };
    pub use crate::error::{Error, Result};
    pub use crate::introspect::SqliteIntrospector;
    pub use unischema_core::model::{Database, Table};
    pub use unischema_core::{SchemaChange, SchemaDiff, diff, plan};
}
