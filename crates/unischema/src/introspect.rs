//! Live SQLite introspection.
//!
//! Reads `sqlite_master` and `pragma_table_info` into the SQLite dialect
//! shapes, then converts them into a canonical snapshot.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use unischema_core::dialect::sqlite::{self, SqliteColumn, SqliteDatabase, SqliteTable};
use unischema_core::model::Database;
use unischema_core::ToCanonical;

use crate::error::Result;

const LIST_TABLES_SQL: &str = "SELECT name, type, COALESCE(sql, '') FROM sqlite_master \
     WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' ORDER BY name";

const TABLE_INFO_SQL: &str =
    "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?) ORDER BY cid";

/// Reads the schema of a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteIntrospector {
    pool: SqlitePool,
    name: String,
}

impl SqliteIntrospector {
    /// Creates an introspector over an existing pool. `name` becomes the
    /// snapshot's database name.
    #[must_use]
    pub fn new(pool: SqlitePool, name: impl Into<String>) -> Self {
        Self {
            pool,
            name: name.into(),
        }
    }

    /// Opens a pool for `url` and names the snapshot `main`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`](crate::Error::Database) when the
    /// connection cannot be opened.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        Ok(Self::new(pool, "main"))
    }

    /// Loads every user table and view.
    ///
    /// A table whose columns cannot be read is skipped with a warning;
    /// loading carries on with the rest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`](crate::Error::Database) when the table
    /// listing itself fails.
    pub async fn load(&self) -> Result<SqliteDatabase> {
        let listing: Vec<(String, String, String)> = sqlx::query_as(LIST_TABLES_SQL)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = listing.len(), "listed sqlite tables");

        let mut tables = Vec::with_capacity(listing.len());
        for (name, table_type, definition) in listing {
            let loaded = self
                .load_columns(&name)
                .await
                .map(|(columns, primary_key)| SqliteTable {
                    name: name.clone(),
                    table_type,
                    definition,
                    columns,
                    primary_key,
                });
            tables.extend(keep_loaded(&name, loaded));
        }

        info!(database = %self.name, tables = tables.len(), "introspected sqlite schema");
        Ok(SqliteDatabase {
            name: self.name.clone(),
            tables,
        })
    }

    /// Loads the schema and converts it to a canonical snapshot.
    ///
    /// # Errors
    ///
    /// See [`SqliteIntrospector::load`].
    pub async fn snapshot(&self) -> Result<Database> {
        let native = self.load().await?;
        Ok(native.to_canonical().unwrap_or_default())
    }

    /// Reads the columns of `table` along with its composite primary key,
    /// if any.
    async fn load_columns(&self, table: &str) -> Result<(Vec<SqliteColumn>, Vec<String>)> {
        let rows: Vec<(String, String, i64, Option<String>, i64)> = sqlx::query_as(TABLE_INFO_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        let mut key: Vec<(i64, String)> = rows
            .iter()
            .filter(|row| row.4 > 0)
            .map(|row| (row.4, row.0.clone()))
            .collect();
        key.sort_unstable();
        let single_key = key.len() == 1;

        let columns = rows
            .into_iter()
            .map(|(name, declared, not_null, default, pk)| SqliteColumn {
                name,
                data_type: sqlite::map_type(&declared),
                is_nullable: not_null == 0,
                default_value: default.unwrap_or_default(),
                is_primary_key: single_key && pk > 0,
            })
            .collect();
        let primary_key = if single_key {
            Vec::new()
        } else {
            key.into_iter().map(|(_, name)| name).collect()
        };
        Ok((columns, primary_key))
    }
}

/// Applies the partial-result policy: a table that failed to load is
/// logged and dropped.
fn keep_loaded(name: &str, loaded: Result<SqliteTable>) -> Option<SqliteTable> {
    match loaded {
        Ok(table) => Some(table),
        Err(err) => {
            warn!(table = name, error = %err, "skipping table, metadata unavailable");
            None
        }
    }
}
