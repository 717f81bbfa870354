//! Persisted snapshot formats.
//!
//! A snapshot file's format is chosen by its extension:
//!
//! | extension                     | format                          |
//! |-------------------------------|---------------------------------|
//! | `.textpb`, `.txtpb`, `.pbtxt` | [`Format::Text`] (TOML)         |
//! | `.json`                       | [`Format::Json`] (pretty JSON)  |
//! | `.pb`, `.bin`                 | [`Format::Binary`] (MessagePack)|
//!
//! A directory of `*.table.<ext>` files can also be read as one database,
//! one table per file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use unischema_core::model::{Database, Table};

use crate::error::{Error, FormatError, Result};

/// Marker a file name must contain to be picked up by
/// [`load_database_from_dir`].
pub const TABLE_FILE_MARKER: &str = ".table.";

/// A snapshot serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-editable structured text.
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Compact MessagePack with named fields.
    Binary,
}

impl Format {
    /// Picks the format from a path's extension, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownExtension`] when the extension is missing or
    /// unrecognised.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "textpb" | "txtpb" | "pbtxt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "pb" | "bin" => Ok(Self::Binary),
            _ => Err(Error::UnknownExtension {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Canonical extension for files written in this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "textpb",
            Self::Json => "json",
            Self::Binary => "pb",
        }
    }
}

// ================================================================
// Byte-level encoding
// ================================================================

/// Serializes any snapshot value.
///
/// # Errors
///
/// Returns the backend's error when the value cannot be represented.
pub fn encode<T: Serialize>(value: &T, format: Format) -> std::result::Result<Vec<u8>, FormatError> {
    Ok(match format {
        Format::Text => toml::to_string_pretty(value)?.into_bytes(),
        Format::Json => {
            let mut bytes = serde_json::to_vec_pretty(value)?;
            bytes.push(b'\n');
            bytes
        }
        Format::Binary => rmp_serde::to_vec_named(value)?,
    })
}

/// Deserializes any snapshot value.
///
/// # Errors
///
/// Returns the backend's error when `bytes` is malformed.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], format: Format) -> std::result::Result<T, FormatError> {
    Ok(match format {
        Format::Text => toml::from_str(std::str::from_utf8(bytes)?)?,
        Format::Json => serde_json::from_slice(bytes)?,
        Format::Binary => rmp_serde::from_slice(bytes)?,
    })
}

/// Serializes a database snapshot.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_database(db: &Database, format: Format) -> std::result::Result<Vec<u8>, FormatError> {
    encode(db, format)
}

/// Deserializes a database snapshot.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_database(bytes: &[u8], format: Format) -> std::result::Result<Database, FormatError> {
    decode(bytes, format)
}

// ================================================================
// Files
// ================================================================

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = Format::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&bytes, format).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let format = Format::from_path(path)?;
    let bytes = encode(value, format).map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a database snapshot file.
///
/// # Errors
///
/// Fails on an unknown extension, an unreadable file or a malformed
/// payload.
pub fn load_database(path: &Path) -> Result<Database> {
    debug!(path = %path.display(), "loading database snapshot");
    read_file(path)
}

/// Writes a database snapshot file, choosing the format from `path`.
///
/// # Errors
///
/// Fails on an unknown extension or a write error.
pub fn save_database(db: &Database, path: &Path) -> Result<()> {
    debug!(path = %path.display(), tables = db.tables.len(), "saving database snapshot");
    write_file(db, path)
}

/// Reads a single-table snapshot file.
///
/// # Errors
///
/// Fails on an unknown extension, an unreadable file or a malformed
/// payload.
pub fn load_table(path: &Path) -> Result<Table> {
    read_file(path)
}

/// Writes a single-table snapshot file.
///
/// # Errors
///
/// Fails on an unknown extension or a write error.
pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    write_file(table, path)
}

/// Builds a database named `name` from every `*.table.<ext>` file directly
/// inside `dir`, taken in file name order. Other files are ignored.
///
/// # Errors
///
/// Fails when `dir` cannot be listed, or with [`Error::TableFile`] naming
/// the first table file that cannot be loaded.
pub fn load_database_from_dir(dir: &Path, name: &str) -> Result<Database> {
    let io_err = |source: std::io::Error| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let is_file = entry.file_type().map_err(io_err)?.is_file();
        if is_file && entry.file_name().to_string_lossy().contains(TABLE_FILE_MARKER) {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut db = Database::new(name);
    for path in files {
        debug!(path = %path.display(), "loading table file");
        let table = load_table(&path).map_err(|source| Error::TableFile {
            path: path.clone(),
            source: Box::new(source),
        })?;
        db.tables.push(table);
    }
    Ok(db)
}

/// Loads a snapshot from either a database file or a table directory. A
/// directory's database takes the directory's name.
///
/// # Errors
///
/// See [`load_database`] and [`load_database_from_dir`].
pub fn load_snapshot(path: &Path) -> Result<Database> {
    if path.is_dir() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        load_database_from_dir(path, &name)
    } else {
        load_database(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unischema_core::model::{ColumnDef, DataType, QualifiedName};

    fn sample() -> Database {
        Database::new("app").with_table(
            Table::new(QualifiedName::new(["public", "users"]).unwrap())
                .with_type("BASE TABLE")
                .with_column(ColumnDef::new("id", DataType::BigInteger).primary_key().not_null())
                .with_column(
                    ColumnDef::new("tags", DataType::array_of(DataType::Text)).with_default("{}"),
                ),
        )
    }

    #[test]
    fn format_from_extension() {
        for (file, format) in [
            ("a.textpb", Format::Text),
            ("a.TXTPB", Format::Text),
            ("a.pbtxt", Format::Text),
            ("a.json", Format::Json),
            ("a.pb", Format::Binary),
            ("a.users.table.bin", Format::Binary),
        ] {
            assert_eq!(Format::from_path(Path::new(file)).unwrap(), format, "{file}");
        }
    }

    #[test]
    fn unknown_extension_is_named() {
        let err = Format::from_path(Path::new("schema.yaml")).unwrap_err();
        match err {
            Error::UnknownExtension { extension, path } => {
                assert_eq!(extension, "yaml");
                assert_eq!(path, Path::new("schema.yaml"));
            }
            other => panic!("expected UnknownExtension, got {other:?}"),
        }
        assert!(matches!(
            Format::from_path(Path::new("schema")),
            Err(Error::UnknownExtension { .. })
        ));
    }

    #[test]
    fn every_format_decodes_what_it_encodes() {
        let db = sample();
        for format in [Format::Text, Format::Json, Format::Binary] {
            let bytes = encode_database(&db, format).unwrap();
            assert_eq!(decode_database(&bytes, format).unwrap(), db, "{format:?}");
        }
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(decode_database(b"{", Format::Json).is_err());
        assert!(decode_database(b"name = ", Format::Text).is_err());
        assert!(decode_database(&[0xc1], Format::Binary).is_err());
        assert!(matches!(
            decode_database(&[0xff, 0xfe], Format::Text),
            Err(FormatError::Utf8(_))
        ));
    }

    #[test]
    fn empty_qualified_name_is_rejected() {
        let json = br#"{"name":"app","tables":[{"name":[]}]}"#;
        assert!(decode_database(json, Format::Json).is_err());
    }
}
