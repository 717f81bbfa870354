//! Error types for snapshot persistence and introspection.

use std::path::PathBuf;

/// Failure of one serialization backend, independent of any file.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Text snapshots must be UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// TOML parse failure.
    #[error(transparent)]
    TextDecode(#[from] toml::de::Error),

    /// TOML render failure.
    #[error(transparent)]
    TextEncode(#[from] toml::ser::Error),

    /// JSON failure in either direction.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// MessagePack parse failure.
    #[error(transparent)]
    BinaryDecode(#[from] rmp_serde::decode::Error),

    /// MessagePack render failure.
    #[error(transparent)]
    BinaryEncode(#[from] rmp_serde::encode::Error),
}

/// Errors that can occur while loading, saving or introspecting snapshots.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a snapshot file failed.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file could not be parsed.
    #[error("Failed to decode '{path}': {source}")]
    Decode {
        /// Offending file.
        path: PathBuf,
        /// Backend error.
        #[source]
        source: FormatError,
    },

    /// A snapshot could not be serialized.
    #[error("Failed to encode '{path}': {source}")]
    Encode {
        /// Destination file.
        path: PathBuf,
        /// Backend error.
        #[source]
        source: FormatError,
    },

    /// The file extension does not name a known snapshot format.
    #[error("Unknown snapshot extension '{extension}' for '{path}'")]
    UnknownExtension {
        /// Offending file.
        path: PathBuf,
        /// The extension found, empty when there was none.
        extension: String,
    },

    /// One file of a table directory failed to load.
    #[error("Failed to load table file '{path}': {source}")]
    TableFile {
        /// Offending file.
        path: PathBuf,
        /// What went wrong with it.
        #[source]
        source: Box<Self>,
    },

    /// Database error during introspection.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;
