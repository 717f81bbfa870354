//! Canonical data types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Dialect-agnostic column data types.
///
/// `Array` and `Struct` nest, so a BigQuery `ARRAY<STRUCT<..>>` column keeps
/// its full shape. Anything a dialect mapper does not recognise lands in
/// [`DataType::Custom`] with the catalog type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    // Integer types
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    BigInteger,
    /// Small integer (2 bytes).
    SmallInteger,

    // Numeric types
    /// Exact numeric with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: u32,
        /// Number of digits after the decimal point.
        scale: u32,
    },
    /// Floating point.
    Real,

    /// Boolean.
    Boolean,
    /// Unbounded character data.
    Text,
    /// Binary data.
    Bytea,
    /// Timestamp, optionally zone-aware.
    Timestamp {
        /// Whether values carry a time zone.
        with_time_zone: bool,
    },

    // Composite types
    /// Ordered collection of a single element type.
    Array(Box<DataType>),
    /// Record with named, ordered fields.
    Struct(Vec<StructField>),

    /// Dialect-specific type kept by name.
    Custom(String),
}

/// A named member of a [`DataType::Struct`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructField {
    /// Field name.
    pub name: String,
    /// Field type.
    pub data_type: DataType,
}

impl StructField {
    /// Creates a struct field.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

impl DataType {
    /// Wraps `element` in an array type.
    #[must_use]
    pub fn array_of(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns `true` for `Array` and `Struct`.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Struct(_))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("INTEGER"),
            Self::BigInteger => f.write_str("BIGINT"),
            Self::SmallInteger => f.write_str("SMALLINT"),
            Self::Decimal { precision, scale } => write!(f, "DECIMAL({precision}, {scale})"),
            Self::Real => f.write_str("REAL"),
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::Text => f.write_str("TEXT"),
            Self::Bytea => f.write_str("BYTEA"),
            Self::Timestamp {
                with_time_zone: true,
            } => f.write_str("TIMESTAMP WITH TIME ZONE"),
            Self::Timestamp {
                with_time_zone: false,
            } => f.write_str("TIMESTAMP"),
            Self::Array(element) => write!(f, "ARRAY<{element}>"),
            Self::Struct(fields) => {
                f.write_str("STRUCT<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", field.name, field.data_type)?;
                }
                f.write_str(">")
            }
            Self::Custom(name) => f.write_str(name),
        }
    }
}
