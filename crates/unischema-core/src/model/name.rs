//! Qualified object names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A dotted object name such as `public.users` or `project.dataset.events`.
///
/// The segment list is never empty. The last segment is the *simple name*,
/// which is what the diff engine uses to match tables across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct QualifiedName(Vec<String>);

impl QualifiedName {
    /// Builds a name from its segments.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyName`] when `segments` yields nothing.
    pub fn new<I, S>(segments: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self(segments))
    }

    /// Builds a single-segment name.
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Splits a dotted string (`schema.table`) into a name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyName`] for an empty string.
    pub fn parse(dotted: &str) -> Result<Self, ModelError> {
        if dotted.is_empty() {
            return Err(ModelError::EmptyName);
        }
        Self::new(dotted.split('.'))
    }

    /// The last segment.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        // Non-empty by construction.
        self.0.last().map_or("", String::as_str)
    }

    /// All segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for QualifiedName {
    type Error = ModelError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<QualifiedName> for Vec<String> {
    fn from(name: QualifiedName) -> Self {
        name.0
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_is_last_segment() {
        let name = QualifiedName::new(["public", "users"]).unwrap();
        assert_eq!(name.simple_name(), "users");
        assert_eq!(name.segments().len(), 2);
        assert_eq!(name.to_string(), "public.users");
    }

    #[test]
    fn empty_name_rejected() {
        assert_eq!(
            QualifiedName::new(Vec::<String>::new()),
            Err(ModelError::EmptyName)
        );
        assert_eq!(QualifiedName::parse(""), Err(ModelError::EmptyName));
    }

    #[test]
    fn parse_dotted() {
        let name = QualifiedName::parse("proj.dataset.events").unwrap();
        assert_eq!(name.segments(), ["proj", "dataset", "events"]);
        assert_eq!(name.simple_name(), "events");
    }

    #[test]
    fn empty_name_rejected_on_deserialize() {
        let result: Result<QualifiedName, _> = serde_json::from_str("[]");
        assert!(result.is_err());
        let ok: QualifiedName = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(ok.simple_name(), "b");
    }
}
