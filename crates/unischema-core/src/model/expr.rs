//! Opaque expression envelope used for column defaults and check bodies.

use serde::{Deserialize, Serialize};

/// A tagged box around an expression payload.
///
/// Today every producer writes a [`Expr::STRING_LITERAL`] payload holding the
/// raw SQL text. Readers must check the tag through [`Expr::as_literal`]
/// before unwrapping, so envelopes written by a newer producer with a richer
/// payload kind still load, compare and re-encode unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expr {
    /// Payload kind tag.
    pub kind: String,
    /// Encoded payload.
    pub body: String,
}

impl Expr {
    /// Tag for a plain SQL text payload.
    pub const STRING_LITERAL: &'static str = "string_literal";

    /// Wraps raw expression text.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            kind: Self::STRING_LITERAL.to_string(),
            body: text.into(),
        }
    }

    /// Wraps dialect default text, treating the empty string as "no default".
    #[must_use]
    pub fn from_optional_literal(text: &str) -> Option<Self> {
        if text.is_empty() {
            None
        } else {
            Some(Self::literal(text))
        }
    }

    /// Returns the literal text when the payload is a string literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        (self.kind == Self::STRING_LITERAL).then_some(self.body.as_str())
    }
}
