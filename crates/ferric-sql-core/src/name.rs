//! Compile-time name tags for tables, columns and aliases.
//!
//! A [`Name`] pairs a `'static` identifier with a quoting flag. Two names
//! built from the same text are the same name no matter where they were
//! declared; the quoting flag only affects serialization (the dialect's
//! identifier quote is applied), never identity.

use core::fmt;
use core::hash::{Hash, Hasher};

/// A SQL identifier.
///
/// Equality and hashing consider the text only, so a quoted and an unquoted
/// name with the same spelling compare equal while still serializing
/// differently.
#[derive(Debug, Clone, Copy)]
pub struct Name {
    text: &'static str,
    quoted: bool,
}

impl Name {
    /// Creates an unquoted name.
    #[must_use]
    pub const fn new(text: &'static str) -> Self {
        Self {
            text,
            quoted: false,
        }
    }

    /// Creates a name that is wrapped in the dialect's identifier quotes
    /// when serialized.
    #[must_use]
    pub const fn quoted(text: &'static str) -> Self {
        Self { text, quoted: true }
    }

    /// Returns the identifier text.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        self.text
    }

    /// Returns whether the name requires identifier quoting.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

impl From<&'static str> for Name {
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}
