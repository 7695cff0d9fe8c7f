//! Generic ANSI SQL dialect.

use super::Dialect;

/// A generic dialect following ANSI SQL conventions.
///
/// Used as the default for serialization tests and wherever no backend has
/// been chosen yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnsiDialect;

impl AnsiDialect {
    /// Creates a new ANSI dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ansi"
    }
}
