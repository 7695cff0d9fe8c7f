//! SQL dialect support.
//!
//! Different databases have slightly different SQL syntax. This module
//! provides a trait for dialect-specific behavior; the backend crates
//! supply SQLite, MySQL and PostgreSQL implementations.

mod ansi;

pub use ansi::AnsiDialect;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL,
    /// `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Escapes a string literal's content (without the surrounding
    /// quotes). The default doubles single quotes.
    fn escape_string(&self, s: &str) -> String {
        s.replace('\'', "''")
    }

    /// Returns the spelling of a boolean literal.
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Returns the parameter placeholder for the 1-based parameter index.
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        String::from("?")
    }

    /// Returns whether the dialect supports the RETURNING clause.
    fn supports_returning(&self) -> bool {
        false
    }

    /// Returns whether the dialect supports UPSERT (ON CONFLICT).
    fn supports_upsert(&self) -> bool {
        false
    }

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        format!("{quote}{name}{quote}")
    }
}
