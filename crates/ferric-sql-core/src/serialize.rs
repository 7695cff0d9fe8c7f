//! The serialization protocol.
//!
//! A [`SqlWriter`] is a text sink parameterized by a dialect. Nodes and
//! clauses implement [`Serialize`] and append themselves to the writer;
//! serialization never mutates the node, so writing the same statement
//! into two fresh writers produces byte-identical output.

use crate::dialect::Dialect;
use crate::name::Name;
use crate::value::Value;

/// A dialect-aware SQL text sink.
pub struct SqlWriter<'a> {
    dialect: &'a dyn Dialect,
    buf: String,
    param_index: usize,
}

impl<'a> SqlWriter<'a> {
    /// Creates a fresh writer for the given dialect.
    #[must_use]
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            dialect,
            buf: String::new(),
            param_index: 0,
        }
    }

    /// Returns the dialect in use.
    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect
    }

    /// Appends raw SQL text.
    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Appends a single character.
    pub fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    /// Appends an identifier, applying dialect quoting if the name asks
    /// for it.
    pub fn push_name(&mut self, name: Name) {
        if name.is_quoted() {
            let quoted = self.dialect.quote_identifier(name.text());
            self.buf.push_str(&quoted);
        } else {
            self.buf.push_str(name.text());
        }
    }

    /// Appends the next parameter placeholder, advancing the 1-based
    /// parameter counter (PostgreSQL numbers its placeholders).
    pub fn push_placeholder(&mut self) {
        self.param_index += 1;
        let placeholder = self.dialect.placeholder(self.param_index);
        self.buf.push_str(&placeholder);
    }

    /// Appends a value as an inline SQL literal.
    pub fn push_literal(&mut self, value: &Value) {
        match value {
            Value::Null => self.buf.push_str("NULL"),
            Value::Default => self.buf.push_str("DEFAULT"),
            Value::Bool(b) => self.buf.push_str(self.dialect.boolean_literal(*b)),
            Value::Int(n) => {
                self.buf.push_str(&n.to_string());
            }
            Value::UInt(n) => {
                self.buf.push_str(&n.to_string());
            }
            Value::Float(f) => {
                self.buf.push_str(&f.to_string());
            }
            Value::Text(s) => {
                self.buf.push('\'');
                let escaped = self.dialect.escape_string(s);
                self.buf.push_str(&escaped);
                self.buf.push('\'');
            }
            Value::Blob(bytes) => {
                self.buf.push_str("x'");
                for byte in bytes {
                    self.buf.push_str(&format!("{byte:02x}"));
                }
                self.buf.push('\'');
            }
            Value::Date(d) => {
                self.buf.push_str("DATE '");
                self.buf.push_str(&d.format("%Y-%m-%d").to_string());
                self.buf.push('\'');
            }
            Value::DateTime(dt) => {
                self.buf.push_str("TIMESTAMP '");
                self.buf
                    .push_str(&dt.format("%Y-%m-%d %H:%M:%S%.f").to_string());
                self.buf.push('\'');
            }
            Value::Time(t) => {
                self.buf.push_str("TIME '");
                self.buf.push_str(&t.format("%H:%M:%S%.f").to_string());
                self.buf.push('\'');
            }
        }
    }

    /// Serializes a comma-separated list without a trailing separator.
    pub fn push_list<T: Serialize>(&mut self, items: &[T]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            item.serialize(self);
        }
    }

    /// Finishes the writer and returns the accumulated SQL text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }

    /// Returns the text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

/// Anything that can write itself into a [`SqlWriter`].
pub trait Serialize {
    /// Appends this node's SQL representation to the writer.
    fn serialize(&self, writer: &mut SqlWriter<'_>);

    /// Convenience: serializes into a fresh writer for the given dialect.
    fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let mut writer = SqlWriter::new(dialect);
        self.serialize(&mut writer);
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;

    #[test]
    fn test_literals() {
        let dialect = AnsiDialect::new();
        let mut w = SqlWriter::new(&dialect);
        w.push_literal(&Value::Int(-7));
        w.push(' ');
        w.push_literal(&Value::Text("O'Brien".into()));
        w.push(' ');
        w.push_literal(&Value::Bool(true));
        w.push(' ');
        w.push_literal(&Value::Blob(vec![0xde, 0xad]));
        assert_eq!(w.finish(), "-7 'O''Brien' TRUE x'dead'");
    }

    #[test]
    fn test_quoted_name() {
        let dialect = AnsiDialect::new();
        let mut w = SqlWriter::new(&dialect);
        w.push_name(Name::quoted("order"));
        w.push('.');
        w.push_name(Name::new("id"));
        assert_eq!(w.finish(), "\"order\".id");
    }

    #[test]
    fn test_placeholder_counter() {
        let dialect = AnsiDialect::new();
        let mut w = SqlWriter::new(&dialect);
        w.push_placeholder();
        w.push(',');
        w.push_placeholder();
        assert_eq!(w.finish(), "?,?");
    }

    #[test]
    fn test_temporal_literals() {
        use chrono::NaiveDate;
        let dialect = AnsiDialect::new();
        let mut w = SqlWriter::new(&dialect);
        let date = NaiveDate::from_ymd_opt(2017, 5, 3).unwrap();
        w.push_literal(&Value::Date(date));
        assert_eq!(w.finish(), "DATE '2017-05-03'");
    }
}
