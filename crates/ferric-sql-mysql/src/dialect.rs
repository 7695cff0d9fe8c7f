//! MySQL dialect implementation.

use ferric_sql_core::dialect::Dialect;

/// MySQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn escape_string(&self, s: &str) -> String {
        // MySQL treats backslash as an escape character inside string
        // literals, unlike the SQL standard.
        s.replace('\\', "\\\\").replace('\'', "''")
    }

    fn supports_returning(&self) -> bool {
        false
    }

    fn supports_upsert(&self) -> bool {
        true // INSERT ... ON DUPLICATE KEY UPDATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_dialect() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.name(), "mysql");
        assert_eq!(dialect.identifier_quote(), '`');
        assert_eq!(dialect.quote_identifier("order"), "`order`");
        assert_eq!(dialect.escape_string(r"a\b'c"), r"a\\b''c");
        assert_eq!(dialect.placeholder(5), "?");
        assert!(!dialect.supports_returning());
    }
}
