//! # ferric-sql-sqlite
//!
//! SQLite dialect and connector for `ferric-sql-core`.
//!
//! # How SQLite differs from other dialects
//!
//! - **[RETURNING]**: SQLite supports `RETURNING` clauses on INSERT,
//!   UPDATE, and DELETE (since SQLite 3.35.0).
//! - **Conflict verbs**: SQLite accepts `INSERT OR IGNORE` and
//!   `INSERT OR REPLACE`; [`insert_or_ignore_into`] and
//!   [`insert_or_replace_into`] build these.
//! - **Identifier quoting**: SQLite uses double quotes (`"`) as the
//!   standard quoting style, though it also accepts backticks and square
//!   brackets. See [SQLite keywords].
//! - **[Type affinity]**: SQLite uses a type-affinity system rather than
//!   strict column types; integers are signed 64-bit, so unsigned values
//!   above `i64::MAX` cannot be bound.
//!
//! [RETURNING]: https://www.sqlite.org/lang_returning.html
//! [SQLite keywords]: https://www.sqlite.org/lang_keywords.html
//! [Type affinity]: https://www.sqlite.org/datatype3.html
//!
//! ## Example
//!
//! ```ignore
//! use ferric_sql_core::prelude::*;
//! use ferric_sql_sqlite::Connection;
//!
//! let conn = Connection::connect("sqlite::memory:").await?;
//! let statement = select(TabFoo::omega())
//!     .from(TabFooTable)
//!     .where_(TabFoo::omega().gt(parameter(TabFooColumns::Omega)))
//!     .checked()?;
//!
//! let mut prepared = conn.prepare(statement);
//! prepared.params_mut().set("omega", 17_i64)?;
//! let rows = conn.run_select(&prepared).await?;
//! ```

mod connection;
mod dialect;
mod error;

pub use connection::{Connection, Prepared, Transaction};
pub use dialect::SqliteDialect;
pub use error::{DatabaseError, IntegrityKind};

use ferric_sql_core::schema::Table;
use ferric_sql_core::statement::{insert_into, InsertStatement, InsertVerb};

/// Starts an `INSERT OR IGNORE INTO`: conflicting rows are skipped.
#[must_use]
pub fn insert_or_ignore_into<T: Table>(table: T) -> InsertStatement {
    insert_into(table).verb(InsertVerb::OrIgnore)
}

/// Starts an `INSERT OR REPLACE INTO`: conflicting rows are replaced.
#[must_use]
pub fn insert_or_replace_into<T: Table>(table: T) -> InsertStatement {
    insert_into(table).verb(InsertVerb::OrReplace)
}
