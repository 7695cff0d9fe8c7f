//! # ferric-sql-core
//!
//! A typed SQL statement builder: statements are composed from typed
//! expressions and clauses, checked for consistency as a whole, and
//! serialized for a concrete dialect.
//!
//! This crate provides:
//! - `TypedExpr<K>` expression trees with value-kind typing and numeric
//!   promotion
//! - Clause types (select columns, FROM with joins, WHERE, GROUP BY,
//!   HAVING, ORDER BY, LIMIT, WITH, RETURNING) and the four statement
//!   kinds built from them
//! - `check()` consistency validation (required vs. provided tables and
//!   CTEs, aggregate rules, set-list rules) gating execution behind
//!   [`Checked`](statement::Checked)
//! - Named parameters with a [`ParameterSet`](params::ParameterSet)
//!   binding container
//! - A [`Dialect`](dialect::Dialect) seam for quoting, placeholders and
//!   feature gates
//!
//! Operand typing is enforced at compile time by the expression facade;
//! the whole-statement rules (which tables a statement provides, whether
//! a grouped select only names grouped or aggregated columns, and so on)
//! are enforced by `check()`, which reports the first violation in a
//! fixed order so the same statement always fails the same way.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ferric_sql_core::prelude::*;
//! use ferric_sql_derive::Table;
//!
//! #[derive(Table)]
//! #[table(name = "tab_foo")]
//! struct TabFoo {
//!     omega: i64,
//!     name: Option<String>,
//! }
//!
//! let statement = select((TabFoo::omega(), TabFoo::name()))
//!     .from(TabFooTable)
//!     .where_(TabFoo::omega().gt(17))
//!     .order_by(TabFoo::omega().asc())
//!     .checked()?;
//!
//! assert_eq!(
//!     statement.to_sql_string(&AnsiDialect::new()),
//!     "SELECT tab_foo.omega,tab_foo.name FROM tab_foo \
//!      WHERE tab_foo.omega > 17 ORDER BY tab_foo.omega ASC",
//! );
//! # Ok::<(), ferric_sql_core::check::Inconsistency>(())
//! ```
//!
//! ## Dynamic statement parts
//!
//! Statement shape is otherwise static; `dynamic(included, x)` marks the
//! parts decided at runtime. An excluded dynamic select column keeps its
//! slot as `NULL AS name`, an excluded boolean operand reduces away, an
//! excluded order-by or group-by entry is omitted:
//!
//! ```ignore
//! let want_name = false;
//! let statement = select((TabFoo::omega(), dynamic(want_name, TabFoo::name())))
//!     .from(TabFooTable)
//!     .where_(TabFoo::omega().gt(0).and(dynamic(false, TabFoo::omega().lt(100))))
//!     .checked()?;
//! ```

// Lets the derive macro's generated paths resolve inside this crate's
// own tests.
extern crate self as ferric_sql_core;

pub mod check;
pub mod clause;
pub mod dialect;
pub mod expr;
pub mod idset;
pub mod name;
pub mod params;
pub mod row;
pub mod schema;
pub mod serialize;
pub mod statement;
pub mod types;
pub mod value;

pub use check::Inconsistency;
pub use dialect::{AnsiDialect, Dialect};
pub use name::Name;
pub use params::{BindError, ParameterSet, ParameterSpec};
pub use row::{FieldSpec, Row, RowSpec};
pub use serialize::Serialize;
pub use statement::{
    delete_from, insert_into, select, update, with, Checked, DeleteStatement, InsertStatement,
    InsertVerb, SelectStatement, Statement, UnionKind, UpdateStatement,
};
pub use value::Value;

/// Everything needed to compose and check statements.
pub mod prelude {
    pub use crate::check::Inconsistency;
    pub use crate::clause::from::JoinOps;
    pub use crate::clause::order_by::OrderOps;
    pub use crate::clause::with::cte;
    pub use crate::dialect::{AnsiDialect, Dialect};
    pub use crate::expr::functions::{
        avg, count, count_all, count_distinct, lower, max, min, sum, trim, upper,
    };
    pub use crate::expr::typed::{
        dynamic, exists, scalar, typed_parameter, value, BooleanOps, ExprOps, IntoTyped,
        NumericOps, TextOps, TypedExpr,
    };
    pub use crate::schema::{all_of, parameter, Column, HasDefault, NullableColumn, Table};
    pub use crate::statement::{
        delete_from, insert_into, select, update, with, Statement,
    };
    pub use crate::value::Value;
}
