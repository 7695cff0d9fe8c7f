//! Statement types and the consistency gate.
//!
//! Statements are built infallibly from clauses; [`checked()`] runs the
//! whole-statement consistency rules and wraps a passing statement in
//! [`Checked`], the only form connectors accept for execution.
//!
//! [`checked()`]: Checked

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use core::ops::Deref;

use crate::check::Inconsistency;
use crate::clause::with::{IntoCtes, WithClause};
use crate::dialect::Dialect;
use crate::params::{ParameterSet, ParameterSpec};
use crate::serialize::{Serialize, SqlWriter};

pub use delete::{delete_from, DeleteStatement};
pub use insert::{insert_into, InsertStatement, InsertVerb};
pub use select::{select, SelectStatement, UnionKind};
pub use update::{update, UpdateStatement};

/// A statement whose consistency check has passed.
///
/// Connectors only run or prepare `Checked` statements; an already checked
/// statement is never re-validated.
#[derive(Debug, Clone)]
pub struct Checked<S> {
    statement: S,
}

impl<S> Checked<S> {
    pub(crate) fn new(statement: S) -> Self {
        Self { statement }
    }

    /// Returns the validated statement.
    pub fn into_inner(self) -> S {
        self.statement
    }
}

impl<S> Deref for Checked<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.statement
    }
}

impl<S: Serialize> Serialize for Checked<S> {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        self.statement.serialize(writer);
    }
}

/// Statement-level operations shared by all statement kinds.
pub trait Statement: Serialize + Sized {
    /// The parameter declarations in first-occurrence order, deduplicated
    /// by name.
    fn parameters(&self) -> Vec<ParameterSpec>;

    /// Runs the consistency rules, reporting the first violation in the
    /// fixed check order.
    fn check(&self) -> Result<(), Inconsistency>;

    /// Whether the statement carries a RETURNING clause; connectors gate
    /// this on dialect support.
    fn has_returning(&self) -> bool {
        false
    }

    /// Validates the statement and wraps it for execution.
    fn checked(self) -> Result<Checked<Self>, Inconsistency> {
        self.check()?;
        Ok(Checked::new(self))
    }

    /// An unbound parameter container matching this statement's
    /// parameter list.
    fn parameter_set(&self) -> ParameterSet {
        ParameterSet::new(self.parameters())
    }

    /// Serializes for the given dialect.
    fn to_sql_string(&self, dialect: &dyn Dialect) -> String {
        self.to_sql(dialect)
    }
}

/// A WITH prefix awaiting its statement: `with(x).select(...)`.
#[derive(Debug, Clone)]
pub struct With {
    clause: WithClause,
}

impl With {
    /// Attaches the CTEs to a select statement.
    #[must_use]
    pub fn select(self, columns: impl crate::clause::select_columns::IntoSelectColumns) -> SelectStatement {
        select(columns).with_clause(self.clause)
    }
}

/// Starts a statement with a WITH clause providing the given CTEs.
#[must_use]
pub fn with(ctes: impl IntoCtes) -> With {
    With {
        clause: WithClause::new(ctes),
    }
}
