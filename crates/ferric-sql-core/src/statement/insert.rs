//! The INSERT statement.

use crate::check::Inconsistency;
use crate::clause::insert_values::InsertValueList;
use crate::clause::returning::ReturningClause;
use crate::clause::select_columns::IntoSelectColumns;
use crate::clause::Clause;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::{dedup_by_name, ParameterSpec};
use crate::row::RowSpec;
use crate::schema::{IntoAssignments, Table};
use crate::serialize::{Serialize, SqlWriter};
use crate::statement::Statement;

/// The insert conflict verb. The non-standard variants exist for the
/// SQLite connector's convenience constructors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertVerb {
    /// `INSERT INTO`
    #[default]
    Insert,
    /// `INSERT OR IGNORE INTO` (SQLite)
    OrIgnore,
    /// `INSERT OR REPLACE INTO` (SQLite)
    OrReplace,
}

impl InsertVerb {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Insert => "INSERT INTO ",
            Self::OrIgnore => "INSERT OR IGNORE INTO ",
            Self::OrReplace => "INSERT OR REPLACE INTO ",
        }
    }
}

/// A composed INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    verb: InsertVerb,
    table: Name,
    required_columns: &'static [Name],
    values: InsertValueList,
    returning: ReturningClause,
}

/// Starts an INSERT into the given table.
#[must_use]
pub fn insert_into<T: Table>(_table: T) -> InsertStatement {
    InsertStatement {
        verb: InsertVerb::Insert,
        table: T::NAME,
        required_columns: T::required_insert_columns(),
        values: InsertValueList::Missing,
        returning: ReturningClause::default(),
    }
}

impl InsertStatement {
    /// Replaces the conflict verb.
    #[must_use]
    pub fn verb(mut self, verb: InsertVerb) -> Self {
        self.verb = verb;
        self
    }

    /// The target table's name.
    #[must_use]
    pub const fn table(&self) -> Name {
        self.table
    }

    /// Sets the (single) value row from column assignments.
    #[must_use]
    pub fn set(mut self, assignments: impl IntoAssignments) -> Self {
        self.values = InsertValueList::Rows(vec![assignments.into_assignments()]);
        self
    }

    /// Appends another value row; its columns must match the first row's.
    #[must_use]
    pub fn add_row(mut self, assignments: impl IntoAssignments) -> Self {
        match &mut self.values {
            InsertValueList::Rows(rows) => rows.push(assignments.into_assignments()),
            _ => self.values = InsertValueList::Rows(vec![assignments.into_assignments()]),
        }
        self
    }

    /// Inserts a row of column defaults: `DEFAULT VALUES`.
    #[must_use]
    pub fn default_values(mut self) -> Self {
        self.values = InsertValueList::DefaultValues;
        self
    }

    /// Adds a RETURNING column list (dialect support is checked by the
    /// connector).
    #[must_use]
    pub fn returning(mut self, columns: impl IntoSelectColumns) -> Self {
        self.returning = ReturningClause::new(columns);
        self
    }

    /// The row shape RETURNING yields; empty without RETURNING.
    #[must_use]
    pub fn row_spec(&self) -> RowSpec {
        self.returning.row_spec()
    }
}

impl Serialize for InsertStatement {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        writer.push_str(self.verb.keyword());
        writer.push_name(self.table);
        self.values.serialize(writer);
        self.returning.serialize(writer);
    }
}

impl Statement for InsertStatement {
    fn parameters(&self) -> Vec<ParameterSpec> {
        let mut params = Vec::new();
        self.values.collect_parameters(&mut params);
        self.returning.collect_parameters(&mut params);
        dedup_by_name(params)
    }

    fn has_returning(&self) -> bool {
        !self.returning.is_missing()
    }

    fn check(&self) -> Result<(), Inconsistency> {
        self.values.check_against(self.table, self.required_columns)?;
        self.returning.check()?;

        let mut required = IdSet::new();
        self.values.required_tables(&mut required);
        self.returning.required_tables(&mut required);
        let provided: IdSet<Name> = core::iter::once(self.table).collect();
        required.subtract(&provided);
        if let Some(table) = required.first() {
            return Err(Inconsistency::RequiredTableNotProvided(table.text()));
        }

        let mut ctes = IdSet::new();
        self.values.required_ctes(&mut ctes);
        self.returning.required_ctes(&mut ctes);
        if let Some(cte) = ctes.first() {
            return Err(Inconsistency::RequiredCteNotProvided(cte.text()));
        }
        Ok(())
    }
}
