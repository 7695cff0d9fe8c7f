//! The consistency verdict.
//!
//! Statement construction is infallible; `check()` walks the composed
//! clauses and reports the first violated rule in a fixed order:
//! clause-local rules first (in clause order), then unresolved table
//! references, then unresolved CTE references, then aggregate-context
//! rules, then union row-shape compatibility. The same statement always
//! reports the same inconsistency.
//!
//! The original-style design rejected these statements at compile time
//! through the type system. The typed expression facade still does that
//! for operand kinds; the set-based rules here are validated at `check()`
//! time instead, so "fails to compile" becomes "fails to check". Callers
//! gate execution on the [`Checked`](crate::statement::Checked) wrapper,
//! which only a passing `check()` produces.

use thiserror::Error;

/// A named, stable consistency violation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// SELECT with an empty column list.
    #[error("at least one select column required")]
    NoSelectColumns,

    /// A select column has neither an alias nor a derivable name.
    #[error("select column has no name; give it one with as_()")]
    UnnamedSelectColumn,

    /// Two select columns produce the same result name.
    #[error("duplicate result column name '{0}'")]
    DuplicateResultName(&'static str),

    /// INSERT or UPDATE set list with zero assignments.
    #[error("at least one assignment expression required in set()")]
    EmptySetClause,

    /// The same column assigned twice in one set list.
    #[error("duplicate target column '{0}' in set()")]
    DuplicateAssignment(&'static str),

    /// Assignments in one set list target more than one table.
    #[error("set() arguments must be assignments for exactly one table")]
    MixedAssignmentTables,

    /// The set list targets a table other than the statement's.
    #[error("set() assignments do not belong to table '{0}'")]
    WrongAssignmentTable(&'static str),

    /// An INSERT omits a column without a default.
    #[error("required insert column '{0}' missing in set()")]
    MissingRequiredInsertColumn(&'static str),

    /// An INSERT assigns a column declared must-not-insert.
    #[error("column '{0}' must not be inserted")]
    ColumnMustNotBeInserted(&'static str),

    /// An UPDATE assigns a column declared must-not-update.
    #[error("column '{0}' must not be updated")]
    ColumnMustNotBeUpdated(&'static str),

    /// A multi-row INSERT row does not match the first row's columns.
    #[error("insert value rows must assign the same columns in the same order")]
    MismatchedValueRow,

    /// UPDATE or DELETE without a WHERE condition and without an explicit
    /// opt-in to affecting every row.
    #[error("no where condition given; call unconditionally() to affect all rows")]
    UnguardedWhere,

    /// A column reference's table is not provided by FROM (or WITH).
    #[error("statement requires table '{0}' which is not provided")]
    RequiredTableNotProvided(&'static str),

    /// A CTE reference is not provided by a surrounding WITH.
    #[error("statement requires common table expression '{0}' which is not provided")]
    RequiredCteNotProvided(&'static str),

    /// A CTE reference names a column its row shape does not have.
    #[error("common table expression '{0}' has no column '{1}'")]
    UnknownCteColumn(&'static str, &'static str),

    /// A CTE column reference's kind disagrees with the CTE's row shape.
    #[error("column '{1}' of common table expression '{0}' has a different value type")]
    CteColumnTypeMismatch(&'static str, &'static str),

    /// A scalar sub-select whose column list is not exactly one column.
    #[error("scalar sub-select must produce exactly one column")]
    ScalarSubqueryShape,

    /// A scalar sub-select whose column's value type disagrees with the
    /// requested kind.
    #[error("scalar sub-select column has a different value type")]
    ScalarSubqueryTypeMismatch,

    /// In aggregate context, a select column that is neither aggregated
    /// nor built from GROUP BY expressions.
    #[error("select column '{0}' is neither aggregated nor grouped")]
    NonAggregateSelectColumn(&'static str),

    /// A HAVING condition that is neither aggregated nor built from
    /// GROUP BY expressions.
    #[error("having condition is neither aggregated nor grouped")]
    NonAggregateHaving,

    /// An aggregate function applied to an expression already containing
    /// an aggregate.
    #[error("aggregate functions must not be nested")]
    NestedAggregate,

    /// UNION operands whose result rows have different shapes.
    #[error("union operands must have identical result row shapes")]
    UnionShapeMismatch,
}
