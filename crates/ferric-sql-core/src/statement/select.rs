//! The SELECT statement.

use crate::check::Inconsistency;
use crate::clause::from::{FromClause, IntoTableSource};
use crate::clause::group_by::{GroupByClause, IntoGroupBy};
use crate::clause::limit::LimitClause;
use crate::clause::order_by::{IntoOrderTerms, OrderByClause};
use crate::clause::select_columns::{IntoSelectColumns, SelectColumnList};
use crate::clause::where_::{HavingClause, WhereClause};
use crate::clause::with::WithClause;
use crate::clause::Clause;
use crate::expr::typed::IntoTyped;
use crate::expr::Expr;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::{dedup_by_name, ParameterSpec};
use crate::row::RowSpec;
use crate::serialize::{Serialize, SqlWriter};
use crate::statement::Statement;
use crate::types::Boolean;

/// UNION flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    /// `UNION` (duplicate-eliminating).
    Distinct,
    /// `UNION ALL`.
    All,
}

impl UnionKind {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Distinct => " UNION ",
            Self::All => " UNION ALL ",
        }
    }
}

/// A composed SELECT: one slot per clause kind, missing when unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectStatement {
    with: WithClause,
    columns: SelectColumnList,
    from: FromClause,
    where_clause: WhereClause,
    group_by: GroupByClause,
    having: HavingClause,
    order_by: OrderByClause,
    limit: LimitClause,
    unions: Vec<(UnionKind, SelectStatement)>,
}

/// Starts a SELECT from its column list.
#[must_use]
pub fn select(columns: impl IntoSelectColumns) -> SelectStatement {
    SelectStatement {
        columns: SelectColumnList::new(columns),
        ..SelectStatement::default()
    }
}

impl SelectStatement {
    pub(crate) fn with_clause(mut self, with: WithClause) -> Self {
        self.with = with;
        self
    }

    /// Marks the selection DISTINCT.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.columns.set_distinct();
        self
    }

    /// Sets the FROM source (table, alias, CTE reference or join chain).
    #[must_use]
    pub fn from(mut self, source: impl IntoTableSource) -> Self {
        self.from = FromClause::new(source);
        self
    }

    /// Sets the WHERE condition.
    #[must_use]
    pub fn where_<C: IntoTyped<Boolean>>(mut self, condition: C) -> Self {
        self.where_clause = WhereClause::new(condition);
        self
    }

    /// Sets the GROUP BY expressions.
    #[must_use]
    pub fn group_by(mut self, exprs: impl IntoGroupBy) -> Self {
        self.group_by = GroupByClause::new(exprs);
        self
    }

    /// Sets the HAVING condition.
    #[must_use]
    pub fn having<C: IntoTyped<Boolean>>(mut self, condition: C) -> Self {
        self.having = HavingClause::new(condition);
        self
    }

    /// Sets the ORDER BY terms.
    #[must_use]
    pub fn order_by(mut self, terms: impl IntoOrderTerms) -> Self {
        self.order_by = OrderByClause::new(terms);
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit.set_limit(limit);
        self
    }

    /// Sets the row offset.
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.limit.set_offset(offset);
        self
    }

    /// `self UNION other`.
    #[must_use]
    pub fn union_distinct(mut self, other: Self) -> Self {
        self.unions.push((UnionKind::Distinct, other));
        self
    }

    /// `self UNION ALL other`.
    #[must_use]
    pub fn union_all(mut self, other: Self) -> Self {
        self.unions.push((UnionKind::All, other));
        self
    }

    /// The result row shape derived from the column list.
    #[must_use]
    pub fn row_spec(&self) -> RowSpec {
        self.columns.row_spec()
    }

    fn clauses(&self) -> [&dyn Clause; 8] {
        [
            &self.with,
            &self.columns,
            &self.from,
            &self.where_clause,
            &self.group_by,
            &self.having,
            &self.order_by,
            &self.limit,
        ]
    }

    /// Tables this statement references but does not provide, including
    /// its union operands'.
    #[must_use]
    pub fn unresolved_tables(&self) -> IdSet<Name> {
        let mut required = IdSet::new();
        let mut provided = IdSet::new();
        for clause in self.clauses() {
            clause.required_tables(&mut required);
            clause.provided_tables(&mut provided);
        }
        // A provided CTE satisfies column references qualified by its name.
        self.with.provided_ctes(&mut provided);
        required.subtract(&provided);
        for (_, operand) in &self.unions {
            required.union_with(operand.unresolved_tables());
        }
        required
    }

    /// CTE names this statement references but does not provide.
    #[must_use]
    pub fn unresolved_ctes(&self) -> IdSet<Name> {
        let mut required = IdSet::new();
        let mut provided = IdSet::new();
        for clause in self.clauses() {
            clause.required_ctes(&mut required);
            clause.provided_ctes(&mut provided);
        }
        required.subtract(&provided);
        for (_, operand) in &self.unions {
            required.union_with(operand.unresolved_ctes());
        }
        required
    }

    /// Parameter declarations in serialization order, deduplicated by
    /// name.
    #[must_use]
    pub fn parameters(&self) -> Vec<ParameterSpec> {
        let mut params = Vec::new();
        for clause in self.clauses() {
            clause.collect_parameters(&mut params);
        }
        for (_, operand) in &self.unions {
            params.extend(operand.parameters());
        }
        dedup_by_name(params)
    }

    /// As [`check`](Statement::check), but a requirement on `cte_name` is
    /// treated as satisfied: a recursive CTE's body legitimately reads
    /// from its own reference.
    pub(crate) fn check_within_cte(&self, cte_name: Name) -> Result<(), Inconsistency> {
        self.check_with_allowance(Some(cte_name))
    }

    /// Runs each clause's local rules, without resolving cross-clause
    /// requirements. Sub-select constructors use this to reject malformed
    /// embedded selects while still letting correlated references leak
    /// out as requirements.
    pub(crate) fn check_clauses(&self) -> Result<(), Inconsistency> {
        for clause in self.clauses() {
            clause.check()?;
        }
        Ok(())
    }

    fn check_with_allowance(&self, allowed_cte: Option<Name>) -> Result<(), Inconsistency> {
        self.check_clauses()?;

        let mut unresolved = self.unresolved_tables();
        if let Some(allowed) = allowed_cte {
            unresolved.subtract(&core::iter::once(allowed).collect());
        }
        if let Some(table) = unresolved.first() {
            return Err(Inconsistency::RequiredTableNotProvided(table.text()));
        }

        let mut unresolved = self.unresolved_ctes();
        if let Some(allowed) = allowed_cte {
            unresolved.subtract(&core::iter::once(allowed).collect());
        }
        if let Some(cte) = unresolved.first() {
            return Err(Inconsistency::RequiredCteNotProvided(cte.text()));
        }

        self.check_aggregates()?;

        let row = self.row_spec();
        for (_, operand) in &self.unions {
            operand.check_with_allowance(allowed_cte)?;
            if !row.is_compatible_with(&operand.row_spec()) {
                return Err(Inconsistency::UnionShapeMismatch);
            }
        }
        Ok(())
    }

    fn check_aggregates(&self) -> Result<(), Inconsistency> {
        for column in self.columns.columns() {
            if column.expr().has_nested_aggregate() {
                return Err(Inconsistency::NestedAggregate);
            }
        }
        if let Some(condition) = self.having.condition() {
            if condition.has_nested_aggregate() {
                return Err(Inconsistency::NestedAggregate);
            }
            // HAVING evaluates per group even without GROUP BY.
            if !aggregate_safe(condition, self.group_by.exprs()) {
                return Err(Inconsistency::NonAggregateHaving);
            }
        }

        let aggregate_context = !self.group_by.is_missing()
            || self.having.condition().is_some()
            || self
                .columns
                .columns()
                .iter()
                .any(|column| column.expr().contains_aggregate());
        if !aggregate_context {
            return Ok(());
        }

        for column in self.columns.columns() {
            if !aggregate_safe(column.expr(), self.group_by.exprs()) {
                let name = column
                    .result_name()
                    .map_or("?", |name| name.text());
                return Err(Inconsistency::NonAggregateSelectColumn(name));
            }
        }
        Ok(())
    }
}

/// Whether an expression may appear in a select list or HAVING condition
/// under aggregate context: aggregates, literals, parameters and GROUP BY
/// expressions are fine, and so is anything composed purely of those.
fn aggregate_safe(expr: &Expr, groups: &[Expr]) -> bool {
    if groups.iter().any(|group| group == expr) {
        return true;
    }
    match expr {
        Expr::Literal(_) | Expr::Parameter { .. } => true,
        Expr::Column(_) => false,
        Expr::Func(func) if func.is_aggregate => true,
        // Sub-selects form their own aggregate context.
        Expr::Subquery(_) | Expr::Exists(_) => true,
        Expr::Dynamic { inner, .. } => aggregate_safe(inner, groups),
        _ => expr
            .children()
            .iter()
            .all(|child| aggregate_safe(child, groups)),
    }
}

impl Serialize for SelectStatement {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        self.with.serialize(writer);
        self.columns.serialize(writer);
        self.from.serialize(writer);
        self.where_clause.serialize(writer);
        self.group_by.serialize(writer);
        self.having.serialize(writer);
        self.order_by.serialize(writer);
        self.limit.serialize(writer);
        for (kind, operand) in &self.unions {
            writer.push_str(kind.keyword());
            operand.serialize(writer);
        }
    }
}

impl Statement for SelectStatement {
    fn parameters(&self) -> Vec<ParameterSpec> {
        Self::parameters(self)
    }

    fn check(&self) -> Result<(), Inconsistency> {
        self.check_with_allowance(None)
    }
}
