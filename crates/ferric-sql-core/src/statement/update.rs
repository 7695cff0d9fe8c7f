//! The UPDATE statement.

use crate::check::Inconsistency;
use crate::clause::returning::ReturningClause;
use crate::clause::select_columns::IntoSelectColumns;
use crate::clause::update_set::UpdateSetList;
use crate::clause::where_::WhereClause;
use crate::clause::Clause;
use crate::expr::typed::IntoTyped;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::{dedup_by_name, ParameterSpec};
use crate::row::RowSpec;
use crate::schema::{IntoAssignments, Table};
use crate::serialize::{Serialize, SqlWriter};
use crate::statement::Statement;
use crate::types::Boolean;

/// A composed UPDATE.
///
/// A statement without a WHERE clause fails its check unless
/// [`unconditionally()`](Self::unconditionally) was called; updating every
/// row must be asked for explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    table: Name,
    set: UpdateSetList,
    where_clause: WhereClause,
    unconditional: bool,
    returning: ReturningClause,
}

/// Starts an UPDATE of the given table.
#[must_use]
pub fn update<T: Table>(_table: T) -> UpdateStatement {
    UpdateStatement {
        table: T::NAME,
        set: UpdateSetList::default(),
        where_clause: WhereClause::default(),
        unconditional: false,
        returning: ReturningClause::default(),
    }
}

impl UpdateStatement {
    /// The target table's name.
    #[must_use]
    pub const fn table(&self) -> Name {
        self.table
    }

    /// Sets the assignment list.
    #[must_use]
    pub fn set(mut self, assignments: impl IntoAssignments) -> Self {
        self.set = UpdateSetList::new(assignments.into_assignments());
        self
    }

    /// Restricts the affected rows.
    #[must_use]
    pub fn where_<C: IntoTyped<Boolean>>(mut self, condition: C) -> Self {
        self.where_clause = WhereClause::new(condition);
        self
    }

    /// Explicitly updates all rows, waiving the WHERE requirement.
    #[must_use]
    pub fn unconditionally(mut self) -> Self {
        self.unconditional = true;
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

    fn clauses(&self) -> [&dyn Clause; 3] {
        [&self.set, &self.where_clause, &self.returning]
    }
}

impl Serialize for UpdateStatement {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        writer.push_str("UPDATE ");
        writer.push_name(self.table);
        self.set.serialize(writer);
        self.where_clause.serialize(writer);
        self.returning.serialize(writer);
    }
}

impl Statement for UpdateStatement {
    fn parameters(&self) -> Vec<ParameterSpec> {
        let mut params = Vec::new();
        for clause in self.clauses() {
            clause.collect_parameters(&mut params);
        }
        dedup_by_name(params)
    }

    fn has_returning(&self) -> bool {
        !self.returning.is_missing()
    }

    fn check(&self) -> Result<(), Inconsistency> {
        self.set.check_against(self.table)?;
        if self.where_clause.is_missing() && !self.unconditional {
            return Err(Inconsistency::UnguardedWhere);
        }
        self.returning.check()?;

        let mut required = IdSet::new();
        for clause in self.clauses() {
            clause.required_tables(&mut required);
        }
        let provided: IdSet<Name> = core::iter::once(self.table).collect();
        required.subtract(&provided);
        if let Some(table) = required.first() {
            return Err(Inconsistency::RequiredTableNotProvided(table.text()));
        }

        let mut ctes = IdSet::new();
        for clause in self.clauses() {
            clause.required_ctes(&mut ctes);
        }
        if let Some(cte) = ctes.first() {
            return Err(Inconsistency::RequiredCteNotProvided(cte.text()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::typed::{typed_parameter, ExprOps, IntoTyped};
    use crate::row::FieldSpec;
    use crate::schema::Column;
    use crate::types::{Boolean, Integral, ValueType};

    #[derive(Debug, Clone, Copy)]
    struct TabBar;

    impl Table for TabBar {
        const NAME: Name = Name::new("tab_bar");

        fn field_specs() -> Vec<FieldSpec> {
            vec![
                FieldSpec {
                    name: Name::new("gamma"),
                    value_type: ValueType::Integral,
                    nullable: false,
                },
                FieldSpec {
                    name: Name::new("bool_nn"),
                    value_type: ValueType::Boolean,
                    nullable: false,
                },
            ]
        }

        fn required_insert_columns() -> &'static [Name] {
            &[]
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Gamma;

    impl Column for Gamma {
        type Table = TabBar;
        type Kind = Integral;

        const NAME: Name = Name::new("gamma");
    }

    #[derive(Debug, Clone, Copy)]
    struct BoolNn;

    impl Column for BoolNn {
        type Table = TabBar;
        type Kind = Boolean;

        const NAME: Name = Name::new("bool_nn");
    }

    #[derive(Debug, Clone, Copy)]
    struct Frozen;

    impl Column for Frozen {
        type Table = TabBar;
        type Kind = Integral;

        const NAME: Name = Name::new("frozen");
        const MUST_NOT_UPDATE: bool = true;
    }

    #[test]
    fn test_update_serialization() {
        let statement = update(TabBar)
            .set(Gamma.assign(42_i64))
            .where_(BoolNn.into_typed().eq(true));
        assert_eq!(statement.check(), Ok(()));
        assert_eq!(
            statement.to_sql(&AnsiDialect::new()),
            "UPDATE tab_bar SET gamma=42 WHERE tab_bar.bool_nn = TRUE"
        );
    }

    #[test]
    fn test_missing_where_guard() {
        let statement = update(TabBar).set(Gamma.assign(1_i64));
        assert_eq!(statement.check(), Err(Inconsistency::UnguardedWhere));

        let statement = update(TabBar).set(Gamma.assign(1_i64)).unconditionally();
        assert_eq!(statement.check(), Ok(()));
        assert_eq!(
            statement.to_sql(&AnsiDialect::new()),
            "UPDATE tab_bar SET gamma=1"
        );
    }

    #[test]
    fn test_empty_set_fails() {
        let statement = update(TabBar).unconditionally();
        assert_eq!(statement.check(), Err(Inconsistency::EmptySetClause));
    }

    #[test]
    fn test_must_not_update_rejected() {
        let statement = update(TabBar)
            .set((Gamma.assign(1_i64), Frozen.assign(2_i64)))
            .unconditionally();
        assert_eq!(
            statement.check(),
            Err(Inconsistency::ColumnMustNotBeUpdated("frozen"))
        );
    }

    #[test]
    fn test_update_parameters() {
        let statement = update(TabBar)
            .set(Gamma.assign(typed_parameter::<Integral>("new_gamma")))
            .where_(Gamma.into_typed().eq(typed_parameter::<Integral>("old_gamma")));
        let params = statement.parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "new_gamma");
        assert_eq!(params[1].name, "old_gamma");
    }
}
