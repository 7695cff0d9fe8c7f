//! The DELETE statement.

use crate::check::Inconsistency;
use crate::clause::from::{IntoTableSource, TableSource};
use crate::clause::returning::ReturningClause;
use crate::clause::select_columns::IntoSelectColumns;
use crate::clause::where_::WhereClause;
use crate::clause::Clause;
use crate::expr::typed::IntoTyped;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::{dedup_by_name, ParameterSpec};
use crate::row::RowSpec;
use crate::schema::Table;
use crate::serialize::{Serialize, SqlWriter};
use crate::statement::Statement;
use crate::types::Boolean;

/// A composed DELETE.
///
/// Like UPDATE, a statement without a WHERE clause fails its check unless
/// [`unconditionally()`](Self::unconditionally) was called.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    table: Name,
    using: Option<TableSource>,
    where_clause: WhereClause,
    unconditional: bool,
    returning: ReturningClause,
}

/// Starts a DELETE from the given table.
#[must_use]
pub fn delete_from<T: Table>(_table: T) -> DeleteStatement {
    DeleteStatement {
        table: T::NAME,
        using: None,
        where_clause: WhereClause::default(),
        unconditional: false,
        returning: ReturningClause::default(),
    }
}

impl DeleteStatement {
    /// The target table's name.
    #[must_use]
    pub const fn table(&self) -> Name {
        self.table
    }

    /// Adds a USING source whose columns the condition may reference.
    #[must_use]
    pub fn using(mut self, source: impl IntoTableSource) -> Self {
        self.using = Some(source.into_table_source());
        self
    }

    /// Restricts the affected rows.
    #[must_use]
    pub fn where_<C: IntoTyped<Boolean>>(mut self, condition: C) -> Self {
        self.where_clause = WhereClause::new(condition);
        self
    }

    /// Explicitly deletes all rows, waiving the WHERE requirement.
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

    fn provided_tables(&self) -> IdSet<Name> {
        let mut provided: IdSet<Name> = core::iter::once(self.table).collect();
        if let Some(source) = &self.using {
            source.provided_tables(&mut provided);
        }
        provided
    }
}

impl Serialize for DeleteStatement {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        writer.push_str("DELETE FROM ");
        writer.push_name(self.table);
        if let Some(source) = &self.using {
            writer.push_str(" USING ");
            source.serialize(writer);
        }
        self.where_clause.serialize(writer);
        self.returning.serialize(writer);
    }
}

impl Statement for DeleteStatement {
    fn parameters(&self) -> Vec<ParameterSpec> {
        let mut params = Vec::new();
        if let Some(source) = &self.using {
            source.collect_parameters(&mut params);
        }
        self.where_clause.collect_parameters(&mut params);
        self.returning.collect_parameters(&mut params);
        dedup_by_name(params)
    }

    fn has_returning(&self) -> bool {
        !self.returning.is_missing()
    }

    fn check(&self) -> Result<(), Inconsistency> {
        if self.where_clause.is_missing() && !self.unconditional {
            return Err(Inconsistency::UnguardedWhere);
        }
        self.returning.check()?;

        let mut required = IdSet::new();
        if let Some(source) = &self.using {
            source.required_tables(&mut required);
        }
        self.where_clause.required_tables(&mut required);
        self.returning.required_tables(&mut required);
        required.subtract(&self.provided_tables());
        if let Some(table) = required.first() {
            return Err(Inconsistency::RequiredTableNotProvided(table.text()));
        }

        let mut ctes = IdSet::new();
        if let Some(source) = &self.using {
            source.required_ctes(&mut ctes);
        }
        self.where_clause.required_ctes(&mut ctes);
        self.returning.required_ctes(&mut ctes);
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
    use crate::types::{Integral, ValueType};

    #[derive(Debug, Clone, Copy)]
    struct TabBar;

    impl Table for TabBar {
        const NAME: Name = Name::new("tab_bar");

        fn field_specs() -> Vec<FieldSpec> {
            vec![FieldSpec {
                name: Name::new("gamma"),
                value_type: ValueType::Integral,
                nullable: false,
            }]
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
    struct TabFoo;

    impl Table for TabFoo {
        const NAME: Name = Name::new("tab_foo");

        fn field_specs() -> Vec<FieldSpec> {
            vec![FieldSpec {
                name: Name::new("omega"),
                value_type: ValueType::Integral,
                nullable: false,
            }]
        }

        fn required_insert_columns() -> &'static [Name] {
            &[]
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Omega;

    impl Column for Omega {
        type Table = TabFoo;
        type Kind = Integral;

        const NAME: Name = Name::new("omega");
    }

    #[test]
    fn test_delete_serialization() {
        let statement = delete_from(TabBar).where_(Gamma.into_typed().eq(3_i64));
        assert_eq!(statement.check(), Ok(()));
        assert_eq!(
            statement.to_sql(&AnsiDialect::new()),
            "DELETE FROM tab_bar WHERE tab_bar.gamma = 3"
        );
    }

    #[test]
    fn test_missing_where_guard() {
        let statement = delete_from(TabBar);
        assert_eq!(statement.check(), Err(Inconsistency::UnguardedWhere));

        let statement = delete_from(TabBar).unconditionally();
        assert_eq!(statement.check(), Ok(()));
        assert_eq!(statement.to_sql(&AnsiDialect::new()), "DELETE FROM tab_bar");
    }

    #[test]
    fn test_using_provides_table() {
        let condition = Gamma.into_typed().eq(Omega);

        let bare = delete_from(TabBar).where_(condition.clone());
        assert_eq!(
            bare.check(),
            Err(Inconsistency::RequiredTableNotProvided("tab_foo"))
        );

        let with_using = delete_from(TabBar).using(TabFoo).where_(condition);
        assert_eq!(with_using.check(), Ok(()));
        assert_eq!(
            with_using.to_sql(&AnsiDialect::new()),
            "DELETE FROM tab_bar USING tab_foo WHERE tab_bar.gamma = tab_foo.omega"
        );
    }

    #[test]
    fn test_delete_parameters() {
        let statement = delete_from(TabBar)
            .where_(Gamma.into_typed().lt(typed_parameter::<Integral>("cutoff")));
        let params = statement.parameters();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "cutoff");
    }
}
