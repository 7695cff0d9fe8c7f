//! The FROM clause: tables, aliases, CTE references and joins.
//!
//! Joins chain left-associatively; every non-cross join must state its
//! condition through `.on(...)` or opt out with `.unconditionally()`
//! before it can be used as a table source, so a condition-less join is
//! not constructible.

use crate::check::Inconsistency;
use crate::clause::Clause;
use crate::expr::typed::IntoTyped;
use crate::expr::Expr;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::schema::{Table, TableAlias};
use crate::serialize::{Serialize, SqlWriter};
use crate::types::Boolean;

/// A join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT OUTER JOIN`
    LeftOuter,
    /// `RIGHT OUTER JOIN`
    RightOuter,
    /// `FULL OUTER JOIN`
    FullOuter,
    /// `CROSS JOIN` (no condition)
    Cross,
}

impl JoinKind {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Inner => " INNER JOIN ",
            Self::LeftOuter => " LEFT OUTER JOIN ",
            Self::RightOuter => " RIGHT OUTER JOIN ",
            Self::FullOuter => " FULL OUTER JOIN ",
            Self::Cross => " CROSS JOIN ",
        }
    }
}

/// A join's ON part.
#[derive(Debug, Clone, PartialEq)]
enum JoinCondition {
    On(Expr),
    /// `.unconditionally()`: serializes as `ON TRUE`.
    Unconditional,
    /// Cross joins carry no condition.
    None,
}

/// A completed join of two table sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    left: TableSource,
    kind: JoinKind,
    right: TableSource,
    condition: JoinCondition,
}

/// Anything FROM can name.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    /// A plain table.
    Table {
        /// The table name.
        name: Name,
    },
    /// A renamed table: provides the alias, not the underlying name.
    Aliased {
        /// The underlying table name.
        table: Name,
        /// The providing alias.
        alias: Name,
    },
    /// A CTE used as a table: provides its name and requires the CTE.
    Cte {
        /// The CTE name.
        name: Name,
    },
    /// A join of two sources.
    Join(Box<Join>),
}

impl TableSource {
    /// Adds the names this source makes available to column references.
    pub fn provided_tables(&self, out: &mut IdSet<Name>) {
        match self {
            Self::Table { name } | Self::Cte { name } => {
                out.insert(*name);
            }
            Self::Aliased { alias, .. } => {
                out.insert(*alias);
            }
            Self::Join(join) => {
                join.left.provided_tables(out);
                join.right.provided_tables(out);
            }
        }
    }

    /// Adds the tables the join conditions reference.
    pub fn required_tables(&self, out: &mut IdSet<Name>) {
        if let Self::Join(join) = self {
            join.left.required_tables(out);
            join.right.required_tables(out);
            if let JoinCondition::On(condition) = &join.condition {
                condition.collect_required_tables(out);
            }
        }
    }

    /// Adds the CTE names this source depends on.
    pub fn required_ctes(&self, out: &mut IdSet<Name>) {
        match self {
            Self::Cte { name } => {
                out.insert(*name);
            }
            Self::Join(join) => {
                join.left.required_ctes(out);
                join.right.required_ctes(out);
                if let JoinCondition::On(condition) = &join.condition {
                    condition.collect_required_ctes(out);
                }
            }
            Self::Table { .. } | Self::Aliased { .. } => {}
        }
    }

    pub(crate) fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        if let Self::Join(join) = self {
            join.left.collect_parameters(out);
            join.right.collect_parameters(out);
            if let JoinCondition::On(condition) = &join.condition {
                condition.collect_parameters(out);
            }
        }
    }
}

impl Serialize for TableSource {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        match self {
            Self::Table { name } | Self::Cte { name } => writer.push_name(*name),
            Self::Aliased { table, alias } => {
                writer.push_name(*table);
                writer.push_str(" AS ");
                writer.push_name(*alias);
            }
            Self::Join(join) => {
                join.left.serialize(writer);
                writer.push_str(join.kind.keyword());
                join.right.serialize(writer);
                match &join.condition {
                    JoinCondition::On(condition) => {
                        writer.push_str(" ON ");
                        condition.serialize(writer);
                    }
                    JoinCondition::Unconditional => {
                        writer.push_str(" ON ");
                        let literal = writer.dialect().boolean_literal(true);
                        writer.push_str(literal);
                    }
                    JoinCondition::None => {}
                }
            }
        }
    }
}

/// Conversion into a table source.
pub trait IntoTableSource {
    /// Converts `self` into a table source.
    fn into_table_source(self) -> TableSource;
}

impl<T: Table> IntoTableSource for T {
    fn into_table_source(self) -> TableSource {
        TableSource::Table { name: T::NAME }
    }
}

impl<T: Table> IntoTableSource for TableAlias<T> {
    fn into_table_source(self) -> TableSource {
        TableSource::Aliased {
            table: self.table_name(),
            alias: self.name(),
        }
    }
}

impl IntoTableSource for TableSource {
    fn into_table_source(self) -> TableSource {
        self
    }
}

/// A join whose condition has not been given yet. Not usable as a table
/// source until `.on(...)` or `.unconditionally()` completes it.
#[derive(Debug, Clone)]
#[must_use = "a join is not usable until on() or unconditionally() is called"]
pub struct PendingJoin {
    left: TableSource,
    kind: JoinKind,
    right: TableSource,
}

impl PendingJoin {
    /// Completes the join with its ON condition.
    pub fn on<C: IntoTyped<Boolean>>(self, condition: C) -> TableSource {
        TableSource::Join(Box::new(Join {
            left: self.left,
            kind: self.kind,
            right: self.right,
            condition: JoinCondition::On(condition.into_typed().into_expr()),
        }))
    }

    /// Completes the join without a condition (`ON TRUE`).
    pub fn unconditionally(self) -> TableSource {
        TableSource::Join(Box::new(Join {
            left: self.left,
            kind: self.kind,
            right: self.right,
            condition: JoinCondition::Unconditional,
        }))
    }
}

/// Join builders, available on every table-source-like value.
pub trait JoinOps: IntoTableSource + Sized {
    /// `self INNER JOIN rhs`, awaiting its condition.
    fn join<R: IntoTableSource>(self, rhs: R) -> PendingJoin {
        PendingJoin {
            left: self.into_table_source(),
            kind: JoinKind::Inner,
            right: rhs.into_table_source(),
        }
    }

    /// `self LEFT OUTER JOIN rhs`, awaiting its condition.
    fn left_outer_join<R: IntoTableSource>(self, rhs: R) -> PendingJoin {
        PendingJoin {
            left: self.into_table_source(),
            kind: JoinKind::LeftOuter,
            right: rhs.into_table_source(),
        }
    }

    /// `self RIGHT OUTER JOIN rhs`, awaiting its condition.
    fn right_outer_join<R: IntoTableSource>(self, rhs: R) -> PendingJoin {
        PendingJoin {
            left: self.into_table_source(),
            kind: JoinKind::RightOuter,
            right: rhs.into_table_source(),
        }
    }

    /// `self FULL OUTER JOIN rhs`, awaiting its condition.
    fn full_outer_join<R: IntoTableSource>(self, rhs: R) -> PendingJoin {
        PendingJoin {
            left: self.into_table_source(),
            kind: JoinKind::FullOuter,
            right: rhs.into_table_source(),
        }
    }

    /// `self CROSS JOIN rhs`; cross joins take no condition.
    fn cross_join<R: IntoTableSource>(self, rhs: R) -> TableSource {
        TableSource::Join(Box::new(Join {
            left: self.into_table_source(),
            kind: JoinKind::Cross,
            right: rhs.into_table_source(),
            condition: JoinCondition::None,
        }))
    }
}

impl<T: IntoTableSource> JoinOps for T {}

/// The FROM clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FromClause {
    source: Option<TableSource>,
}

impl FromClause {
    /// Sets the clause's table source.
    pub fn new(source: impl IntoTableSource) -> Self {
        Self {
            source: Some(source.into_table_source()),
        }
    }
}

impl Serialize for FromClause {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        if let Some(source) = &self.source {
            writer.push_str(" FROM ");
            source.serialize(writer);
        }
    }
}

impl Clause for FromClause {
    fn is_missing(&self) -> bool {
        self.source.is_none()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        if let Some(source) = &self.source {
            source.required_tables(out);
        }
    }

    fn provided_tables(&self, out: &mut IdSet<Name>) {
        if let Some(source) = &self.source {
            source.provided_tables(out);
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        if let Some(source) = &self.source {
            source.required_ctes(out);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        if let Some(source) = &self.source {
            source.collect_parameters(out);
        }
    }

    fn check(&self) -> Result<(), Inconsistency> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::typed::ExprOps;
    use crate::row::FieldSpec;
    use crate::types::{Integral, ValueType};

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
            const COLUMNS: &[Name] = &[Name::new("omega")];
            COLUMNS
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Omega;

    impl crate::schema::Column for Omega {
        type Table = TabFoo;
        type Kind = Integral;

        const NAME: Name = Name::new("omega");
    }

    #[derive(Debug, Clone, Copy)]
    struct TabBar;

    impl Table for TabBar {
        const NAME: Name = Name::new("tab_bar");

        fn field_specs() -> Vec<FieldSpec> {
            vec![FieldSpec {
                name: Name::new("alpha"),
                value_type: ValueType::Integral,
                nullable: true,
            }]
        }

        fn required_insert_columns() -> &'static [Name] {
            &[]
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Alpha;

    impl crate::schema::Column for Alpha {
        type Table = TabBar;
        type Kind = Integral;

        const NAME: Name = Name::new("alpha");
    }

    #[test]
    fn test_plain_from() {
        let from = FromClause::new(TabFoo);
        assert_eq!(from.to_sql(&AnsiDialect::new()), " FROM tab_foo");

        let mut provided = IdSet::new();
        from.provided_tables(&mut provided);
        assert!(provided.contains(&Name::new("tab_foo")));
    }

    #[test]
    fn test_alias_provides_alias_not_base() {
        let from = FromClause::new(TabFoo.alias("f"));
        assert_eq!(from.to_sql(&AnsiDialect::new()), " FROM tab_foo AS f");

        let mut provided = IdSet::new();
        from.provided_tables(&mut provided);
        assert!(provided.contains(&Name::new("f")));
        assert!(!provided.contains(&Name::new("tab_foo")));
    }

    #[test]
    fn test_inner_join_with_condition() {
        let from = FromClause::new(TabFoo.join(TabBar).on(Omega.eq(Alpha)));
        assert_eq!(
            from.to_sql(&AnsiDialect::new()),
            " FROM tab_foo INNER JOIN tab_bar ON tab_foo.omega = tab_bar.alpha"
        );

        let mut provided = IdSet::new();
        from.provided_tables(&mut provided);
        assert!(provided.contains(&Name::new("tab_foo")));
        assert!(provided.contains(&Name::new("tab_bar")));
    }

    #[test]
    fn test_unconditional_join() {
        let from = FromClause::new(TabFoo.join(TabBar).unconditionally());
        assert_eq!(
            from.to_sql(&AnsiDialect::new()),
            " FROM tab_foo INNER JOIN tab_bar ON TRUE"
        );
    }

    #[test]
    fn test_join_chain_is_left_associative() {
        let from = FromClause::new(
            TabFoo
                .join(TabBar)
                .on(Omega.eq(Alpha))
                .cross_join(TabFoo.alias("f2")),
        );
        assert_eq!(
            from.to_sql(&AnsiDialect::new()),
            " FROM tab_foo INNER JOIN tab_bar ON tab_foo.omega = tab_bar.alpha CROSS JOIN tab_foo AS f2"
        );
    }

    #[test]
    fn test_missing_from_serializes_nothing() {
        let from = FromClause::default();
        assert!(from.is_missing());
        assert_eq!(from.to_sql(&AnsiDialect::new()), "");
    }
}
