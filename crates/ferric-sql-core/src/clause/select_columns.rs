//! The select column list.
//!
//! Columns are gathered from tuples of typed expressions, column
//! descriptors, aliased expressions and [`all_of`](crate::schema::all_of)
//! groupings, flattened in order. The list derives the statement's result
//! row shape; a dynamically excluded column serializes as `NULL AS name`
//! so the shape stays stable across the included and excluded branches.

use crate::check::Inconsistency;
use crate::clause::Clause;
use crate::expr::typed::TypedExpr;
use crate::expr::Expr;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::row::{FieldSpec, RowSpec};
use crate::schema::{AllOf, Column};
use crate::serialize::{Serialize, SqlWriter};
use crate::types::ValueKind;

/// An expression with an explicit result name: `expr AS name`.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasedExpr {
    name: Name,
    expr: Expr,
}

impl AliasedExpr {
    /// Pairs an expression with its result name.
    #[must_use]
    pub fn new(name: Name, expr: Expr) -> Self {
        Self { name, expr }
    }
}

/// One entry of the select column list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    expr: Expr,
    alias: Option<Name>,
}

impl SelectColumn {
    /// The name this column contributes to the result row: the alias if
    /// one was given, otherwise the expression's own derivable name.
    #[must_use]
    pub fn result_name(&self) -> Option<Name> {
        self.alias.or_else(|| self.expr.suggested_name())
    }

    /// The underlying expression.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    pub(crate) fn field_spec(&self) -> Option<FieldSpec> {
        self.result_name().map(|name| FieldSpec {
            name,
            value_type: self.expr.value_type(),
            // An excluded dynamic column substitutes NULL.
            nullable: self.expr.can_be_null() || self.expr.is_pruned(),
        })
    }
}

impl Serialize for SelectColumn {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        if self.expr.is_pruned() {
            writer.push_str("NULL");
            if let Some(name) = self.result_name() {
                writer.push_str(" AS ");
                writer.push_name(name);
            }
            return;
        }
        self.expr.serialize(writer);
        if let Some(alias) = self.alias {
            writer.push_str(" AS ");
            writer.push_name(alias);
        }
    }
}

/// Conversion into a flattened list of select columns.
///
/// Implemented by typed expressions, column descriptors, aliased
/// expressions, [`AllOf`] groupings, and tuples of all of these:
/// `select((foo::Omega, all_of(bar), count_all().as_("n")))`.
pub trait IntoSelectColumns {
    /// Flattens `self` into select columns in order.
    fn into_select_columns(self) -> Vec<SelectColumn>;
}

impl<K: ValueKind> IntoSelectColumns for TypedExpr<K> {
    fn into_select_columns(self) -> Vec<SelectColumn> {
        vec![SelectColumn {
            expr: self.into_expr(),
            alias: None,
        }]
    }
}

impl IntoSelectColumns for AliasedExpr {
    fn into_select_columns(self) -> Vec<SelectColumn> {
        vec![SelectColumn {
            expr: self.expr,
            alias: Some(self.name),
        }]
    }
}

impl IntoSelectColumns for AllOf {
    fn into_select_columns(self) -> Vec<SelectColumn> {
        self.column_exprs()
            .into_iter()
            .map(|expr| SelectColumn { expr, alias: None })
            .collect()
    }
}

impl<C: Column> IntoSelectColumns for C {
    fn into_select_columns(self) -> Vec<SelectColumn> {
        use crate::expr::typed::IntoTyped;
        self.into_typed().into_select_columns()
    }
}

macro_rules! impl_into_select_columns {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($name: IntoSelectColumns),+> IntoSelectColumns for ($($name,)+) {
            fn into_select_columns(self) -> Vec<SelectColumn> {
                let ($($name,)+) = self;
                let mut columns = Vec::new();
                $(columns.extend($name.into_select_columns());)+
                columns
            }
        }
    };
}

impl_into_select_columns!(A);
impl_into_select_columns!(A, B);
impl_into_select_columns!(A, B, C);
impl_into_select_columns!(A, B, C, D);
impl_into_select_columns!(A, B, C, D, E);
impl_into_select_columns!(A, B, C, D, E, F);
impl_into_select_columns!(A, B, C, D, E, F, G);
impl_into_select_columns!(A, B, C, D, E, F, G, H);

/// The `SELECT [DISTINCT] ...` column list clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectColumnList {
    columns: Vec<SelectColumn>,
    distinct: bool,
}

impl SelectColumnList {
    /// Builds the list from anything column-list-like.
    pub fn new(columns: impl IntoSelectColumns) -> Self {
        Self {
            columns: columns.into_select_columns(),
            distinct: false,
        }
    }

    /// Marks the selection DISTINCT.
    pub fn set_distinct(&mut self) {
        self.distinct = true;
    }

    /// The entries in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[SelectColumn] {
        &self.columns
    }

    /// Derives the result row shape.
    #[must_use]
    pub fn row_spec(&self) -> RowSpec {
        RowSpec::new(
            self.columns
                .iter()
                .filter_map(SelectColumn::field_spec)
                .collect(),
        )
    }
}

impl Serialize for SelectColumnList {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        writer.push_str("SELECT ");
        if self.distinct {
            writer.push_str("DISTINCT ");
        }
        writer.push_list(&self.columns);
    }
}

impl Clause for SelectColumnList {
    fn is_missing(&self) -> bool {
        self.columns.is_empty()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        for column in &self.columns {
            column.expr.collect_required_tables(out);
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        for column in &self.columns {
            column.expr.collect_required_ctes(out);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        for column in &self.columns {
            column.expr.collect_parameters(out);
        }
    }

    fn check(&self) -> Result<(), Inconsistency> {
        if self.columns.is_empty() {
            return Err(Inconsistency::NoSelectColumns);
        }
        let mut seen: IdSet<Name> = IdSet::new();
        for column in &self.columns {
            let name = column
                .result_name()
                .ok_or(Inconsistency::UnnamedSelectColumn)?;
            if !seen.insert(name) {
                return Err(Inconsistency::DuplicateResultName(name.text()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::functions::count_all;
    use crate::expr::typed::{dynamic, value, ExprOps, NumericOps};
    use crate::expr::ColumnRef;
    use crate::types::ValueType;

    fn omega() -> TypedExpr<crate::types::Integral> {
        TypedExpr::wrap(Expr::Column(ColumnRef {
            table: Name::new("tab_foo"),
            name: Name::new("omega"),
            value_type: ValueType::Integral,
            nullable: false,
        }))
    }

    #[test]
    fn test_column_list_serialization() {
        let list = SelectColumnList::new((omega(), count_all().as_("n")));
        assert_eq!(
            list.to_sql(&AnsiDialect::new()),
            "SELECT tab_foo.omega,COUNT(*) AS n"
        );
    }

    #[test]
    fn test_row_spec_names_and_nullability() {
        let list = SelectColumnList::new((omega(), count_all().as_("n")));
        let row = list.row_spec();
        assert_eq!(row.len(), 2);
        assert_eq!(row.fields()[0].name, Name::new("omega"));
        assert_eq!(row.fields()[1].name, Name::new("n"));
        assert_eq!(row.fields()[1].value_type, ValueType::Integral);
    }

    #[test]
    fn test_excluded_dynamic_column_substitutes_null() {
        let list = SelectColumnList::new(dynamic(false, omega()));
        assert_eq!(list.to_sql(&AnsiDialect::new()), "SELECT NULL AS omega");

        let row = list.row_spec();
        assert_eq!(row.fields()[0].name, Name::new("omega"));
        assert!(row.fields()[0].nullable);
    }

    #[test]
    fn test_duplicate_result_names_rejected() {
        let list = SelectColumnList::new((omega(), omega()));
        assert_eq!(
            list.check(),
            Err(Inconsistency::DuplicateResultName("omega"))
        );
    }

    #[test]
    fn test_unnamed_expression_rejected() {
        let list = SelectColumnList::new(value(1_i64).add(2_i64));
        assert_eq!(list.check(), Err(Inconsistency::UnnamedSelectColumn));
    }

    #[test]
    fn test_empty_list_is_missing_and_inconsistent() {
        let list = SelectColumnList::default();
        assert!(list.is_missing());
        assert_eq!(list.check(), Err(Inconsistency::NoSelectColumns));
    }
}
