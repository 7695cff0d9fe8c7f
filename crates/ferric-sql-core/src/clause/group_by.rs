//! The GROUP BY clause.

use crate::clause::Clause;
use crate::expr::typed::{IntoTyped, TypedExpr};
use crate::expr::Expr;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::schema::Column;
use crate::serialize::{Serialize, SqlWriter};
use crate::types::ValueKind;

/// Conversion into a flattened, possibly mixed-kind expression list, used
/// for GROUP BY arguments.
pub trait IntoGroupBy {
    /// Flattens `self` into expressions in order.
    fn into_group_by(self) -> Vec<Expr>;
}

impl<K: ValueKind> IntoGroupBy for TypedExpr<K> {
    fn into_group_by(self) -> Vec<Expr> {
        vec![self.into_expr()]
    }
}

impl<C: Column> IntoGroupBy for C {
    fn into_group_by(self) -> Vec<Expr> {
        vec![self.into_typed().into_expr()]
    }
}

macro_rules! impl_into_group_by {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($name: IntoGroupBy),+> IntoGroupBy for ($($name,)+) {
            fn into_group_by(self) -> Vec<Expr> {
                let ($($name,)+) = self;
                let mut exprs = Vec::new();
                $(exprs.extend($name.into_group_by());)+
                exprs
            }
        }
    };
}

impl_into_group_by!(A);
impl_into_group_by!(A, B);
impl_into_group_by!(A, B, C);
impl_into_group_by!(A, B, C, D);
impl_into_group_by!(A, B, C, D, E);
impl_into_group_by!(A, B, C, D, E, F);
impl_into_group_by!(A, B, C, D, E, F, G);
impl_into_group_by!(A, B, C, D, E, F, G, H);

/// The GROUP BY clause. Construction takes at least one expression (the
/// tuple conversions have no empty form); a dynamically excluded grouping
/// expression is skipped at serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupByClause {
    exprs: Vec<Expr>,
}

impl GroupByClause {
    /// Builds the clause from one or more grouping expressions.
    pub fn new(exprs: impl IntoGroupBy) -> Self {
        Self {
            exprs: exprs.into_group_by(),
        }
    }

    /// The grouping expressions, including dynamically excluded ones.
    #[must_use]
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    fn active(&self) -> Vec<&Expr> {
        self.exprs.iter().filter(|expr| !expr.is_pruned()).collect()
    }
}

impl Serialize for GroupByClause {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        let active = self.active();
        if active.is_empty() {
            return;
        }
        writer.push_str(" GROUP BY ");
        for (i, expr) in active.into_iter().enumerate() {
            if i > 0 {
                writer.push(',');
            }
            expr.serialize(writer);
        }
    }
}

impl Clause for GroupByClause {
    fn is_missing(&self) -> bool {
        self.exprs.is_empty()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        for expr in &self.exprs {
            expr.collect_required_tables(out);
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        for expr in &self.exprs {
            expr.collect_required_ctes(out);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        for expr in &self.exprs {
            expr.collect_parameters(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::typed::dynamic;
    use crate::expr::ColumnRef;
    use crate::types::{Integral, ValueType};

    fn omega() -> TypedExpr<Integral> {
        TypedExpr::wrap(Expr::Column(ColumnRef {
            table: Name::new("tab_foo"),
            name: Name::new("omega"),
            value_type: ValueType::Integral,
            nullable: false,
        }))
    }

    fn psi() -> TypedExpr<Integral> {
        TypedExpr::wrap(Expr::Column(ColumnRef {
            table: Name::new("tab_foo"),
            name: Name::new("psi"),
            value_type: ValueType::Integral,
            nullable: false,
        }))
    }

    #[test]
    fn test_group_by_list() {
        let clause = GroupByClause::new((omega(), psi()));
        assert_eq!(
            clause.to_sql(&AnsiDialect::new()),
            " GROUP BY tab_foo.omega,tab_foo.psi"
        );
    }

    #[test]
    fn test_excluded_dynamic_entry_is_skipped() {
        let clause = GroupByClause::new((omega(), dynamic(false, psi())));
        assert_eq!(clause.to_sql(&AnsiDialect::new()), " GROUP BY tab_foo.omega");
    }

    #[test]
    fn test_all_entries_excluded_serializes_nothing() {
        let clause = GroupByClause::new(dynamic(false, omega()));
        assert_eq!(clause.to_sql(&AnsiDialect::new()), "");
    }
}
