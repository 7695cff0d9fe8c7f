//! The ORDER BY clause.

use crate::clause::Clause;
use crate::expr::typed::IntoTyped;
use crate::expr::Expr;
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::serialize::{Serialize, SqlWriter};
use crate::types::ValueKind;

/// One ordering term: an expression plus its direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTerm {
    expr: Expr,
    descending: bool,
}

impl Serialize for OrderTerm {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        self.expr.serialize(writer);
        writer.push_str(if self.descending { " DESC" } else { " ASC" });
    }
}

/// Direction constructors, available on every typed expression-like value.
pub trait OrderOps<K: ValueKind>: IntoTyped<K> + Sized {
    /// Ascending order.
    fn asc(self) -> OrderTerm {
        OrderTerm {
            expr: self.into_typed().into_expr(),
            descending: false,
        }
    }

    /// Descending order.
    fn desc(self) -> OrderTerm {
        OrderTerm {
            expr: self.into_typed().into_expr(),
            descending: true,
        }
    }
}

impl<K: ValueKind, T: IntoTyped<K>> OrderOps<K> for T {}

/// Conversion into an ordered list of order terms.
pub trait IntoOrderTerms {
    /// Flattens `self` into order terms.
    fn into_order_terms(self) -> Vec<OrderTerm>;
}

impl IntoOrderTerms for OrderTerm {
    fn into_order_terms(self) -> Vec<OrderTerm> {
        vec![self]
    }
}

macro_rules! impl_into_order_terms {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($name: IntoOrderTerms),+> IntoOrderTerms for ($($name,)+) {
            fn into_order_terms(self) -> Vec<OrderTerm> {
                let ($($name,)+) = self;
                let mut terms = Vec::new();
                $(terms.extend($name.into_order_terms());)+
                terms
            }
        }
    };
}

impl_into_order_terms!(A);
impl_into_order_terms!(A, B);
impl_into_order_terms!(A, B, C);
impl_into_order_terms!(A, B, C, D);
impl_into_order_terms!(A, B, C, D, E);
impl_into_order_terms!(A, B, C, D, E, F);

/// The ORDER BY clause. A dynamically excluded term is skipped at
/// serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderByClause {
    terms: Vec<OrderTerm>,
}

impl OrderByClause {
    /// Builds the clause from one or more order terms.
    pub fn new(terms: impl IntoOrderTerms) -> Self {
        Self {
            terms: terms.into_order_terms(),
        }
    }
}

impl Serialize for OrderByClause {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        let active: Vec<&OrderTerm> = self
            .terms
            .iter()
            .filter(|term| !term.expr.is_pruned())
            .collect();
        if active.is_empty() {
            return;
        }
        writer.push_str(" ORDER BY ");
        for (i, term) in active.into_iter().enumerate() {
            if i > 0 {
                writer.push(',');
            }
            term.serialize(writer);
        }
    }
}

impl Clause for OrderByClause {
    fn is_missing(&self) -> bool {
        self.terms.is_empty()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        for term in &self.terms {
            term.expr.collect_required_tables(out);
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        for term in &self.terms {
            term.expr.collect_required_ctes(out);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        for term in &self.terms {
            term.expr.collect_parameters(out);
        }
    }
}
