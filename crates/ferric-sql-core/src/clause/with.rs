//! Common table expressions and the WITH clause.
//!
//! A [`Cte`] pairs a name with a select statement; its [`CteRef`] is the
//! lightweight handle used inside other statements (FROM sources, column
//! references). Referencing a CTE requires it; only a surrounding WITH
//! provides it. A recursive CTE is the union of a base term and a
//! recursive term that reads from the CTE's own reference, so the bare
//! recursive term requires the CTE while the assembled `with(...)`
//! statement does not.

use crate::check::Inconsistency;
use crate::clause::from::{IntoTableSource, TableSource};
use crate::clause::Clause;
use crate::expr::typed::TypedExpr;
use crate::expr::{ColumnRef, Expr};
use crate::idset::IdSet;
use crate::name::Name;
use crate::params::ParameterSpec;
use crate::row::RowSpec;
use crate::serialize::{Serialize, SqlWriter};
use crate::statement::select::SelectStatement;
use crate::types::ValueKind;

/// A named common table expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    name: Name,
    select: SelectStatement,
    recursive: bool,
}

impl Cte {
    /// Names a select statement as a CTE.
    #[must_use]
    pub fn new(name: &'static str, select: SelectStatement) -> Self {
        Self {
            name: Name::new(name),
            select,
            recursive: false,
        }
    }

    /// The CTE's name.
    #[must_use]
    pub const fn name(&self) -> Name {
        self.name
    }

    /// The row shape the CTE yields, derived from its select list.
    #[must_use]
    pub fn row_spec(&self) -> RowSpec {
        self.select.row_spec()
    }

    /// The handle other statements use to reference this CTE.
    #[must_use]
    pub fn reference(&self) -> CteRef {
        CteRef {
            name: self.name,
            row: self.row_spec(),
        }
    }

    /// Turns the CTE recursive: `base UNION ALL recursive_term`, where the
    /// recursive term reads from this CTE's own reference.
    #[must_use]
    pub fn union_all(mut self, recursive_term: SelectStatement) -> Self {
        self.select = self.select.union_all(recursive_term);
        self.recursive = true;
        self
    }

    /// As [`union_all`](Self::union_all) with duplicate elimination.
    #[must_use]
    pub fn union_distinct(mut self, recursive_term: SelectStatement) -> Self {
        self.select = self.select.union_distinct(recursive_term);
        self.recursive = true;
        self
    }

    pub(crate) fn body_check(&self) -> Result<(), Inconsistency> {
        self.select.check_within_cte(self.name)
    }
}

/// Names a select statement as a CTE: `cte("x", select(...).from(...))`.
#[must_use]
pub fn cte(name: &'static str, select: SelectStatement) -> Cte {
    Cte::new(name, select)
}

/// A reference to a CTE: carries the name and the row shape, nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct CteRef {
    name: Name,
    row: RowSpec,
}

impl CteRef {
    /// The referenced CTE's name.
    #[must_use]
    pub const fn name(&self) -> Name {
        self.name
    }

    /// The referenced CTE's row shape.
    #[must_use]
    pub const fn row_spec(&self) -> &RowSpec {
        &self.row
    }

    /// A typed column of the CTE, validated against its row shape: the
    /// column must exist and its value type must match `K`.
    pub fn column<K: ValueKind>(
        &self,
        column: &'static str,
    ) -> Result<TypedExpr<K>, Inconsistency> {
        let field = self
            .row
            .field(column)
            .ok_or(Inconsistency::UnknownCteColumn(self.name.text(), column))?;
        if field.value_type != K::VALUE_TYPE {
            return Err(Inconsistency::CteColumnTypeMismatch(
                self.name.text(),
                column,
            ));
        }
        Ok(TypedExpr::wrap(Expr::Column(ColumnRef {
            table: self.name,
            name: field.name,
            value_type: field.value_type,
            nullable: field.nullable,
        })))
    }
}

impl IntoTableSource for CteRef {
    fn into_table_source(self) -> TableSource {
        TableSource::Cte { name: self.name }
    }
}

impl IntoTableSource for &CteRef {
    fn into_table_source(self) -> TableSource {
        TableSource::Cte { name: self.name }
    }
}

/// Conversion into a CTE list, for `with(...)` arguments.
pub trait IntoCtes {
    /// Converts `self` into CTEs in order.
    fn into_ctes(self) -> Vec<Cte>;
}

impl IntoCtes for Cte {
    fn into_ctes(self) -> Vec<Cte> {
        vec![self]
    }
}

macro_rules! impl_into_ctes {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($name: IntoCtes),+> IntoCtes for ($($name,)+) {
            fn into_ctes(self) -> Vec<Cte> {
                let ($($name,)+) = self;
                let mut ctes = Vec::new();
                $(ctes.extend($name.into_ctes());)+
                ctes
            }
        }
    };
}

impl_into_ctes!(A);
impl_into_ctes!(A, B);
impl_into_ctes!(A, B, C);
impl_into_ctes!(A, B, C, D);

/// The WITH clause.
///
/// Provides its member CTE names to the statement that follows; the
/// members' own CTE requirements are resolved among the members (and
/// against self-references) and are not propagated upward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithClause {
    ctes: Vec<Cte>,
}

impl WithClause {
    /// Builds the clause from one or more CTEs.
    pub fn new(ctes: impl IntoCtes) -> Self {
        Self {
            ctes: ctes.into_ctes(),
        }
    }

    /// The member CTEs in declaration order.
    #[must_use]
    pub fn ctes(&self) -> &[Cte] {
        &self.ctes
    }

    fn member_names(&self) -> IdSet<Name> {
        self.ctes.iter().map(Cte::name).collect()
    }
}

impl Serialize for WithClause {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        if self.ctes.is_empty() {
            return;
        }
        writer.push_str("WITH ");
        if self.ctes.iter().any(|cte| cte.recursive) {
            writer.push_str("RECURSIVE ");
        }
        for (i, cte) in self.ctes.iter().enumerate() {
            if i > 0 {
                writer.push(',');
            }
            writer.push_name(cte.name);
            writer.push_str(" AS (");
            cte.select.serialize(writer);
            writer.push(')');
        }
        writer.push(' ');
    }
}

impl Clause for WithClause {
    fn is_missing(&self) -> bool {
        self.ctes.is_empty()
    }

    fn required_tables(&self, out: &mut IdSet<Name>) {
        for cte in &self.ctes {
            out.union_with(cte.select.unresolved_tables());
        }
    }

    fn required_ctes(&self, out: &mut IdSet<Name>) {
        let members = self.member_names();
        for cte in &self.ctes {
            let mut required = cte.select.unresolved_ctes();
            required.subtract(&members);
            out.union_with(required);
        }
    }

    fn provided_ctes(&self, out: &mut IdSet<Name>) {
        for cte in &self.ctes {
            out.insert(cte.name);
        }
    }

    fn collect_parameters(&self, out: &mut Vec<ParameterSpec>) {
        for cte in &self.ctes {
            out.extend(cte.select.parameters());
        }
    }

    fn check(&self) -> Result<(), Inconsistency> {
        for cte in &self.ctes {
            cte.body_check()?;
        }
        Ok(())
    }
}
