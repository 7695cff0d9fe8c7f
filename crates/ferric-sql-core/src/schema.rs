//! Table and column descriptors.
//!
//! A table is a zero-sized type carrying its SQL name and the shape of its
//! columns; each column is its own zero-sized type carrying the value kind
//! and the write policies (nullable, default, auto-increment, no-insert,
//! no-update). The derive macro in `ferric-sql-derive` generates these
//! from an annotated struct; hand-written implementations work the same
//! way.
//!
//! Column descriptors convert into typed expressions, so every operator of
//! [`ExprOps`](crate::expr::typed::ExprOps) is available on them directly:
//! `foo::Omega.eq(17)`.

use core::marker::PhantomData;

use crate::expr::typed::{IntoTyped, TypedExpr};
use crate::expr::{ColumnRef, Expr};
use crate::name::Name;
use crate::row::FieldSpec;
use crate::serialize::{Serialize, SqlWriter};
use crate::types::ValueKind;
use crate::value::Value;

/// A table descriptor.
pub trait Table: Copy + 'static {
    /// The table name as serialized.
    const NAME: Name;

    /// The column shapes in declaration order.
    fn field_specs() -> Vec<FieldSpec>;

    /// The columns an INSERT must assign: not nullable, no declared
    /// default, not auto-increment.
    fn required_insert_columns() -> &'static [Name];

    /// Renames the table for one statement: `FROM tab_foo AS t`. Columns
    /// must then be reached through the alias.
    fn alias(self, name: &'static str) -> TableAlias<Self> {
        TableAlias::new(Name::new(name))
    }
}

/// A column descriptor.
pub trait Column: Copy + 'static {
    /// The table this column belongs to.
    type Table: Table;
    /// The column's value kind.
    type Kind: ValueKind;

    /// The column name as serialized.
    const NAME: Name;
    /// Whether the column may hold NULL.
    const CAN_BE_NULL: bool = false;
    /// Whether the column has a declared default.
    const HAS_DEFAULT: bool = false;
    /// Whether the column is auto-increment (implies a default on insert).
    const AUTO_INCREMENT: bool = false;
    /// Whether INSERT statements must not assign this column.
    const MUST_NOT_INSERT: bool = false;
    /// Whether UPDATE statements must not assign this column.
    const MUST_NOT_UPDATE: bool = false;

    /// Builds the assignment `column=value` for INSERT and UPDATE set
    /// lists. The value's kind must match the column's.
    fn assign<T: IntoTyped<Self::Kind>>(self, value: T) -> Assignment {
        Assignment {
            table: Self::Table::NAME,
            column: Self::NAME,
            value: value.into_typed().into_expr(),
            must_not_insert: Self::MUST_NOT_INSERT,
            must_not_update: Self::MUST_NOT_UPDATE,
        }
    }
}

/// Columns that may hold NULL. Only these offer [`assign_null`].
///
/// [`assign_null`]: NullableColumn::assign_null
pub trait NullableColumn: Column {
    /// Builds the assignment `column=NULL`.
    fn assign_null(self) -> Assignment {
        Assignment {
            table: Self::Table::NAME,
            column: Self::NAME,
            value: Expr::Literal(Value::Null),
            must_not_insert: Self::MUST_NOT_INSERT,
            must_not_update: Self::MUST_NOT_UPDATE,
        }
    }
}

/// Columns with a declared default (including auto-increment). Only these
/// offer [`assign_default`].
///
/// [`assign_default`]: HasDefault::assign_default
pub trait HasDefault: Column {
    /// Builds the assignment `column=DEFAULT`.
    fn assign_default(self) -> Assignment {
        Assignment {
            table: Self::Table::NAME,
            column: Self::NAME,
            value: Expr::Literal(Value::Default),
            must_not_insert: Self::MUST_NOT_INSERT,
            must_not_update: Self::MUST_NOT_UPDATE,
        }
    }
}

impl<C: Column> IntoTyped<C::Kind> for C {
    fn into_typed(self) -> TypedExpr<C::Kind> {
        TypedExpr::wrap(Expr::Column(ColumnRef {
            table: C::Table::NAME,
            name: C::NAME,
            value_type: <C::Kind as ValueKind>::VALUE_TYPE,
            nullable: C::CAN_BE_NULL,
        }))
    }
}

/// A table renamed for one statement.
#[derive(Debug, Clone, Copy)]
pub struct TableAlias<T: Table> {
    name: Name,
    _table: PhantomData<T>,
}

impl<T: Table> TableAlias<T> {
    pub(crate) const fn new(name: Name) -> Self {
        Self {
            name,
            _table: PhantomData,
        }
    }

    /// The alias name.
    #[must_use]
    pub const fn name(&self) -> Name {
        self.name
    }

    /// The underlying table name.
    #[must_use]
    pub const fn table_name(&self) -> Name {
        T::NAME
    }

    /// A column of the aliased table, qualified by the alias.
    pub fn column<C: Column<Table = T>>(&self, _column: C) -> TypedExpr<C::Kind> {
        TypedExpr::wrap(Expr::Column(ColumnRef {
            table: self.name,
            name: C::NAME,
            value_type: <C::Kind as ValueKind>::VALUE_TYPE,
            nullable: C::CAN_BE_NULL,
        }))
    }
}

/// A column-to-value assignment, the element of INSERT and UPDATE set
/// lists. Serializes as `column=value` with no surrounding spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The owning table's name, used by the consistency check.
    pub table: Name,
    /// The assigned column.
    pub column: Name,
    /// The assigned value expression.
    pub value: Expr,
    /// Copied from the column's write policy.
    pub must_not_insert: bool,
    /// Copied from the column's write policy.
    pub must_not_update: bool,
}

impl Serialize for Assignment {
    fn serialize(&self, writer: &mut SqlWriter<'_>) {
        writer.push_name(self.column);
        writer.push('=');
        if self.value.requires_braces() {
            writer.push('(');
            self.value.serialize(writer);
            writer.push(')');
        } else {
            self.value.serialize(writer);
        }
    }
}

/// Conversion into an assignment list, for `set(...)` arguments.
///
/// Tuples cover the common literal case; a `Vec` covers lists built at
/// runtime.
pub trait IntoAssignments {
    /// Converts `self` into assignments in order.
    fn into_assignments(self) -> Vec<Assignment>;
}

impl IntoAssignments for Assignment {
    fn into_assignments(self) -> Vec<Assignment> {
        vec![self]
    }
}

impl IntoAssignments for Vec<Assignment> {
    fn into_assignments(self) -> Vec<Assignment> {
        self
    }
}

macro_rules! impl_into_assignments {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($name: IntoAssignments),+> IntoAssignments for ($($name,)+) {
            fn into_assignments(self) -> Vec<Assignment> {
                let ($($name,)+) = self;
                let mut assignments = Vec::new();
                $(assignments.extend($name.into_assignments());)+
                assignments
            }
        }
    };
}

impl_into_assignments!(A);
impl_into_assignments!(A, B);
impl_into_assignments!(A, B, C);
impl_into_assignments!(A, B, C, D);
impl_into_assignments!(A, B, C, D, E);
impl_into_assignments!(A, B, C, D, E, F);
impl_into_assignments!(A, B, C, D, E, F, G);
impl_into_assignments!(A, B, C, D, E, F, G, H);

/// The full column list of a table, for `select(all_of(foo))`.
#[derive(Debug, Clone)]
pub struct AllOf {
    table: Name,
    fields: Vec<FieldSpec>,
}

impl AllOf {
    /// The table's name.
    #[must_use]
    pub const fn table(&self) -> Name {
        self.table
    }

    /// The column shapes in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// The columns as qualified column-reference expressions.
    #[must_use]
    pub fn column_exprs(&self) -> Vec<Expr> {
        self.fields
            .iter()
            .map(|field| {
                Expr::Column(ColumnRef {
                    table: self.table,
                    name: field.name,
                    value_type: field.value_type,
                    nullable: field.nullable,
                })
            })
            .collect()
    }
}

/// Expands to every column of the table, in declaration order.
pub fn all_of<T: Table>(_table: T) -> AllOf {
    AllOf {
        table: T::NAME,
        fields: T::field_specs(),
    }
}

/// A placeholder derived from a column: same name, same value kind, same
/// nullability.
pub fn parameter<C: Column>(_column: C) -> TypedExpr<C::Kind> {
    TypedExpr::wrap(Expr::Parameter {
        name: C::NAME.text(),
        value_type: <C::Kind as ValueKind>::VALUE_TYPE,
        nullable: C::CAN_BE_NULL,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::typed::ExprOps;
    use crate::types::{Integral, Text, ValueType};

    #[derive(Debug, Clone, Copy)]
    struct TabFoo;

    impl Table for TabFoo {
        const NAME: Name = Name::new("tab_foo");

        fn field_specs() -> Vec<FieldSpec> {
            vec![
                FieldSpec {
                    name: Name::new("omega"),
                    value_type: ValueType::Integral,
                    nullable: false,
                },
                FieldSpec {
                    name: Name::new("beta"),
                    value_type: ValueType::Text,
                    nullable: true,
                },
            ]
        }

        fn required_insert_columns() -> &'static [Name] {
            const COLUMNS: &[Name] = &[Name::new("omega")];
            COLUMNS
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Omega;

    impl Column for Omega {
        type Table = TabFoo;
        type Kind = Integral;

        const NAME: Name = Name::new("omega");
    }

    #[derive(Debug, Clone, Copy)]
    struct Beta;

    impl Column for Beta {
        type Table = TabFoo;
        type Kind = Text;

        const NAME: Name = Name::new("beta");
        const CAN_BE_NULL: bool = true;
    }

    impl NullableColumn for Beta {}

    #[test]
    fn test_column_serializes_table_qualified() {
        let expr = Omega.eq(17_i64);
        assert_eq!(
            expr.expr().to_sql(&AnsiDialect::new()),
            "tab_foo.omega = 17"
        );
    }

    #[test]
    fn test_alias_requalifies_columns() {
        let left = TabFoo.alias("l");
        let expr = left.column(Omega).gt(Omega);
        assert_eq!(
            expr.expr().to_sql(&AnsiDialect::new()),
            "l.omega > tab_foo.omega"
        );
    }

    #[test]
    fn test_assignment_serialization() {
        let assignment = Omega.assign(17_i64);
        assert_eq!(assignment.to_sql(&AnsiDialect::new()), "omega=17");

        let null = Beta.assign_null();
        assert_eq!(null.to_sql(&AnsiDialect::new()), "beta=NULL");
    }

    #[test]
    fn test_parameter_copies_column_facts() {
        let param = parameter(Beta);
        match param.expr() {
            Expr::Parameter {
                name,
                value_type,
                nullable,
            } => {
                assert_eq!(*name, "beta");
                assert_eq!(*value_type, ValueType::Text);
                assert!(*nullable);
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_all_of_expands_in_declaration_order() {
        let all = all_of(TabFoo);
        let exprs = all.column_exprs();
        assert_eq!(exprs.len(), 2);
        assert_eq!(exprs[0].to_sql(&AnsiDialect::new()), "tab_foo.omega");
        assert_eq!(exprs[1].to_sql(&AnsiDialect::new()), "tab_foo.beta");
    }
}
