//! The typed expression facade.
//!
//! [`TypedExpr<K>`] wraps an untyped [`Expr`] node with a compile-time
//! value-kind tag. Operators are only offered where the operand kinds are
//! compatible, so an ill-typed expression (text plus integer, LIKE on a
//! number, AND on non-booleans) is not constructible: there is no runtime
//! object representing the invalid expression.

use core::marker::PhantomData;

use crate::check::Inconsistency;
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::statement::select::SelectStatement;
use crate::types::{
    Boolean, ComparableWith, Negate, Numeric, Promote, PromoteSub, Textual, ValueKind,
};
use crate::value::Value;

/// An expression tagged with its value kind `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr<K: ValueKind> {
    node: Expr,
    _kind: PhantomData<K>,
}

impl<K: ValueKind> TypedExpr<K> {
    /// Wraps an untyped node. Callers guarantee the node's runtime value
    /// type matches `K`; everything in this crate that constructs nodes
    /// does.
    #[must_use]
    pub(crate) const fn wrap(node: Expr) -> Self {
        Self {
            node,
            _kind: PhantomData,
        }
    }

    /// Returns the untyped node.
    #[must_use]
    pub fn into_expr(self) -> Expr {
        self.node
    }

    /// Returns a reference to the untyped node.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.node
    }
}

/// Conversion into a typed expression of kind `K`.
///
/// Implemented by typed expressions themselves, by column descriptor
/// types, and by Rust values that map onto a SQL value category
/// (`i64` is integral, `&str` is text, ...).
pub trait IntoTyped<K: ValueKind> {
    /// Converts `self` into a typed expression node.
    fn into_typed(self) -> TypedExpr<K>;
}

impl<K: ValueKind> IntoTyped<K> for TypedExpr<K> {
    fn into_typed(self) -> TypedExpr<K> {
        self
    }
}

macro_rules! impl_into_typed_value {
    ($($ty:ty => $kind:ty),+ $(,)?) => {
        $(impl IntoTyped<$kind> for $ty {
            fn into_typed(self) -> TypedExpr<$kind> {
                TypedExpr::wrap(Expr::Literal(Value::from(self)))
            }
        })+
    };
}

impl_into_typed_value!(
    bool => Boolean,
    i8 => crate::types::Integral,
    i16 => crate::types::Integral,
    i32 => crate::types::Integral,
    i64 => crate::types::Integral,
    u8 => crate::types::UnsignedIntegral,
    u16 => crate::types::UnsignedIntegral,
    u32 => crate::types::UnsignedIntegral,
    u64 => crate::types::UnsignedIntegral,
    f32 => crate::types::FloatingPoint,
    f64 => crate::types::FloatingPoint,
    &str => crate::types::Text,
    String => crate::types::Text,
    Vec<u8> => crate::types::Blob,
    chrono::NaiveDate => crate::types::DayPoint,
    chrono::NaiveDateTime => crate::types::TimePoint,
    chrono::NaiveTime => crate::types::TimeOfDay,
);

/// Lifts a Rust value into a typed literal expression.
///
/// `value(false)` is a boolean literal; `value(19)` is integral.
pub fn value<K: ValueKind, T: IntoTyped<K>>(v: T) -> TypedExpr<K> {
    v.into_typed()
}

/// Wraps an expression in a dynamic element: `included` decides, at the
/// point of statement construction, whether the wrapped expression takes
/// part. Excluded boolean operands reduce away; excluded select columns
/// serialize as a NULL substitute to keep the result shape stable.
pub fn dynamic<K: ValueKind, T: IntoTyped<K>>(included: bool, inner: T) -> TypedExpr<K> {
    TypedExpr::wrap(Expr::Dynamic {
        included,
        inner: Box::new(inner.into_typed().into_expr()),
    })
}

/// Creates a named, typed placeholder.
///
/// Most parameters are derived from a column via
/// [`parameter`](crate::schema::parameter), which copies the column's
/// name, type and nullability; this is the escape hatch for free-standing
/// placeholders.
pub fn typed_parameter<K: ValueKind>(name: &'static str) -> TypedExpr<K> {
    TypedExpr::wrap(Expr::Parameter {
        name,
        value_type: K::VALUE_TYPE,
        nullable: false,
    })
}

/// `EXISTS (SELECT ...)`.
///
/// The embedded select's clause-local rules are validated here. Tables
/// and CTEs the sub-select references but does not provide itself leak
/// into the surrounding statement as requirements, so a correlated
/// sub-select checks out once the outer FROM provides the table.
pub fn exists(select: SelectStatement) -> Result<TypedExpr<Boolean>, Inconsistency> {
    select.check_clauses()?;
    Ok(TypedExpr::wrap(Expr::Exists(Box::new(select))))
}

/// A scalar sub-select: `(SELECT ...)` usable wherever a value of kind
/// `K` is. Validated like [`exists`], plus the select must produce
/// exactly one column whose value type matches `K`.
pub fn scalar<K: ValueKind>(select: SelectStatement) -> Result<TypedExpr<K>, Inconsistency> {
    select.check_clauses()?;
    let row = select.row_spec();
    let [field] = row.fields() else {
        return Err(Inconsistency::ScalarSubqueryShape);
    };
    if field.value_type != K::VALUE_TYPE {
        return Err(Inconsistency::ScalarSubqueryTypeMismatch);
    }
    Ok(TypedExpr::wrap(Expr::Subquery(Box::new(select))))
}

/// Operator methods available on every typed expression-like value.
///
/// The blanket implementation covers typed expressions, column
/// descriptors and plain Rust values alike, so `foo.omega().eq(17)` and
/// `value(17).eq(foo.omega())` both work.
pub trait ExprOps<K: ValueKind>: IntoTyped<K> + Sized {
    /// `self = rhs`
    fn eq<R: ValueKind + ComparableWith<K>, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::Eq, rhs)
    }

    /// `self <> rhs`
    fn ne<R: ValueKind + ComparableWith<K>, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::Ne, rhs)
    }

    /// `self < rhs`
    fn lt<R: ValueKind + ComparableWith<K>, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::Lt, rhs)
    }

    /// `self <= rhs`
    fn le<R: ValueKind + ComparableWith<K>, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::Le, rhs)
    }

    /// `self > rhs`
    fn gt<R: ValueKind + ComparableWith<K>, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::Gt, rhs)
    }

    /// `self >= rhs`
    fn ge<R: ValueKind + ComparableWith<K>, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::Ge, rhs)
    }

    /// `self IS NULL`
    fn is_null(self) -> TypedExpr<Boolean> {
        TypedExpr::wrap(Expr::IsNull {
            operand: Box::new(self.into_typed().into_expr()),
            negated: false,
        })
    }

    /// `self IS NOT NULL`
    fn is_not_null(self) -> TypedExpr<Boolean> {
        TypedExpr::wrap(Expr::IsNull {
            operand: Box::new(self.into_typed().into_expr()),
            negated: true,
        })
    }

    /// `self IN(args)` with a tuple of (possibly differently carried)
    /// operands of one compatible kind: `omega.in_((17, bar.alpha(), value(19)))`.
    fn in_<R, Args>(self, args: Args) -> TypedExpr<Boolean>
    where
        R: ValueKind + ComparableWith<K>,
        Args: ExprList<R>,
    {
        TypedExpr::wrap(Expr::In {
            operand: Box::new(self.into_typed().into_expr()),
            args: args.into_exprs(),
            negated: false,
        })
    }

    /// `self NOT IN(args)` with a tuple of operands.
    fn not_in_<R, Args>(self, args: Args) -> TypedExpr<Boolean>
    where
        R: ValueKind + ComparableWith<K>,
        Args: ExprList<R>,
    {
        TypedExpr::wrap(Expr::In {
            operand: Box::new(self.into_typed().into_expr()),
            args: args.into_exprs(),
            negated: true,
        })
    }

    /// `self IN(args)`. An empty list is well-formed and serializes to
    /// the dialect's always-false literal.
    fn in_values<R, T>(self, args: impl IntoIterator<Item = T>) -> TypedExpr<Boolean>
    where
        R: ValueKind + ComparableWith<K>,
        T: IntoTyped<R>,
    {
        TypedExpr::wrap(Expr::In {
            operand: Box::new(self.into_typed().into_expr()),
            args: args
                .into_iter()
                .map(|arg| arg.into_typed().into_expr())
                .collect(),
            negated: false,
        })
    }

    /// `self NOT IN(args)`. An empty list serializes to the always-true
    /// literal.
    fn not_in_values<R, T>(self, args: impl IntoIterator<Item = T>) -> TypedExpr<Boolean>
    where
        R: ValueKind + ComparableWith<K>,
        T: IntoTyped<R>,
    {
        TypedExpr::wrap(Expr::In {
            operand: Box::new(self.into_typed().into_expr()),
            args: args
                .into_iter()
                .map(|arg| arg.into_typed().into_expr())
                .collect(),
            negated: true,
        })
    }

    /// `self BETWEEN low AND high`
    fn between<R, L, H>(self, low: L, high: H) -> TypedExpr<Boolean>
    where
        R: ValueKind + ComparableWith<K>,
        L: IntoTyped<R>,
        H: IntoTyped<R>,
    {
        TypedExpr::wrap(Expr::Between {
            operand: Box::new(self.into_typed().into_expr()),
            low: Box::new(low.into_typed().into_expr()),
            high: Box::new(high.into_typed().into_expr()),
            negated: false,
        })
    }

    /// Names the expression for use in a select list: `self AS name`.
    fn as_(self, name: &'static str) -> crate::clause::select_columns::AliasedExpr {
        crate::clause::select_columns::AliasedExpr::new(
            crate::name::Name::new(name),
            self.into_typed().into_expr(),
        )
    }
}

impl<K: ValueKind, T: IntoTyped<K>> ExprOps<K> for T {}

/// Boolean-only combinators.
pub trait BooleanOps: IntoTyped<Boolean> + Sized {
    /// `self AND rhs`
    fn and<T: IntoTyped<Boolean>>(self, rhs: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::And, rhs)
    }

    /// `self OR rhs`
    fn or<T: IntoTyped<Boolean>>(self, rhs: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::Or, rhs)
    }

    /// `NOT self`
    fn not(self) -> TypedExpr<Boolean> {
        TypedExpr::wrap(Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self.into_typed().into_expr()),
        })
    }
}

impl<T: IntoTyped<Boolean>> BooleanOps for T {}

/// Arithmetic on the numeric kinds, with the promotion rules of the value
/// type system (float is contagious; subtraction of unsigned operands
/// yields signed).
pub trait NumericOps<K: Numeric>: IntoTyped<K> + Sized {
    /// `self + rhs`
    fn add<R: Numeric, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<<K as Promote<R>>::Output>
    where
        K: Promote<R>,
    {
        binary(self, BinaryOp::Add, rhs)
    }

    /// `self - rhs`
    fn sub<R: Numeric, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<<K as PromoteSub<R>>::Output>
    where
        K: PromoteSub<R>,
    {
        binary(self, BinaryOp::Sub, rhs)
    }

    /// `self * rhs`
    fn mul<R: Numeric, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<<K as Promote<R>>::Output>
    where
        K: Promote<R>,
    {
        binary(self, BinaryOp::Mul, rhs)
    }

    /// `self / rhs`
    fn div<R: Numeric, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<<K as Promote<R>>::Output>
    where
        K: Promote<R>,
    {
        binary(self, BinaryOp::Div, rhs)
    }

    /// `self % rhs`, following the same promotion as the other arithmetic
    /// operators.
    fn modulo<R: Numeric, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<<K as Promote<R>>::Output>
    where
        K: Promote<R>,
    {
        binary(self, BinaryOp::Mod, rhs)
    }

    /// `-self`
    fn neg(self) -> TypedExpr<<K as Negate>::Output>
    where
        K: Negate,
    {
        TypedExpr::wrap(Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(self.into_typed().into_expr()),
        })
    }
}

impl<K: Numeric, T: IntoTyped<K>> NumericOps<K> for T {}

/// Text-only operators.
pub trait TextOps<K: Textual>: IntoTyped<K> + Sized {
    /// `self || rhs`
    fn concat<R: Textual, T: IntoTyped<R>>(self, rhs: T) -> TypedExpr<crate::types::Text> {
        binary(self, BinaryOp::Concat, rhs)
    }

    /// `self LIKE pattern`
    fn like<T: IntoTyped<crate::types::Text>>(self, pattern: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::Like, pattern)
    }

    /// `self NOT LIKE pattern`
    fn not_like<T: IntoTyped<crate::types::Text>>(self, pattern: T) -> TypedExpr<Boolean> {
        binary(self, BinaryOp::NotLike, pattern)
    }
}

impl<K: Textual, T: IntoTyped<K>> TextOps<K> for T {}

/// A heterogeneously carried, homogeneously kinded expression list, used
/// for IN argument tuples.
pub trait ExprList<K: ValueKind> {
    /// Converts the list into untyped nodes in order.
    fn into_exprs(self) -> Vec<Expr>;
}

macro_rules! impl_expr_list {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<K: ValueKind, $($name: IntoTyped<K>),+> ExprList<K> for ($($name,)+) {
            fn into_exprs(self) -> Vec<Expr> {
                let ($($name,)+) = self;
                vec![$($name.into_typed().into_expr()),+]
            }
        }
    };
}

impl_expr_list!(A);
impl_expr_list!(A, B);
impl_expr_list!(A, B, C);
impl_expr_list!(A, B, C, D);
impl_expr_list!(A, B, C, D, E);
impl_expr_list!(A, B, C, D, E, F);
impl_expr_list!(A, B, C, D, E, F, G);
impl_expr_list!(A, B, C, D, E, F, G, H);

fn binary<LK, RK, Out, L, R>(left: L, op: BinaryOp, right: R) -> TypedExpr<Out>
where
    LK: ValueKind,
    RK: ValueKind,
    Out: ValueKind,
    L: IntoTyped<LK>,
    R: IntoTyped<RK>,
{
    TypedExpr::wrap(Expr::Binary {
        left: Box::new(left.into_typed().into_expr()),
        op,
        right: Box::new(right.into_typed().into_expr()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::serialize::Serialize;
    use crate::types::ValueType;

    #[test]
    fn test_literal_kinds() {
        assert_eq!(value(17_i64).expr().value_type(), ValueType::Integral);
        assert_eq!(
            value(17_u64).expr().value_type(),
            ValueType::UnsignedIntegral
        );
        assert_eq!(value(false).expr().value_type(), ValueType::Boolean);
        assert_eq!(value("fred").expr().value_type(), ValueType::Text);
    }

    #[test]
    fn test_numeric_promotion_types() {
        // unsigned - float is floating point
        let diff = value(3_u64).sub(2.5_f64);
        assert_eq!(diff.expr().value_type(), ValueType::FloatingPoint);

        // unsigned - unsigned is signed integral
        let diff = value(3_u64).sub(2_u64);
        assert_eq!(diff.expr().value_type(), ValueType::Integral);

        // integral + integral stays integral
        let sum = value(3_i64).add(2_i64);
        assert_eq!(sum.expr().value_type(), ValueType::Integral);

        // negating unsigned is signed
        let neg = value(3_u64).neg();
        assert_eq!(neg.expr().value_type(), ValueType::Integral);
    }

    #[test]
    fn test_boolean_combinators() {
        let expr = value(true).and(value(false).or(true));
        assert_eq!(expr.to_sql_string(), "TRUE AND (FALSE OR TRUE)");
    }

    #[test]
    fn test_arithmetic_serialization() {
        let expr = value(2_i64).add(3_i64).mul(4_i64);
        assert_eq!(expr.to_sql_string(), "(2 + 3) * 4");
    }

    #[test]
    fn test_comparison_across_numeric_kinds() {
        let expr = value(2_u64).lt(3.5_f64);
        assert_eq!(expr.expr().value_type(), ValueType::Boolean);
        assert_eq!(expr.to_sql_string(), "2 < 3.5");
    }

    #[test]
    fn test_like_and_concat() {
        let expr = value("a").concat("b").like("ab%");
        assert_eq!(expr.to_sql_string(), "('a' || 'b') LIKE 'ab%'");
    }

    #[test]
    fn test_parameter_expression() {
        let expr = typed_parameter::<crate::types::Integral>("min_age").le(65_i64);
        assert_eq!(expr.to_sql_string(), "? <= 65");
    }

    impl<K: ValueKind> TypedExpr<K> {
        fn to_sql_string(&self) -> String {
            self.expr().to_sql(&AnsiDialect::new())
        }
    }
}
