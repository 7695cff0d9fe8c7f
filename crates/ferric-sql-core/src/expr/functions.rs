//! Aggregate and scalar SQL functions.
//!
//! Aggregate calls mark the expression tree as aggregate-bearing, which
//! the consistency check uses to enforce aggregate context (GROUP BY
//! membership, no nested aggregates).

use crate::expr::typed::{IntoTyped, TypedExpr};
use crate::expr::{Expr, FuncCall, NullPolicy};
use crate::types::{FloatingPoint, Integral, Numeric, Text, Textual, ValueKind};

fn func<K: ValueKind>(
    name: &'static str,
    args: Vec<Expr>,
    is_aggregate: bool,
    distinct: bool,
    null_policy: NullPolicy,
) -> TypedExpr<K> {
    TypedExpr::wrap(Expr::Func(FuncCall {
        name,
        args,
        is_aggregate,
        distinct,
        value_type: K::VALUE_TYPE,
        null_policy,
    }))
}

/// `COUNT(*)`: the row count, never NULL.
#[must_use]
pub fn count_all() -> TypedExpr<Integral> {
    func("COUNT", vec![], true, false, NullPolicy::Never)
}

/// `COUNT(expr)`: the count of non-NULL values, never NULL.
pub fn count<K: ValueKind, T: IntoTyped<K>>(expr: T) -> TypedExpr<Integral> {
    func(
        "COUNT",
        vec![expr.into_typed().into_expr()],
        true,
        false,
        NullPolicy::Never,
    )
}

/// `COUNT(DISTINCT expr)`.
pub fn count_distinct<K: ValueKind, T: IntoTyped<K>>(expr: T) -> TypedExpr<Integral> {
    func(
        "COUNT",
        vec![expr.into_typed().into_expr()],
        true,
        true,
        NullPolicy::Never,
    )
}

/// `SUM(expr)` over a numeric expression; NULL over an empty set.
pub fn sum<K: Numeric, T: IntoTyped<K>>(expr: T) -> TypedExpr<K> {
    func(
        "SUM",
        vec![expr.into_typed().into_expr()],
        true,
        false,
        NullPolicy::Always,
    )
}

/// `AVG(expr)`: always floating point; NULL over an empty set.
pub fn avg<K: Numeric, T: IntoTyped<K>>(expr: T) -> TypedExpr<FloatingPoint> {
    func(
        "AVG",
        vec![expr.into_typed().into_expr()],
        true,
        false,
        NullPolicy::Always,
    )
}

/// `MIN(expr)`; NULL over an empty set.
pub fn min<K: ValueKind, T: IntoTyped<K>>(expr: T) -> TypedExpr<K> {
    func(
        "MIN",
        vec![expr.into_typed().into_expr()],
        true,
        false,
        NullPolicy::Always,
    )
}

/// `MAX(expr)`; NULL over an empty set.
pub fn max<K: ValueKind, T: IntoTyped<K>>(expr: T) -> TypedExpr<K> {
    func(
        "MAX",
        vec![expr.into_typed().into_expr()],
        true,
        false,
        NullPolicy::Always,
    )
}

/// `LOWER(expr)`.
pub fn lower<K: Textual, T: IntoTyped<K>>(expr: T) -> TypedExpr<Text> {
    func(
        "LOWER",
        vec![expr.into_typed().into_expr()],
        false,
        false,
        NullPolicy::FromArguments,
    )
}

/// `UPPER(expr)`.
pub fn upper<K: Textual, T: IntoTyped<K>>(expr: T) -> TypedExpr<Text> {
    func(
        "UPPER",
        vec![expr.into_typed().into_expr()],
        false,
        false,
        NullPolicy::FromArguments,
    )
}

/// `TRIM(expr)`.
pub fn trim<K: Textual, T: IntoTyped<K>>(expr: T) -> TypedExpr<Text> {
    func(
        "TRIM",
        vec![expr.into_typed().into_expr()],
        false,
        false,
        NullPolicy::FromArguments,
    )
}
