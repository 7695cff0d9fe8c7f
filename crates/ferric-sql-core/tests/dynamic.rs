//! Tests for dynamic statement parts: runtime-included expressions whose
//! exclusion keeps the statement well-formed and the result shape stable.

mod common;
use common::*;

use ferric_sql_core::check::Inconsistency;
use ferric_sql_core::prelude::*;
use ferric_sql_core::types::Integral;

// ===================================================================
// Dynamic select columns
// ===================================================================

#[test]
fn excluded_select_column_substitutes_null() {
    let statement =
        select((TabFoo::omega(), dynamic(false, TabFoo::beta()))).from(TabFooTable);
    assert_sql(
        &statement,
        "SELECT tab_foo.omega,NULL AS beta FROM tab_foo",
    );
}

#[test]
fn included_select_column_serializes_normally() {
    let statement =
        select((TabFoo::omega(), dynamic(true, TabFoo::beta()))).from(TabFooTable);
    assert_sql(
        &statement,
        "SELECT tab_foo.omega,tab_foo.beta FROM tab_foo",
    );
}

#[test]
fn row_shape_is_stable_across_inclusion() {
    let included = select((TabFoo::omega(), dynamic(true, TabFoo::omega()).as_("o2")))
        .from(TabFooTable);
    let excluded = select((TabFoo::omega(), dynamic(false, TabFoo::omega()).as_("o2")))
        .from(TabFooTable);
    let a = included.row_spec();
    let b = excluded.row_spec();
    assert_eq!(a.len(), b.len());
    assert_eq!(a.fields()[1].name, b.fields()[1].name);
    // The substitute NULL makes the excluded slot nullable.
    assert!(!a.fields()[1].nullable);
    assert!(b.fields()[1].nullable);
}

// ===================================================================
// Dynamic conditions
// ===================================================================

#[test]
fn excluded_operand_reduces_away() {
    let statement = select(TabFoo::omega()).from(TabFooTable).where_(
        TabFoo::omega()
            .eq(1_i64)
            .and(dynamic(false, TabFoo::beta().is_null())),
    );
    assert_sql(
        &statement,
        "SELECT tab_foo.omega FROM tab_foo WHERE tab_foo.omega = 1",
    );
}

#[test]
fn excluded_left_operand_leaves_the_right() {
    let statement = select(TabFoo::omega()).from(TabFooTable).where_(
        dynamic(false, TabFoo::beta().is_null()).or(TabFoo::omega().eq(1_i64)),
    );
    assert_sql(
        &statement,
        "SELECT tab_foo.omega FROM tab_foo WHERE tab_foo.omega = 1",
    );
}

#[test]
fn fully_excluded_condition_drops_the_clause() {
    let statement = select(TabFoo::omega())
        .from(TabFooTable)
        .where_(dynamic(false, TabFoo::omega().eq(1_i64)));
    assert_sql(&statement, "SELECT tab_foo.omega FROM tab_foo");
}

#[test]
fn excluded_parts_still_require_their_tables() {
    // The statement must be well-formed for every runtime shape, so an
    // excluded condition's table reference still counts.
    let statement = select(TabFoo::omega()).from(TabFooTable).where_(
        dynamic(false, TabBar::alpha().eq(1_i64)).or(TabFoo::omega().gt(0_i64)),
    );
    assert_inconsistent(
        &statement,
        &Inconsistency::RequiredTableNotProvided("tab_bar"),
    );
}

// ===================================================================
// Dynamic grouping and ordering
// ===================================================================

#[test]
fn excluded_group_by_term_is_skipped() {
    let statement = select((TabFoo::beta(), count_all().as_("n")))
        .from(TabFooTable)
        .group_by((TabFoo::beta(), dynamic(false, TabFoo::omega())));
    assert_sql(
        &statement,
        "SELECT tab_foo.beta,COUNT(*) AS n FROM tab_foo GROUP BY tab_foo.beta",
    );
}

#[test]
fn excluded_order_term_is_skipped() {
    let statement = select(TabFoo::omega())
        .from(TabFooTable)
        .order_by((TabFoo::omega().desc(), dynamic(false, TabFoo::beta()).asc()));
    assert_sql(
        &statement,
        "SELECT tab_foo.omega FROM tab_foo ORDER BY tab_foo.omega DESC",
    );
}

#[test]
fn all_order_terms_excluded_drops_the_clause() {
    let statement = select(TabFoo::omega())
        .from(TabFooTable)
        .order_by(dynamic(false, TabFoo::omega()).asc());
    assert_sql(&statement, "SELECT tab_foo.omega FROM tab_foo");
}

// ===================================================================
// Dynamic parameters
// ===================================================================

#[test]
fn pruned_parameters_are_not_collected() {
    let statement = select(TabFoo::omega()).from(TabFooTable).where_(
        TabFoo::omega()
            .ge(typed_parameter::<Integral>("min"))
            .and(dynamic(
                false,
                TabFoo::omega().le(typed_parameter::<Integral>("max")),
            )),
    );
    let params = statement.parameters();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "min");
}

#[test]
fn included_parameters_are_collected() {
    let statement = select(TabFoo::omega()).from(TabFooTable).where_(
        TabFoo::omega()
            .ge(typed_parameter::<Integral>("min"))
            .and(dynamic(
                true,
                TabFoo::omega().le(typed_parameter::<Integral>("max")),
            )),
    );
    let params = statement.parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params[1].name, "max");
}
