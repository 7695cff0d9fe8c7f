//! Tests for INSERT, UPDATE and DELETE statements.

mod common;
use common::*;

use ferric_sql_core::check::Inconsistency;
use ferric_sql_core::prelude::*;
use ferric_sql_core::statement::InsertVerb;

// ===================================================================
// INSERT
// ===================================================================

#[test]
fn insert_serializes_columns_and_values() {
    let statement = insert_into(TabBarTable).set((
        TabBar::bool_nn().assign(true),
        TabBar::gamma().assign(17_i64),
    ));
    assert_sql(
        &statement,
        "INSERT INTO tab_bar (bool_nn,gamma) VALUES(TRUE,17)",
    );
}

#[test]
fn insert_default_and_null_assignments() {
    let statement = insert_into(TabBarTable).set((
        TabBar::bool_nn().assign(true),
        TabBar::gamma().assign_default(),
        TabBar::name().assign_null(),
    ));
    assert_sql(
        &statement,
        "INSERT INTO tab_bar (bool_nn,gamma,name) VALUES(TRUE,DEFAULT,NULL)",
    );
}

#[test]
fn multi_row_insert() {
    let statement = insert_into(TabBarTable)
        .set(TabBar::bool_nn().assign(true))
        .add_row(TabBar::bool_nn().assign(false));
    assert_sql(
        &statement,
        "INSERT INTO tab_bar (bool_nn) VALUES(TRUE),(FALSE)",
    );
}

#[test]
fn mismatched_value_rows_fail() {
    let statement = insert_into(TabBarTable)
        .set(TabBar::bool_nn().assign(true))
        .add_row((TabBar::bool_nn().assign(false), TabBar::gamma().assign(1_i64)));
    assert_inconsistent(&statement, &Inconsistency::MismatchedValueRow);
}

#[test]
fn insert_default_values() {
    let statement = insert_into(TabBarTable).default_values();
    assert_sql(&statement, "INSERT INTO tab_bar DEFAULT VALUES");
}

#[test]
fn insert_without_assignments_fails() {
    let statement = insert_into(TabBarTable);
    assert_inconsistent(&statement, &Inconsistency::EmptySetClause);
}

#[test]
fn missing_required_column_fails() {
    let statement = insert_into(TabBarTable).set(TabBar::gamma().assign(1_i64));
    assert_inconsistent(
        &statement,
        &Inconsistency::MissingRequiredInsertColumn("bool_nn"),
    );
}

#[test]
fn duplicate_insert_column_fails() {
    let statement = insert_into(TabBarTable).set((
        TabBar::bool_nn().assign(true),
        TabBar::bool_nn().assign(false),
    ));
    assert_inconsistent(&statement, &Inconsistency::DuplicateAssignment("bool_nn"));
}

#[test]
fn assignments_for_another_table_fail() {
    let statement = insert_into(TabBarTable).set(TabFoo::omega().assign(1_i64));
    assert_inconsistent(
        &statement,
        &Inconsistency::WrongAssignmentTable("tab_bar"),
    );
}

#[test]
fn insert_or_ignore_and_or_replace_verbs() {
    let base = insert_into(TabBarTable).set(TabBar::bool_nn().assign(true));
    assert_sql(
        &base.clone().verb(InsertVerb::OrIgnore),
        "INSERT OR IGNORE INTO tab_bar (bool_nn) VALUES(TRUE)",
    );
    assert_sql(
        &base.verb(InsertVerb::OrReplace),
        "INSERT OR REPLACE INTO tab_bar (bool_nn) VALUES(TRUE)",
    );
}

#[test]
fn insert_returning() {
    let statement = insert_into(TabBarTable)
        .set(TabBar::bool_nn().assign(true))
        .returning(TabBar::alpha());
    assert!(statement.has_returning());
    assert_sql(
        &statement,
        "INSERT INTO tab_bar (bool_nn) VALUES(TRUE) RETURNING tab_bar.alpha",
    );
    let row = statement.row_spec();
    assert_eq!(row.len(), 1);
    assert_eq!(row.fields()[0].name.text(), "alpha");
}

#[test]
fn insert_parameters_follow_assignment_order() {
    let statement = insert_into(TabBarTable).set((
        TabBar::bool_nn().assign(parameter(TabBar::bool_nn())),
        TabBar::gamma().assign(parameter(TabBar::gamma())),
    ));
    let params = statement.parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "bool_nn");
    assert_eq!(params[1].name, "gamma");
    assert_eq!(
        sql(&statement),
        "INSERT INTO tab_bar (bool_nn,gamma) VALUES(?,?)"
    );
}

// ===================================================================
// UPDATE
// ===================================================================

#[test]
fn update_serializes() {
    let statement = update(TabBarTable)
        .set(TabBar::gamma().assign(42_i64))
        .where_(TabBar::bool_nn().eq(true));
    assert_sql(
        &statement,
        "UPDATE tab_bar SET gamma=42 WHERE tab_bar.bool_nn = TRUE",
    );
}

#[test]
fn update_multiple_assignments() {
    let statement = update(TabBarTable)
        .set((TabBar::gamma().assign(1_i64), TabBar::name().assign("x")))
        .where_(TabBar::alpha().eq(1_i64));
    assert_sql(
        &statement,
        "UPDATE tab_bar SET gamma=1,name='x' WHERE tab_bar.alpha = 1",
    );
}

#[test]
fn update_with_expression_value_parenthesizes() {
    let statement = update(TabBarTable)
        .set(TabBar::gamma().assign(TabBar::gamma().add(1_i64)))
        .where_(TabBar::alpha().eq(1_i64));
    assert_sql(
        &statement,
        "UPDATE tab_bar SET gamma=(tab_bar.gamma + 1) WHERE tab_bar.alpha = 1",
    );
}

#[test]
fn update_without_where_fails() {
    let statement = update(TabBarTable).set(TabBar::gamma().assign(1_i64));
    assert_inconsistent(&statement, &Inconsistency::UnguardedWhere);
}

#[test]
fn unconditional_update_affects_all_rows() {
    let statement = update(TabBarTable)
        .set(TabBar::gamma().assign(1_i64))
        .unconditionally();
    assert_sql(&statement, "UPDATE tab_bar SET gamma=1");
}

#[test]
fn update_of_frozen_column_fails() {
    let statement = update(TabBarTable)
        .set(TabBar::tag().assign("v2"))
        .where_(TabBar::alpha().eq(1_i64));
    assert_inconsistent(&statement, &Inconsistency::ColumnMustNotBeUpdated("tag"));
}

#[test]
fn update_returning() {
    let statement = update(TabBarTable)
        .set(TabBar::gamma().assign(1_i64))
        .where_(TabBar::alpha().eq(1_i64))
        .returning((TabBar::alpha(), TabBar::gamma()));
    assert!(statement.has_returning());
    assert_sql(
        &statement,
        "UPDATE tab_bar SET gamma=1 WHERE tab_bar.alpha = 1 \
         RETURNING tab_bar.alpha,tab_bar.gamma",
    );
}

// ===================================================================
// DELETE
// ===================================================================

#[test]
fn delete_serializes() {
    let statement = delete_from(TabBarTable).where_(TabBar::gamma().is_null());
    assert_sql(&statement, "DELETE FROM tab_bar WHERE tab_bar.gamma IS NULL");
}

#[test]
fn delete_without_where_fails() {
    let statement = delete_from(TabBarTable);
    assert_inconsistent(&statement, &Inconsistency::UnguardedWhere);
}

#[test]
fn unconditional_delete_affects_all_rows() {
    let statement = delete_from(TabBarTable).unconditionally();
    assert_sql(&statement, "DELETE FROM tab_bar");
}

#[test]
fn delete_using_provides_the_extra_table() {
    let statement = delete_from(TabBarTable)
        .using(TabFooTable)
        .where_(TabBar::alpha().eq(TabFoo::omega()));
    assert_sql(
        &statement,
        "DELETE FROM tab_bar USING tab_foo WHERE tab_bar.alpha = tab_foo.omega",
    );
}

#[test]
fn delete_condition_on_foreign_table_fails_without_using() {
    let statement = delete_from(TabBarTable).where_(TabBar::alpha().eq(TabFoo::omega()));
    assert_inconsistent(
        &statement,
        &Inconsistency::RequiredTableNotProvided("tab_foo"),
    );
}

#[test]
fn delete_returning() {
    let statement = delete_from(TabBarTable)
        .where_(TabBar::gamma().is_null())
        .returning(TabBar::alpha());
    assert!(statement.has_returning());
    assert_sql(
        &statement,
        "DELETE FROM tab_bar WHERE tab_bar.gamma IS NULL RETURNING tab_bar.alpha",
    );
}

// ===================================================================
// Parameter binding end to end
// ===================================================================

#[test]
fn bind_values_in_placeholder_order() {
    let statement = update(TabBarTable)
        .set(TabBar::gamma().assign(parameter(TabBar::gamma())))
        .where_(TabBar::alpha().eq(parameter(TabBar::alpha())));
    let mut params = statement.parameter_set();
    assert!(!params.is_fully_bound());
    params.set("gamma", 7_i64).expect("gamma binds");
    params.set("alpha", 3_i64).expect("alpha binds");
    assert!(params.is_fully_bound());
    assert_eq!(
        params.values().expect("fully bound"),
        vec![Value::Int(7), Value::Int(3)]
    );
}

#[test]
fn binding_validates_declarations() {
    use ferric_sql_core::params::BindError;

    let statement = update(TabBarTable)
        .set(TabBar::gamma().assign(parameter(TabBar::gamma())))
        .where_(TabBar::alpha().eq(parameter(TabBar::alpha())));
    let mut params = statement.parameter_set();
    assert_eq!(
        params.set("nope", 1_i64),
        Err(BindError::UnknownParameter("nope".to_owned()))
    );
    assert_eq!(
        params.set("alpha", "text"),
        Err(BindError::TypeMismatch("alpha".to_owned()))
    );
    // gamma is nullable, alpha is not.
    params.set("gamma", Value::Null).expect("gamma permits NULL");
    assert_eq!(
        params.set("alpha", Value::Null),
        Err(BindError::NullNotPermitted("alpha".to_owned()))
    );
    assert_eq!(
        params.values(),
        Err(BindError::Unbound("alpha".to_owned()))
    );
    params.set("alpha", 1_i64).expect("alpha binds");
    params.reset();
    assert!(!params.is_fully_bound());
}
