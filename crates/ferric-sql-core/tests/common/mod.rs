#![allow(dead_code)]

use ferric_sql_core::check::Inconsistency;
use ferric_sql_core::dialect::AnsiDialect;
use ferric_sql_core::expr::typed::TypedExpr;
use ferric_sql_core::serialize::Serialize;
use ferric_sql_core::statement::Statement;
use ferric_sql_core::types::ValueKind;
use ferric_sql_derive::Table;

/// Rows of `tab_foo`.
#[derive(Table)]
#[table(name = "tab_foo")]
pub struct TabFoo {
    pub omega: i64,
    pub beta: Option<String>,
    pub psi: u64,
    pub chi: f64,
    pub day: Option<chrono::NaiveDate>,
}

/// Rows of `tab_bar`.
#[derive(Table)]
#[table(name = "tab_bar")]
pub struct TabBar {
    #[column(auto_increment)]
    pub alpha: i64,
    pub bool_nn: bool,
    #[column(default)]
    pub gamma: Option<i64>,
    pub name: Option<String>,
    #[column(no_update)]
    pub tag: Option<String>,
}

pub fn ansi() -> AnsiDialect {
    AnsiDialect::new()
}

pub fn sql<S: Statement>(statement: &S) -> String {
    statement.to_sql_string(&AnsiDialect::new())
}

pub fn expr_sql<K: ValueKind>(expr: TypedExpr<K>) -> String {
    expr.into_expr().to_sql(&AnsiDialect::new())
}

pub fn assert_sql<S: Statement>(statement: &S, expected: &str) {
    if let Err(problem) = statement.check() {
        panic!("Statement failed its consistency check: {problem}\nExpected SQL: {expected}");
    }
    let actual = sql(statement);
    assert_eq!(actual, expected, "serialized SQL does not match");
}

pub fn assert_inconsistent<S: Statement>(statement: &S, expected: &Inconsistency) {
    match statement.check() {
        Ok(()) => panic!(
            "Expected consistency violation '{expected}', but the check passed\nSQL: {}",
            sql(statement)
        ),
        Err(actual) => assert_eq!(&actual, expected, "wrong consistency violation"),
    }
}
