//! Tests for the `#[derive(Table)]` descriptor generation.

mod common;
use common::*;

use ferric_sql_core::prelude::*;
use ferric_sql_core::types::ValueType;
use ferric_sql_derive::Table as DeriveTable;

/// No `#[table]` attribute: the name is derived from the struct name.
#[derive(DeriveTable)]
struct OrderLine {
    pub id: i64,
}

#[derive(DeriveTable)]
#[table(name = "renamed")]
struct Renamed {
    #[column(name = "value_col")]
    pub value: i64,
}

// ===================================================================
// Names
// ===================================================================

#[test]
fn table_name_comes_from_the_attribute() {
    assert_eq!(TabFooTable::table_name(), "tab_foo");
    assert_eq!(<TabBarTable as Table>::NAME.text(), "tab_bar");
}

#[test]
fn table_name_defaults_to_snake_case() {
    assert_eq!(OrderLineTable::table_name(), "order_line");
}

#[test]
fn column_name_attribute_overrides_the_field_name() {
    assert_eq!(
        <RenamedColumns::Value as ferric_sql_core::schema::Column>::NAME.text(),
        "value_col"
    );
    let specs = RenamedTable::field_specs();
    assert_eq!(specs[0].name.text(), "value_col");
}

// ===================================================================
// Field shapes
// ===================================================================

#[test]
fn field_specs_follow_declaration_order() {
    let specs = TabFooTable::field_specs();
    let names: Vec<&str> = specs.iter().map(|s| s.name.text()).collect();
    assert_eq!(names, ["omega", "beta", "psi", "chi", "day"]);
}

#[test]
fn rust_types_map_to_value_types() {
    let specs = TabFooTable::field_specs();
    assert_eq!(specs[0].value_type, ValueType::Integral);
    assert_eq!(specs[1].value_type, ValueType::Text);
    assert_eq!(specs[2].value_type, ValueType::UnsignedIntegral);
    assert_eq!(specs[3].value_type, ValueType::FloatingPoint);
    assert_eq!(specs[4].value_type, ValueType::DayPoint);
}

#[test]
fn option_fields_are_nullable() {
    let specs = TabFooTable::field_specs();
    assert!(!specs[0].nullable);
    assert!(specs[1].nullable);
    assert!(specs[4].nullable);
}

#[test]
fn write_policies_surface_as_constants() {
    assert!(TabBarColumns::Alpha::AUTO_INCREMENT);
    assert!(TabBarColumns::Alpha::HAS_DEFAULT);
    assert!(!TabBarColumns::Alpha::CAN_BE_NULL);
    assert!(TabBarColumns::Gamma::HAS_DEFAULT);
    assert!(TabBarColumns::Gamma::CAN_BE_NULL);
    assert!(TabBarColumns::Tag::MUST_NOT_UPDATE);
    assert!(!TabBarColumns::Tag::MUST_NOT_INSERT);
}

#[test]
fn required_insert_columns_skip_nullable_and_defaulted() {
    let required: Vec<&str> = TabBarTable::required_insert_columns()
        .iter()
        .map(|name| name.text())
        .collect();
    assert_eq!(required, ["bool_nn"]);

    let required: Vec<&str> = TabFooTable::required_insert_columns()
        .iter()
        .map(|name| name.text())
        .collect();
    assert_eq!(required, ["omega", "psi", "chi"]);
}

// ===================================================================
// Accessors
// ===================================================================

#[test]
fn accessors_exist_on_the_row_struct_and_the_descriptor() {
    assert_eq!(expr_sql(TabFoo::omega().into_typed()), "tab_foo.omega");
    assert_eq!(expr_sql(TabFooTable::omega().into_typed()), "tab_foo.omega");
    let _descriptor: TabFooTable = TabFoo::table();
}

#[test]
fn derived_columns_build_statements() {
    let statement = select((TabBar::alpha(), TabBar::name()))
        .from(TabBarTable)
        .where_(TabBar::bool_nn().eq(true));
    assert_sql(
        &statement,
        "SELECT tab_bar.alpha,tab_bar.name FROM tab_bar WHERE tab_bar.bool_nn = TRUE",
    );
}

#[test]
fn marker_traits_gate_special_assignments() {
    // assign_null is only offered on nullable columns, assign_default
    // only where a default is declared (auto-increment counts).
    let statement = insert_into(TabBarTable).set((
        TabBar::bool_nn().assign(true),
        TabBar::alpha().assign_default(),
        TabBar::name().assign_null(),
    ));
    assert_sql(
        &statement,
        "INSERT INTO tab_bar (bool_nn,alpha,name) VALUES(TRUE,DEFAULT,NULL)",
    );
}
