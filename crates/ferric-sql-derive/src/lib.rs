//! Derive macro for typed SQL table definitions.
//!
//! This crate provides the `#[derive(Table)]` macro for describing database
//! tables as zero-sized descriptor types with compile-time checked columns.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Ident, Lit,
    Meta, PathArguments, Type,
};

/// Derives the `Table` trait for a struct, generating type-safe column
/// descriptors.
///
/// # Attributes
///
/// - `#[table(name = "table_name")]` - Specifies the SQL table name
///   (optional, defaults to snake_case of struct name)
///
/// # Field Attributes
///
/// - `#[column(name = "column_name")]` - Specifies the SQL column name
///   (optional, defaults to field name)
/// - `#[column(nullable)]` - Marks the column as nullable (implied by an
///   `Option<T>` field type)
/// - `#[column(default)]` - Marks the column as carrying a database-side
///   default, so INSERT may omit it and assign `DEFAULT`
/// - `#[column(auto_increment)]` - Marks the column as auto-increment
///   (implies a default)
/// - `#[column(no_insert)]` - Forbids the column in INSERT set lists
/// - `#[column(no_update)]` - Forbids the column in UPDATE set lists
///
/// # Generated Items
///
/// For a struct `TabFoo`, this macro generates:
///
/// - `TabFooTable` - A zero-sized type implementing the `Table` trait
/// - `TabFooColumns` - A module containing column types (`Omega`, ...)
/// - Column accessor methods on `TabFooTable` and on `TabFoo` itself
#[proc_macro_derive(Table, attributes(table, column))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_table_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_table_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let table_name = get_table_name(&input.attrs, struct_name)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Table derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Table derive only supports structs",
            ));
        }
    };

    // Collect field information
    let mut column_infos: Vec<ColumnInfo> = Vec::new();
    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let column_attrs = parse_column_attrs(&field.attrs)?;

        // An Option<T> field types the column by T and makes it nullable.
        let (value_type, option_inner) = unwrap_option(&field.ty);

        column_infos.push(ColumnInfo {
            field_name: field_name.clone(),
            value_type,
            column_name: column_attrs.name.unwrap_or_else(|| field_name.to_string()),
            is_nullable: column_attrs.nullable || option_inner,
            has_default: column_attrs.default || column_attrs.auto_increment,
            is_auto_increment: column_attrs.auto_increment,
            no_insert: column_attrs.no_insert,
            no_update: column_attrs.no_update,
        });
    }

    // Generate column type names (PascalCase)
    let column_type_names: Vec<Ident> = column_infos
        .iter()
        .map(|c| format_ident!("{}", to_pascal_case(&c.field_name.to_string())))
        .collect();

    let table_struct_name = format_ident!("{}Table", struct_name);
    let columns_mod_name = format_ident!("{}Columns", struct_name);

    // Generate column structs
    let column_structs: Vec<TokenStream2> = column_infos
        .iter()
        .zip(column_type_names.iter())
        .map(|(info, type_name)| {
            let column_name = &info.column_name;
            let value_type = &info.value_type;
            let is_nullable = info.is_nullable;
            let has_default = info.has_default;
            let is_auto_increment = info.is_auto_increment;
            let no_insert = info.no_insert;
            let no_update = info.no_update;

            let nullable_impl = is_nullable.then(|| {
                quote! {
                    impl ::ferric_sql_core::schema::NullableColumn for #type_name {}
                }
            });
            let default_impl = has_default.then(|| {
                quote! {
                    impl ::ferric_sql_core::schema::HasDefault for #type_name {}
                }
            });

            quote! {
                /// Column descriptor for compile-time checked statements.
                #[derive(Debug, Clone, Copy)]
                pub struct #type_name;

                impl ::ferric_sql_core::schema::Column for #type_name {
                    type Table = super::#table_struct_name;
                    type Kind =
                        <#value_type as ::ferric_sql_core::types::SqlType>::Kind;

                    const NAME: ::ferric_sql_core::Name =
                        ::ferric_sql_core::Name::new(#column_name);
                    const CAN_BE_NULL: bool = #is_nullable;
                    const HAS_DEFAULT: bool = #has_default;
                    const AUTO_INCREMENT: bool = #is_auto_increment;
                    const MUST_NOT_INSERT: bool = #no_insert;
                    const MUST_NOT_UPDATE: bool = #no_update;
                }

                #nullable_impl
                #default_impl
            }
        })
        .collect();

    // Generate column accessor methods
    let column_accessors: Vec<TokenStream2> = column_infos
        .iter()
        .zip(column_type_names.iter())
        .map(|(info, type_name)| {
            let method_name = &info.field_name;
            quote! {
                /// Returns the column descriptor for typed statements.
                #[inline]
                pub const fn #method_name() -> #columns_mod_name::#type_name {
                    #columns_mod_name::#type_name
                }
            }
        })
        .collect();

    // Generate FieldSpec entries in declaration order
    let field_spec_entries: Vec<TokenStream2> = column_infos
        .iter()
        .map(|info| {
            let col_name = &info.column_name;
            let value_type = &info.value_type;
            let is_nullable = info.is_nullable;

            quote! {
                ::ferric_sql_core::FieldSpec {
                    name: ::ferric_sql_core::Name::new(#col_name),
                    value_type: <
                        <#value_type as ::ferric_sql_core::types::SqlType>::Kind
                        as ::ferric_sql_core::types::ValueKind
                    >::VALUE_TYPE,
                    nullable: #is_nullable,
                }
            }
        })
        .collect();

    // Columns an INSERT must assign
    let required_insert_names: Vec<&str> = column_infos
        .iter()
        .filter(|c| !c.is_nullable && !c.has_default && !c.no_insert)
        .map(|c| c.column_name.as_str())
        .collect();

    let expanded = quote! {
        /// Column descriptors for the `#struct_name` table.
        #[allow(non_snake_case)]
        pub mod #columns_mod_name {
            #(#column_structs)*
        }

        /// Table descriptor for `#struct_name`.
        #[derive(Debug, Clone, Copy)]
        pub struct #table_struct_name;

        impl ::ferric_sql_core::schema::Table for #table_struct_name {
            const NAME: ::ferric_sql_core::Name =
                ::ferric_sql_core::Name::new(#table_name);

            fn field_specs() -> Vec<::ferric_sql_core::FieldSpec> {
                vec![#(#field_spec_entries),*]
            }

            fn required_insert_columns() -> &'static [::ferric_sql_core::Name] {
                const COLUMNS: &[::ferric_sql_core::Name] =
                    &[#(::ferric_sql_core::Name::new(#required_insert_names)),*];
                COLUMNS
            }
        }

        impl #table_struct_name {
            /// Returns the table name.
            #[inline]
            pub const fn table_name() -> &'static str {
                #table_name
            }

            #(#column_accessors)*
        }

        impl #struct_name {
            /// Returns the table descriptor.
            pub const fn table() -> #table_struct_name {
                #table_struct_name
            }

            #(#column_accessors)*
        }
    };

    Ok(expanded)
}

struct ColumnInfo {
    field_name: Ident,
    value_type: Type,
    column_name: String,
    is_nullable: bool,
    has_default: bool,
    is_auto_increment: bool,
    no_insert: bool,
    no_update: bool,
}

struct ColumnAttrs {
    name: Option<String>,
    nullable: bool,
    default: bool,
    auto_increment: bool,
    no_insert: bool,
    no_update: bool,
}

/// Splits `Option<T>` into `(T, true)`; any other type maps to itself.
fn unwrap_option(ty: &Type) -> (Type, bool) {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return (inner.clone(), true);
                    }
                }
            }
        }
    }
    (ty.clone(), false)
}

fn get_table_name(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<String> {
    for attr in attrs {
        if attr.path().is_ident("table") {
            let mut table_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            table_name = Some(s.value());
                        }
                    }
                }
                Ok(())
            })?;
            if let Some(name) = table_name {
                return Ok(name);
            }
        }
    }
    // Default to snake_case of struct name
    Ok(to_snake_case(&struct_name.to_string()))
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs {
        name: None,
        nullable: false,
        default: false,
        auto_increment: false,
        no_insert: false,
        no_update: false,
    };

    for attr in attrs {
        if attr.path().is_ident("column") {
            // Handle empty attribute like #[column]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("nullable") {
                    result.nullable = true;
                } else if meta.path.is_ident("default") {
                    result.default = true;
                } else if meta.path.is_ident("auto_increment") {
                    result.auto_increment = true;
                } else if meta.path.is_ident("no_insert") {
                    result.no_insert = true;
                } else if meta.path.is_ident("no_update") {
                    result.no_update = true;
                } else if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            result.name = Some(s.value());
                        }
                    }
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}
