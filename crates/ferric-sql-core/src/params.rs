//! Statement parameters.
//!
//! A parameter is a named, typed placeholder inside an unexecuted
//! statement. The full parameter list of a statement is the ordered,
//! name-deduplicated sequence found while walking its clauses; a
//! [`ParameterSet`] maps those names to bound [`Value`]s before each
//! execution.

use thiserror::Error;

use crate::types::ValueType;
use crate::value::Value;

/// The declaration of a single placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    /// The parameter name (typically the column name it was derived from).
    pub name: &'static str,
    /// The declared value type.
    pub value_type: ValueType,
    /// Whether NULL may be bound.
    pub nullable: bool,
}

/// Errors raised while binding parameter values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// The name does not match any declared parameter.
    #[error("no parameter named '{0}' in this statement")]
    UnknownParameter(String),

    /// The bound value's type does not match the declaration.
    #[error("value for parameter '{0}' does not match its declared type")]
    TypeMismatch(String),

    /// NULL was bound to a parameter that does not permit it.
    #[error("parameter '{0}' does not permit NULL")]
    NullNotPermitted(String),

    /// Execution was attempted before every parameter was bound.
    #[error("parameter '{0}' has not been bound")]
    Unbound(String),
}

/// The bound-value container of a prepared statement.
///
/// Fields map 1:1 to the statement's parameter list in first-occurrence
/// order. The container is a plain value object: cloning it and handing
/// the clone to another thread for execution is safe, and no two
/// executions share state.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    specs: Vec<ParameterSpec>,
    values: Vec<Option<Value>>,
}

impl ParameterSet {
    /// Creates an unbound container for the given declarations.
    #[must_use]
    pub fn new(specs: Vec<ParameterSpec>) -> Self {
        let values = vec![None; specs.len()];
        Self { specs, values }
    }

    /// Returns the parameter declarations in bind order.
    #[must_use]
    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    /// Binds a value to the named parameter, validating type and
    /// nullability against the declaration.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), BindError> {
        let value = value.into();
        let index = self
            .specs
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| BindError::UnknownParameter(name.to_owned()))?;
        let spec = &self.specs[index];
        if value.is_null() {
            if !spec.nullable {
                return Err(BindError::NullNotPermitted(name.to_owned()));
            }
        } else if !value.is_compatible_with(spec.value_type) {
            return Err(BindError::TypeMismatch(name.to_owned()));
        }
        self.values[index] = Some(value);
        Ok(())
    }

    /// Returns the bound values in placeholder order, or the first unbound
    /// parameter. Connectors call this immediately before execution.
    pub fn values(&self) -> Result<Vec<Value>, BindError> {
        self.specs
            .iter()
            .zip(&self.values)
            .map(|(spec, value)| {
                value
                    .clone()
                    .ok_or_else(|| BindError::Unbound(spec.name.to_owned()))
            })
            .collect()
    }

    /// Returns whether every parameter has been bound.
    #[must_use]
    pub fn is_fully_bound(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Clears all bindings, keeping the declarations.
    pub fn reset(&mut self) {
        for value in &mut self.values {
            *value = None;
        }
    }
}

/// Deduplicates collected parameter declarations by name, keeping first
/// occurrences in order.
#[must_use]
pub fn dedup_by_name(specs: Vec<ParameterSpec>) -> Vec<ParameterSpec> {
    let mut out: Vec<ParameterSpec> = Vec::with_capacity(specs.len());
    for spec in specs {
        if !out.iter().any(|existing| existing.name == spec.name) {
            out.push(spec);
        }
    }
    out
}
