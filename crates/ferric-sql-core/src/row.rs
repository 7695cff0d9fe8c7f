//! Result-row descriptors.
//!
//! A SELECT (or RETURNING clause) yields rows whose shape is an ordered
//! list of named, typed, nullability-tagged fields, derived entirely from
//! the statement's column list. Two row shapes with identical
//! (name, value type) sequences are interchangeable; connectors use the
//! descriptor to know how many columns to bind and how to decode each.

use crate::name::Name;
use crate::types::ValueType;
use crate::value::Value;

/// One field of a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The result column name (alias if one was given).
    pub name: Name,
    /// The field's value type.
    pub value_type: ValueType,
    /// Whether the field can be NULL.
    pub nullable: bool,
}

/// The ordered shape of a result row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSpec {
    fields: Vec<FieldSpec>,
}

impl RowSpec {
    /// Creates a row descriptor from its fields.
    #[must_use]
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Returns the fields in column order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name.text() == name)
    }

    /// Returns whether two row shapes are interchangeable: identical
    /// (name, value type) sequences, nullability not considered.
    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.name == b.name && a.value_type == b.value_type)
    }
}

/// A decoded result row, paired with its descriptor by the connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    spec: RowSpec,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from a descriptor and decoded values.
    ///
    /// The connector guarantees `values.len() == spec.len()`.
    #[must_use]
    pub fn new(spec: RowSpec, values: Vec<Value>) -> Self {
        debug_assert_eq!(spec.len(), values.len());
        Self { spec, values }
    }

    /// Returns the row descriptor.
    #[must_use]
    pub fn spec(&self) -> &RowSpec {
        &self.spec
    }

    /// Returns the value at the given column index.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the value of the named column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.spec
            .fields
            .iter()
            .position(|f| f.name.text() == name)
            .and_then(|i| self.values.get(i))
    }

    /// Consumes the row and returns its values in column order.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(fields: &[(&'static str, ValueType)]) -> RowSpec {
        RowSpec::new(
            fields
                .iter()
                .map(|(name, vt)| FieldSpec {
                    name: Name::new(name),
                    value_type: *vt,
                    nullable: false,
                })
                .collect(),
        )
    }

    #[test]
    fn test_compatibility_is_name_and_type_sequence() {
        let a = spec(&[("id", ValueType::Integral), ("name", ValueType::Text)]);
        let b = spec(&[("id", ValueType::Integral), ("name", ValueType::Text)]);
        let c = spec(&[("name", ValueType::Text), ("id", ValueType::Integral)]);
        assert!(a.is_compatible_with(&b));
        assert!(!a.is_compatible_with(&c));
    }

    #[test]
    fn test_nullability_does_not_affect_compatibility() {
        let a = spec(&[("id", ValueType::Integral)]);
        let mut fields = a.fields().to_vec();
        fields[0].nullable = true;
        let b = RowSpec::new(fields);
        assert!(a.is_compatible_with(&b));
    }

    #[test]
    fn test_row_lookup() {
        let row = Row::new(
            spec(&[("id", ValueType::Integral), ("name", ValueType::Text)]),
            vec![Value::Int(7), Value::Text("fred".into())],
        );
        assert_eq!(row.get("name"), Some(&Value::Text("fred".into())));
        assert_eq!(row.value(0), Some(&Value::Int(7)));
        assert_eq!(row.get("missing"), None);
    }
}
