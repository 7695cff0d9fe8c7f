//! Runtime SQL values.
//!
//! [`Value`] is the payload of literals and of bound parameters. Literal
//! serialization goes through the dialect for escaping and boolean
//! spelling; parameter binding hands the value to a backend connector
//! untouched.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::ValueType;

/// A concrete SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL.
    Null,
    /// The column's declared default (only meaningful in assignments).
    Default,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time.
    DateTime(NaiveDateTime),
    /// Time of day.
    Time(NaiveTime),
}

impl Value {
    /// Returns the value type this value inhabits, or `None` for `Null`
    /// and `Default`, which adopt the type of their context.
    #[must_use]
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Null | Self::Default => None,
            Self::Bool(_) => Some(ValueType::Boolean),
            Self::Int(_) => Some(ValueType::Integral),
            Self::UInt(_) => Some(ValueType::UnsignedIntegral),
            Self::Float(_) => Some(ValueType::FloatingPoint),
            Self::Text(_) => Some(ValueType::Text),
            Self::Blob(_) => Some(ValueType::Blob),
            Self::Date(_) => Some(ValueType::DayPoint),
            Self::DateTime(_) => Some(ValueType::TimePoint),
            Self::Time(_) => Some(ValueType::TimeOfDay),
        }
    }

    /// Returns whether this value is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns whether a value of this shape can be bound to a parameter
    /// declared with `value_type`.
    ///
    /// `Null` binds anywhere the parameter is nullable (checked by the
    /// caller); `Default` never binds to a parameter.
    #[must_use]
    pub fn is_compatible_with(&self, value_type: ValueType) -> bool {
        match self.value_type() {
            Some(vt) => {
                vt == value_type
                    || (vt.is_numeric()
                        && value_type.is_numeric()
                        && value_type.arithmetic_result(vt) == value_type)
            }
            None => !matches!(self, Self::Default),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident $(as $conv:ty)?),+ $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v $(as $conv)? .into())
            }
        })+
    };
}

impl_from!(
    bool => Bool,
    i8 => Int, i16 => Int, i32 => Int, i64 => Int,
    u8 => UInt, u16 => UInt, u32 => UInt, u64 => UInt,
    f32 => Float, f64 => Float,
    String => Text,
    Vec<u8> => Blob,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Blob(v.to_vec())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(Value::Int(1).value_type(), Some(ValueType::Integral));
        assert_eq!(
            Value::UInt(1).value_type(),
            Some(ValueType::UnsignedIntegral)
        );
        assert_eq!(Value::Null.value_type(), None);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3_i64)), Value::Int(3));
    }

    #[test]
    fn test_parameter_compatibility() {
        // Exact match.
        assert!(Value::Int(1).is_compatible_with(ValueType::Integral));
        // Widening within the numeric kinds.
        assert!(Value::Int(1).is_compatible_with(ValueType::FloatingPoint));
        assert!(Value::UInt(1).is_compatible_with(ValueType::Integral));
        // Narrowing is rejected.
        assert!(!Value::Float(1.0).is_compatible_with(ValueType::Integral));
        // Cross-category is rejected.
        assert!(!Value::Text("x".into()).is_compatible_with(ValueType::Integral));
        // Null is shape-compatible; nullability is the caller's check.
        assert!(Value::Null.is_compatible_with(ValueType::Text));
        // Default never binds to a parameter.
        assert!(!Value::Default.is_compatible_with(ValueType::Text));
    }
}
