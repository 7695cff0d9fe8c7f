//! SQL value categories and the compile-time kind system.
//!
//! Every expression carries a SQL-level value category, distinct from any
//! Rust storage type. The runtime side is [`ValueType`]; the compile-time
//! side is a family of zero-sized marker types implementing [`ValueKind`],
//! used by the typed expression facade so that incompatible operator
//! applications do not type-check at all.

/// The SQL-level data category of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Boolean.
    Boolean,
    /// Signed integer.
    Integral,
    /// Unsigned integer.
    UnsignedIntegral,
    /// Floating point.
    FloatingPoint,
    /// Character data.
    Text,
    /// Binary data.
    Blob,
    /// Calendar date.
    DayPoint,
    /// Date and time.
    TimePoint,
    /// Time of day.
    TimeOfDay,
    /// No value (e.g. statements that select nothing).
    NoValue,
}

impl ValueType {
    /// Returns whether two value types may be compared with each other.
    ///
    /// Numeric kinds are mutually comparable, temporal kinds are mutually
    /// comparable, everything else only with itself. `NoValue` compares
    /// with nothing.
    #[must_use]
    pub const fn is_comparable_with(self, other: Self) -> bool {
        match (self, other) {
            (
                Self::Integral | Self::UnsignedIntegral | Self::FloatingPoint,
                Self::Integral | Self::UnsignedIntegral | Self::FloatingPoint,
            )
            | (
                Self::DayPoint | Self::TimePoint | Self::TimeOfDay,
                Self::DayPoint | Self::TimePoint | Self::TimeOfDay,
            )
            | (Self::Boolean, Self::Boolean)
            | (Self::Text, Self::Text)
            | (Self::Blob, Self::Blob) => true,
            _ => false,
        }
    }

    /// Returns whether the type is one of the numeric kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Integral | Self::UnsignedIntegral | Self::FloatingPoint
        )
    }

    /// Arithmetic result type for `+`, `*`, `/` and `%`.
    ///
    /// Two integrals stay integral, two unsigned stay unsigned, mixing
    /// signed and unsigned yields signed, and floating point is contagious.
    #[must_use]
    pub const fn arithmetic_result(self, other: Self) -> Self {
        match (self, other) {
            (Self::FloatingPoint, _) | (_, Self::FloatingPoint) => Self::FloatingPoint,
            (Self::UnsignedIntegral, Self::UnsignedIntegral) => Self::UnsignedIntegral,
            _ => Self::Integral,
        }
    }

    /// Arithmetic result type for `-`.
    ///
    /// As [`Self::arithmetic_result`], except that any unsigned operand
    /// forces a signed result.
    #[must_use]
    pub const fn subtraction_result(self, other: Self) -> Self {
        match (self, other) {
            (Self::FloatingPoint, _) | (_, Self::FloatingPoint) => Self::FloatingPoint,
            _ => Self::Integral,
        }
    }
}

/// A compile-time tag for a [`ValueType`].
pub trait ValueKind: Copy + Default + 'static {
    /// The runtime value type this kind stands for.
    const VALUE_TYPE: ValueType;
}

macro_rules! declare_kind {
    ($(#[$doc:meta])* $name:ident => $vt:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl ValueKind for $name {
            const VALUE_TYPE: ValueType = ValueType::$vt;
        }
    };
}

declare_kind!(
    /// Kind tag for boolean expressions.
    Boolean => Boolean
);
declare_kind!(
    /// Kind tag for signed integral expressions.
    Integral => Integral
);
declare_kind!(
    /// Kind tag for unsigned integral expressions.
    UnsignedIntegral => UnsignedIntegral
);
declare_kind!(
    /// Kind tag for floating-point expressions.
    FloatingPoint => FloatingPoint
);
declare_kind!(
    /// Kind tag for text expressions.
    Text => Text
);
declare_kind!(
    /// Kind tag for blob expressions.
    Blob => Blob
);
declare_kind!(
    /// Kind tag for calendar-date expressions.
    DayPoint => DayPoint
);
declare_kind!(
    /// Kind tag for date-and-time expressions.
    TimePoint => TimePoint
);
declare_kind!(
    /// Kind tag for time-of-day expressions.
    TimeOfDay => TimeOfDay
);
declare_kind!(
    /// Kind tag for expressions without a value.
    NoValue => NoValue
);

/// Marker for the numeric kinds.
pub trait Numeric: ValueKind {}
impl Numeric for Integral {}
impl Numeric for UnsignedIntegral {}
impl Numeric for FloatingPoint {}

/// Marker for the text kind (concatenation, LIKE).
pub trait Textual: ValueKind {}
impl Textual for Text {}

/// Marker for the temporal kinds.
pub trait Temporal: ValueKind {}
impl Temporal for DayPoint {}
impl Temporal for TimePoint {}
impl Temporal for TimeOfDay {}

/// Kinds whose values may appear as operands of a comparison against
/// `Self`.
///
/// Numeric kinds compare across each other, temporal kinds likewise;
/// boolean, text and blob only compare with themselves.
pub trait ComparableWith<Rhs: ValueKind>: ValueKind {}

macro_rules! comparable {
    ($($l:ident ~ $r:ident),+ $(,)?) => {
        $(impl ComparableWith<$r> for $l {})+
    };
}

comparable!(
    Boolean ~ Boolean,
    Text ~ Text,
    Blob ~ Blob,
    Integral ~ Integral, Integral ~ UnsignedIntegral, Integral ~ FloatingPoint,
    UnsignedIntegral ~ Integral, UnsignedIntegral ~ UnsignedIntegral, UnsignedIntegral ~ FloatingPoint,
    FloatingPoint ~ Integral, FloatingPoint ~ UnsignedIntegral, FloatingPoint ~ FloatingPoint,
    DayPoint ~ DayPoint, DayPoint ~ TimePoint, DayPoint ~ TimeOfDay,
    TimePoint ~ DayPoint, TimePoint ~ TimePoint, TimePoint ~ TimeOfDay,
    TimeOfDay ~ DayPoint, TimeOfDay ~ TimePoint, TimeOfDay ~ TimeOfDay,
);

/// Numeric promotion for `+`, `*`, `/` and `%`.
pub trait Promote<Rhs: Numeric>: Numeric {
    /// The promoted result kind.
    type Output: Numeric;
}

/// Numeric promotion for `-`, where unsigned operands force a signed
/// result.
pub trait PromoteSub<Rhs: Numeric>: Numeric {
    /// The promoted result kind.
    type Output: Numeric;
}

macro_rules! promote {
    ($trait_:ident: $($l:ident + $r:ident => $out:ident),+ $(,)?) => {
        $(impl $trait_<$r> for $l { type Output = $out; })+
    };
}

promote!(Promote:
    Integral + Integral => Integral,
    Integral + UnsignedIntegral => Integral,
    Integral + FloatingPoint => FloatingPoint,
    UnsignedIntegral + Integral => Integral,
    UnsignedIntegral + UnsignedIntegral => UnsignedIntegral,
    UnsignedIntegral + FloatingPoint => FloatingPoint,
    FloatingPoint + Integral => FloatingPoint,
    FloatingPoint + UnsignedIntegral => FloatingPoint,
    FloatingPoint + FloatingPoint => FloatingPoint,
);

promote!(PromoteSub:
    Integral + Integral => Integral,
    Integral + UnsignedIntegral => Integral,
    Integral + FloatingPoint => FloatingPoint,
    UnsignedIntegral + Integral => Integral,
    UnsignedIntegral + UnsignedIntegral => Integral,
    UnsignedIntegral + FloatingPoint => FloatingPoint,
    FloatingPoint + Integral => FloatingPoint,
    FloatingPoint + UnsignedIntegral => FloatingPoint,
    FloatingPoint + FloatingPoint => FloatingPoint,
);

/// Negation result: `-unsigned` is signed, everything else keeps its kind.
pub trait Negate: Numeric {
    /// The result kind of unary minus.
    type Output: Numeric;
}

impl Negate for Integral {
    type Output = Integral;
}
impl Negate for UnsignedIntegral {
    type Output = Integral;
}
impl Negate for FloatingPoint {
    type Output = FloatingPoint;
}

/// Maps a Rust storage type to its SQL value kind.
///
/// The derive macro resolves annotated struct fields through this trait;
/// `Option<T>` fields are unwrapped there and only mark the column
/// nullable.
pub trait SqlType {
    /// The kind of expressions holding this type.
    type Kind: ValueKind;
}

macro_rules! sql_type {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(impl SqlType for $ty {
            type Kind = $kind;
        })+
    };
}

sql_type!(
    bool => Boolean,
    i8 => Integral,
    i16 => Integral,
    i32 => Integral,
    i64 => Integral,
    u8 => UnsignedIntegral,
    u16 => UnsignedIntegral,
    u32 => UnsignedIntegral,
    u64 => UnsignedIntegral,
    f32 => FloatingPoint,
    f64 => FloatingPoint,
    String => Text,
    &'static str => Text,
    Vec<u8> => Blob,
    chrono::NaiveDate => DayPoint,
    chrono::NaiveDateTime => TimePoint,
    chrono::DateTime<chrono::Utc> => TimePoint,
    chrono::NaiveTime => TimeOfDay,
);
