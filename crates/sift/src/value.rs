//! Runtime value types for matching.
//!
//! The [`Value`] enum is the borrowed view of a scalar read from an item:
//! either the item itself (for primitive items) or one of its properties.

use std::fmt;

/// Runtime value for matching, borrowed from the source item.
///
/// Accessors on [`Filterable`](crate::Filterable) return this type.
///
/// # Example
///
/// ```
/// use sift::{Number, Value};
///
/// struct Contact {
///     name: String,
///     age: u8,
/// }
///
/// fn property<'a>(contact: &'a Contact, name: &str) -> Value<'a> {
///     match name {
///         "name" => Value::String(&contact.name),
///         "age" => Value::Number(Number::U64(contact.age as u64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Present, but explicitly null.
    Null,
    /// Present, but a mapping or a sequence rather than a scalar.
    Nested,
    /// Property not present.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if the property is missing.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if this is a `Bool` value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` for strings, numbers and booleans.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::String(_) | Value::Number(_) | Value::Bool(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// The [`Display`](fmt::Display) form is what loose matching compares
/// against: integers print plainly, integral floats print without a
/// fractional part (`1.0` → `"1"`), magnitudes of at least `1e21` or
/// below `1e-6` use exponent form (`1e+21`, `1.5e-7`), and non-finite
/// floats print as `NaN`, `Infinity` and `-Infinity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) if n.is_nan() => f.write_str("NaN"),
            Number::F64(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Number::F64(n) if *n == 0.0 => f.write_str("0"),
            Number::F64(n) if n.abs() >= 1e21 || n.abs() < 1e-6 => write_exponent(f, *n),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

/// `1e21` → `1e+21`, `1.5e-7` → `1.5e-7`.
fn write_exponent(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&text),
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f64);

impl From<f32> for Number {
    /// Keeps the `f32`'s own shortest form: `0.1f32` becomes `0.1`, not the
    /// widened `0.10000000149011612`.
    fn from(n: f32) -> Self {
        Number::F64(n.to_string().parse().unwrap_or(f64::from(n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_checks() {
        assert!(Value::String("test").is_string());
        assert!(Value::Number(Number::I64(42)).is_number());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::None.is_none());
        assert!(!Value::Null.is_none());
        assert!(!Value::Nested.is_scalar());
        assert!(Value::Bool(false).is_scalar());
    }

    #[test]
    fn value_extractors() {
        assert_eq!(Value::String("hello").as_str(), Some("hello"));
        assert_eq!(
            Value::Number(Number::I64(42)).as_number(),
            Some(Number::I64(42))
        );
        assert_eq!(Value::Bool(true).as_bool(), Some(true));

        // Wrong type returns None
        assert_eq!(Value::String("test").as_number(), None);
        assert_eq!(Value::Number(Number::I64(1)).as_str(), None);
        assert_eq!(Value::Null.as_bool(), None);
    }

    #[test]
    fn number_display_matches_plain_formatting() {
        assert_eq!(Number::I64(-42).to_string(), "-42");
        assert_eq!(Number::U64(42).to_string(), "42");
        assert_eq!(Number::F64(1.0).to_string(), "1");
        assert_eq!(Number::F64(2.5).to_string(), "2.5");
        assert_eq!(Number::F64(-0.0).to_string(), "0");
        assert_eq!(Number::F64(f64::NAN).to_string(), "NaN");
        assert_eq!(Number::F64(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Number::F64(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn number_display_uses_exponent_at_extremes() {
        assert_eq!(Number::F64(1e21).to_string(), "1e+21");
        assert_eq!(Number::F64(-2.5e22).to_string(), "-2.5e+22");
        assert_eq!(Number::F64(1e-7).to_string(), "1e-7");
        assert_eq!(Number::F64(1.5e-7).to_string(), "1.5e-7");
        assert_eq!(Number::F64(1e20).to_string(), "100000000000000000000");
        assert_eq!(Number::F64(0.000001).to_string(), "0.000001");
    }

    #[test]
    fn f32_keeps_its_shortest_form() {
        assert_eq!(Number::from(0.1f32), Number::F64(0.1));
        assert_eq!(Number::from(0.1f32).to_string(), "0.1");
        assert_eq!(Number::from(f32::NAN).to_string(), "NaN");
    }

    #[test]
    fn number_conversions() {
        assert_eq!(Number::from(42i32), Number::I64(42));
        assert_eq!(Number::from(42u32), Number::U64(42));
        assert_eq!(Number::from(42.5f64), Number::F64(42.5));
        assert_eq!(Number::from(7usize), Number::U64(7));
        assert_eq!(Number::from(-7isize), Number::I64(-7));
    }
}
