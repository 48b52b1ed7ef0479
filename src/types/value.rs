use std::cmp::Ordering;
use std::fmt;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;

/// Comparison operators carried by comparison fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Whether an ordering between the tested value and the operand satisfies
    /// this operator.
    #[must_use]
    pub fn holds(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Neq => ord != Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
        }
    }

    /// Compare `lhs` against `rhs`. Incomparable values (NaN) only satisfy `Neq`.
    pub fn test<V: PartialOrd + ?Sized>(self, lhs: &V, rhs: &V) -> bool {
        match lhs.partial_cmp(rhs) {
            Some(ord) => self.holds(ord),
            None => self == CompareOp::Neq,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

/// Literal operand of a comparison fragment.
///
/// Predicates evaluate against typed field values; `Value` only describes the
/// constant side of a comparison so it can be displayed, checked for a literal
/// zero, and handed to a remote translator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// An absent value.
    Null,
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A fixed-point decimal.
    Decimal(Decimal),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
}

impl Value {
    /// Whether this value is a numeric zero literal.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Decimal(v) => v.is_zero(),
            Value::Null | Value::Bool(_) | Value::String(_) => false,
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! value_from_wide_int {
    ($($t:ty => $from:ident),*) => {
        $(
            impl From<$t> for Value {
                #[allow(clippy::cast_precision_loss)]
                fn from(v: $t) -> Self {
                    match i64::try_from(v) {
                        Ok(v) => Value::Int(v),
                        Err(_) => Decimal::$from(v).map_or(Value::Float(v as f64), Value::Decimal),
                    }
                }
            }
        )*
    };
}

value_from_wide_int!(
    u64 => from_u64,
    usize => from_usize,
    i128 => from_i128,
    u128 => from_u128,
    isize => from_isize
);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_primitives() {
        assert_eq!(Value::from(42_i32), Value::Int(42));
        assert_eq!(Value::from(7_u8), Value::Int(7));
        assert_eq!(Value::from(3.5_f64), Value::Float(3.5));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_owned()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5_i64)), Value::Int(5));
    }

    #[test]
    fn from_wide_integers() {
        assert_eq!(Value::from(10_usize), Value::Int(10));
        assert_eq!(
            Value::from(u64::MAX),
            Value::Decimal(Decimal::from(u64::MAX))
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(3.25).to_string(), "3.25");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::String("hello".into()).to_string(), "\"hello\"");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Decimal(Decimal::new(125, 2)).to_string(), "1.25");
    }

    #[test]
    fn zero_detection() {
        assert!(Value::Int(0).is_zero());
        assert!(Value::Float(0.0).is_zero());
        assert!(Value::Float(-0.0).is_zero());
        assert!(Value::Decimal(Decimal::ZERO).is_zero());
        assert!(!Value::Int(1).is_zero());
        assert!(!Value::String("0".into()).is_zero());
        assert!(!Value::Bool(false).is_zero());
        assert!(!Value::Null.is_zero());
    }

    #[test]
    fn compare_op_holds() {
        assert!(CompareOp::Eq.holds(Ordering::Equal));
        assert!(CompareOp::Neq.holds(Ordering::Less));
        assert!(CompareOp::Gt.holds(Ordering::Greater));
        assert!(CompareOp::Gte.holds(Ordering::Equal));
        assert!(!CompareOp::Gte.holds(Ordering::Less));
        assert!(CompareOp::Lt.holds(Ordering::Less));
        assert!(CompareOp::Lte.holds(Ordering::Equal));
        assert!(!CompareOp::Lte.holds(Ordering::Greater));
    }

    #[test]
    fn compare_op_test_nan() {
        assert!(!CompareOp::Eq.test(&f64::NAN, &f64::NAN));
        assert!(CompareOp::Neq.test(&f64::NAN, &1.0));
        assert!(!CompareOp::Lt.test(&f64::NAN, &1.0));
        assert!(CompareOp::Lt.test(&1, &2));
        assert!(CompareOp::Gte.test("b", "a"));
    }

    #[test]
    fn compare_op_display() {
        let rendered: Vec<String> = [
            CompareOp::Eq,
            CompareOp::Neq,
            CompareOp::Gt,
            CompareOp::Gte,
            CompareOp::Lt,
            CompareOp::Lte,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(rendered, ["==", "!=", ">", ">=", "<", "<="]);
    }
}
