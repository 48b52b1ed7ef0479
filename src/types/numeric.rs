use std::fmt;

use num_traits::{FromPrimitive, Zero};
use rust_decimal::Decimal;

use super::value::Value;

/// Numbers accepted by aggregation operations and numeric fragments.
///
/// Implemented for every primitive integer, `f32`, `f64` and [`Decimal`].
pub trait Numeric:
    Copy + PartialOrd + Zero + Into<Value> + fmt::Debug + Send + Sync + 'static
{
    /// Exact decimal form of this number. `None` for NaN, infinities and
    /// magnitudes outside the decimal range.
    fn to_decimal(self) -> Option<Decimal>;

    /// Addition that reports overflow as `None`. Floats saturate to
    /// infinity instead.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// Whether this number is neither NaN nor infinite.
    fn is_finite(self) -> bool {
        true
    }

    /// The literal form of this number.
    fn to_value(self) -> Value {
        self.into()
    }
}

macro_rules! numeric_int {
    ($($t:ty => $from:ident),* $(,)?) => {
        $(
            impl Numeric for $t {
                fn to_decimal(self) -> Option<Decimal> {
                    Decimal::$from(self)
                }

                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
}

numeric_int!(
    i8 => from_i8,
    i16 => from_i16,
    i32 => from_i32,
    i64 => from_i64,
    i128 => from_i128,
    isize => from_isize,
    u8 => from_u8,
    u16 => from_u16,
    u32 => from_u32,
    u64 => from_u64,
    u128 => from_u128,
    usize => from_usize,
);

impl Numeric for f32 {
    fn to_decimal(self) -> Option<Decimal> {
        Decimal::from_f32(self)
    }

    fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(self + rhs)
    }

    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Numeric for f64 {
    fn to_decimal(self) -> Option<Decimal> {
        Decimal::from_f64(self)
    }

    fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(self + rhs)
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Numeric for Decimal {
    fn to_decimal(self) -> Option<Decimal> {
        Some(self)
    }

    fn checked_add(self, rhs: Self) -> Option<Self> {
        Decimal::checked_add(self, rhs)
    }
}
