//! Sign, range and parity checks over [`Numeric`] values.

use rust_decimal::Decimal;

use crate::types::{Numeric, Predicate};

fn parity<N: Numeric>(value: N) -> Option<bool> {
    let d = value.to_decimal()?;
    if !d.fract().is_zero() {
        return None;
    }
    Some((d % Decimal::from(2)).is_zero())
}

#[must_use]
pub fn is_zero<N: Numeric>() -> Predicate<N> {
    Predicate::test("is zero", |value: &N| value.is_zero())
}

#[must_use]
pub fn not_zero<N: Numeric>() -> Predicate<N> {
    Predicate::test("not zero", |value: &N| {
        !value.is_zero() && value.partial_cmp(&N::zero()).is_some()
    })
}

#[must_use]
pub fn is_positive<N: Numeric>() -> Predicate<N> {
    Predicate::test("is positive", |value: &N| *value > N::zero())
}

#[must_use]
pub fn is_negative<N: Numeric>() -> Predicate<N> {
    Predicate::test("is negative", |value: &N| *value < N::zero())
}

/// Inclusive range.
#[must_use]
pub fn in_range<N: Numeric>(low: N, high: N) -> Predicate<N> {
    let label = format!("in range {} ..= {}", low.to_value(), high.to_value());
    Predicate::test(label, move |value: &N| *value >= low && *value <= high)
}

/// Whole and divisible by two.
#[must_use]
pub fn is_even<N: Numeric>() -> Predicate<N> {
    Predicate::test("is even", |value: &N| parity(*value) == Some(true))
}

/// Whole and not divisible by two.
#[must_use]
pub fn is_odd<N: Numeric>() -> Predicate<N> {
    Predicate::test("is odd", |value: &N| parity(*value) == Some(false))
}

/// Neither NaN nor infinite.
#[must_use]
pub fn is_finite<N: Numeric>() -> Predicate<N> {
    Predicate::test("is finite", |value: &N| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_checks() {
        assert!(is_zero().evaluate(&0_i32));
        assert!(is_zero().evaluate(&-0.0_f64));
        assert!(!is_zero().evaluate(&1_u8));
        assert!(not_zero().evaluate(&Decimal::ONE));
        assert!(!not_zero().evaluate(&0_i64));
        assert!(!not_zero().evaluate(&f64::NAN));
    }

    #[test]
    fn sign_checks() {
        assert!(is_positive().evaluate(&3_i32));
        assert!(!is_positive().evaluate(&0_i32));
        assert!(is_negative().evaluate(&-0.5_f64));
        assert!(!is_negative().evaluate(&0_u32));
        assert!(!is_positive().evaluate(&f64::NAN));
        assert!(is_positive::<i32>().vacuity().is_none());
    }

    #[test]
    fn range_is_inclusive() {
        let p = in_range(1_i64, 5);
        assert!(p.evaluate(&1));
        assert!(p.evaluate(&5));
        assert!(!p.evaluate(&6));
        assert_eq!(p.to_string(), "in range 1 ..= 5");
    }

    #[test]
    fn parity_checks() {
        assert!(is_even().evaluate(&4_i32));
        assert!(is_odd().evaluate(&-3_i64));
        assert!(is_even().evaluate(&0_u8));
        assert!(is_even().evaluate(&8.0_f64));
        assert!(!is_even().evaluate(&2.5_f64));
        assert!(!is_odd().evaluate(&2.5_f64));
        assert!(!is_odd().evaluate(&f64::NAN));
    }

    #[test]
    fn finiteness() {
        assert!(is_finite().evaluate(&1.0_f32));
        assert!(!is_finite().evaluate(&f64::INFINITY));
        assert!(is_finite().evaluate(&u64::MAX));
    }
}
