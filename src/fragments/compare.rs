//! Comparison predicates over ordered values.
//!
//! The relational fragments keep their literal operand in the predicate's
//! [`Shape`](crate::Shape), so the builder can reject comparisons
//! against a literal zero. Use [`numeric`](super::numeric) for sign checks.

use std::fmt::Write as _;

use crate::types::{CompareOp, Predicate, Value};

/// Bound shared by every comparison operand.
pub trait Comparable: PartialOrd + Clone + Into<Value> + Send + Sync + 'static {}

impl<V> Comparable for V where V: PartialOrd + Clone + Into<Value> + Send + Sync + 'static {}

fn relation<V: Comparable>(op: CompareOp, operand: V) -> Predicate<V> {
    let literal: Value = operand.clone().into();
    Predicate::compare(format!("{op} {literal}"), op, literal, move |value: &V| {
        op.test(value, &operand)
    })
}

#[must_use]
pub fn equal_to<V: Comparable>(operand: V) -> Predicate<V> {
    relation(CompareOp::Eq, operand)
}

#[must_use]
pub fn not_equal_to<V: Comparable>(operand: V) -> Predicate<V> {
    relation(CompareOp::Neq, operand)
}

#[must_use]
pub fn greater_than<V: Comparable>(operand: V) -> Predicate<V> {
    relation(CompareOp::Gt, operand)
}

#[must_use]
pub fn greater_than_or_equal<V: Comparable>(operand: V) -> Predicate<V> {
    relation(CompareOp::Gte, operand)
}

#[must_use]
pub fn less_than<V: Comparable>(operand: V) -> Predicate<V> {
    relation(CompareOp::Lt, operand)
}

#[must_use]
pub fn less_than_or_equal<V: Comparable>(operand: V) -> Predicate<V> {
    relation(CompareOp::Lte, operand)
}

/// Inclusive range check. Never matches when `low > high`.
#[must_use]
pub fn between<V: Comparable>(low: V, high: V) -> Predicate<V> {
    let label = format!(
        "between {} and {}",
        Into::<Value>::into(low.clone()),
        Into::<Value>::into(high.clone())
    );
    Predicate::test(label, move |value: &V| {
        CompareOp::Gte.test(value, &low) && CompareOp::Lte.test(value, &high)
    })
}

fn set_label<V: Comparable>(prefix: &str, values: &[V]) -> String {
    let mut label = format!("{prefix} [");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            label.push_str(", ");
        }
        let _ = write!(label, "{}", Into::<Value>::into(value.clone()));
    }
    label.push(']');
    label
}

/// Membership in a fixed set of values.
#[must_use]
pub fn in_set<V: Comparable>(values: impl IntoIterator<Item = V>) -> Predicate<V> {
    let values: Vec<V> = values.into_iter().collect();
    Predicate::test(set_label("in", &values), move |value: &V| {
        values.iter().any(|candidate| candidate == value)
    })
}

#[must_use]
pub fn not_in_set<V: Comparable>(values: impl IntoIterator<Item = V>) -> Predicate<V> {
    let values: Vec<V> = values.into_iter().collect();
    Predicate::test(set_label("not in", &values), move |value: &V| {
        !values.iter().any(|candidate| candidate == value)
    })
}

/// The optional field is absent.
#[must_use]
pub fn is_none<V: Send + Sync + 'static>() -> Predicate<Option<V>> {
    Predicate::test("is none", Option::is_none)
}

/// The optional field is present.
#[must_use]
pub fn is_some<V: Send + Sync + 'static>() -> Predicate<Option<V>> {
    Predicate::test("is some", Option::is_some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Vacuity;
    use crate::types::Shape;

    #[test]
    fn relations() {
        assert!(equal_to(5).evaluate(&5));
        assert!(!equal_to(5).evaluate(&6));
        assert!(not_equal_to(5).evaluate(&6));
        assert!(greater_than(5).evaluate(&6));
        assert!(!greater_than(5).evaluate(&5));
        assert!(greater_than_or_equal(5).evaluate(&5));
        assert!(less_than(5).evaluate(&4));
        assert!(less_than_or_equal(5).evaluate(&5));
        assert!(!less_than_or_equal(5).evaluate(&6));
    }

    #[test]
    fn strings_compare_lexically() {
        assert!(greater_than("b".to_owned()).evaluate(&"c".to_owned()));
        assert!(equal_to("x".to_owned()).evaluate(&"x".to_owned()));
    }

    #[test]
    fn nan_only_satisfies_not_equal() {
        assert!(!equal_to(1.0).evaluate(&f64::NAN));
        assert!(!greater_than(1.0).evaluate(&f64::NAN));
        assert!(not_equal_to(1.0).evaluate(&f64::NAN));
    }

    #[test]
    fn carries_compare_shape() {
        let p = greater_than(18_u32);
        match &p {
            Predicate::Test(test) => assert_eq!(
                test.shape(),
                &Shape::Compare {
                    op: CompareOp::Gt,
                    operand: Value::Int(18)
                }
            ),
            other => panic!("expected a test, got {other:?}"),
        }
        assert_eq!(p.to_string(), "> 18");
        assert_eq!(p.vacuity(), None);
    }

    #[test]
    fn zero_operand_is_vacuous() {
        assert_eq!(greater_than(0).vacuity(), Some(Vacuity::ComparedToZero));
        assert_eq!(equal_to(0.0).vacuity(), Some(Vacuity::ComparedToZero));
        assert_eq!(between(0, 10).vacuity(), None);
    }

    #[test]
    fn between_is_inclusive() {
        let p = between(1, 3);
        assert!(p.evaluate(&1));
        assert!(p.evaluate(&3));
        assert!(!p.evaluate(&0));
        assert!(!p.evaluate(&4));
        assert!(!between(3, 1).evaluate(&2));
        assert_eq!(p.to_string(), "between 1 and 3");
    }

    #[test]
    fn set_membership() {
        let p = in_set(["a".to_owned(), "b".to_owned()]);
        assert!(p.evaluate(&"a".to_owned()));
        assert!(!p.evaluate(&"c".to_owned()));
        assert_eq!(p.to_string(), "in [\"a\", \"b\"]");

        let p = not_in_set([1, 2]);
        assert!(p.evaluate(&3));
        assert!(!p.evaluate(&2));
        assert!(!in_set(Vec::<i32>::new()).evaluate(&1));
    }

    #[test]
    fn optional_presence() {
        assert!(is_none::<i32>().evaluate(&None));
        assert!(!is_none().evaluate(&Some(1)));
        assert!(is_some().evaluate(&Some("x")));
    }
}
