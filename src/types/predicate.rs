use std::fmt;
use std::sync::Arc;

use super::value::{CompareOp, Value};
use crate::error::Vacuity;

/// A literal constant body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Const {
    True,
    False,
    /// Evaluates to `false`.
    Null,
}

/// What a leaf test looks like from the outside.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// An arbitrary closure.
    Opaque,
    /// `value <op> operand` against a literal operand.
    Compare { op: CompareOp, operand: Value },
}

type TestFn<T> = dyn Fn(&T) -> bool + Send + Sync;

/// A named leaf predicate backed by a shared closure.
pub struct Test<T: ?Sized> {
    label: Arc<str>,
    shape: Shape,
    f: Arc<TestFn<T>>,
}

impl<T: ?Sized> Test<T> {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl<T: ?Sized> Clone for Test<T> {
    fn clone(&self) -> Self {
        Self {
            label: Arc::clone(&self.label),
            shape: self.shape.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Test<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test")
            .field("label", &self.label)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Closure identity: two tests are the same only if they share the closure.
impl<T: ?Sized> PartialEq for Test<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

/// An immutable boolean condition over `T`.
///
/// Leaves are either literal constants or named closures; composites are
/// built by [`ConditionBuilder`](super::ConditionBuilder). Cloning is cheap and
/// predicates can be shared across threads.
///
/// # Example
///
/// ```
/// use siftflow::Predicate;
///
/// let adult = Predicate::test("adult", |age: &u32| *age >= 18);
/// assert!(adult.evaluate(&21));
/// assert!(!adult.evaluate(&12));
/// assert_eq!(adult.to_string(), "adult");
/// ```
pub enum Predicate<T: ?Sized> {
    Const(Const),
    Test(Test<T>),
    And(Box<Predicate<T>>, Box<Predicate<T>>),
    Or(Box<Predicate<T>>, Box<Predicate<T>>),
    Not(Box<Predicate<T>>),
}

impl<T: ?Sized> Predicate<T> {
    /// The "always true" sentinel.
    #[must_use]
    pub fn always() -> Self {
        Predicate::Const(Const::True)
    }

    /// A literal boolean body. Rejected by the builder as vacuous.
    #[must_use]
    pub fn constant(value: bool) -> Self {
        Predicate::Const(if value { Const::True } else { Const::False })
    }

    /// A literal null body. Rejected by the builder as vacuous.
    #[must_use]
    pub fn null() -> Self {
        Predicate::Const(Const::Null)
    }

    /// A named opaque test.
    pub fn test<F>(label: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::leaf(label, Shape::Opaque, f)
    }

    /// A comparison `value <op> operand`, where `f` performs the comparison.
    pub fn compare<F>(label: impl Into<Arc<str>>, op: CompareOp, operand: Value, f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::leaf(label, Shape::Compare { op, operand }, f)
    }

    fn leaf<F>(label: impl Into<Arc<str>>, shape: Shape, f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Predicate::Test(Test {
            label: label.into(),
            shape,
            f: Arc::new(f),
        })
    }

    /// Apply this predicate to a single value.
    #[must_use]
    pub fn evaluate(&self, value: &T) -> bool {
        match self {
            Predicate::Const(c) => *c == Const::True,
            Predicate::Test(t) => (t.f)(value),
            Predicate::And(a, b) => a.evaluate(value) && b.evaluate(value),
            Predicate::Or(a, b) => a.evaluate(value) || b.evaluate(value),
            Predicate::Not(inner) => !inner.evaluate(value),
        }
    }

    /// Returns why this predicate is statically vacuous, if it is.
    ///
    /// Only the top-level node is inspected.
    #[must_use]
    pub fn vacuity(&self) -> Option<Vacuity> {
        match self {
            Predicate::Const(Const::True) => Some(Vacuity::AlwaysTrue),
            Predicate::Const(Const::False) => Some(Vacuity::AlwaysFalse),
            Predicate::Const(Const::Null) => Some(Vacuity::AlwaysNull),
            Predicate::Test(Test {
                shape: Shape::Compare { operand, .. },
                ..
            }) if operand.is_zero() => Some(Vacuity::ComparedToZero),
            _ => None,
        }
    }

    /// Number of leaves (constants and tests) in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::Const(_) | Predicate::Test(_) => 1,
            Predicate::And(a, b) | Predicate::Or(a, b) => a.leaf_count() + b.leaf_count(),
            Predicate::Not(inner) => inner.leaf_count(),
        }
    }

    #[must_use]
    pub(crate) fn and(self, other: Predicate<T>) -> Predicate<T> {
        Predicate::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub(crate) fn or(self, other: Predicate<T>) -> Predicate<T> {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub(crate) fn negate(self) -> Predicate<T> {
        Predicate::Not(Box::new(self))
    }
}

impl<T: ?Sized + 'static> Predicate<T> {
    /// Lift a field-level predicate to the owning entity through `selector`.
    pub(crate) fn select<E, S>(self, selector: S) -> Predicate<E>
    where
        E: ?Sized,
        S: Fn(&E) -> &T + Send + Sync + 'static,
    {
        let label = format!("it => {self}");
        Predicate::test(label, move |entity: &E| self.evaluate(selector(entity)))
    }
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Const(c) => Predicate::Const(*c),
            Predicate::Test(t) => Predicate::Test(t.clone()),
            Predicate::And(a, b) => Predicate::And(a.clone(), b.clone()),
            Predicate::Or(a, b) => Predicate::Or(a.clone(), b.clone()),
            Predicate::Not(inner) => Predicate::Not(inner.clone()),
        }
    }
}

impl<T: ?Sized> PartialEq for Predicate<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Predicate::Const(a), Predicate::Const(b)) => a == b,
            (Predicate::Test(a), Predicate::Test(b)) => a == b,
            (Predicate::And(a1, b1), Predicate::And(a2, b2))
            | (Predicate::Or(a1, b1), Predicate::Or(a2, b2)) => a1 == a2 && b1 == b2,
            (Predicate::Not(a), Predicate::Not(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Const(c) => f.debug_tuple("Const").field(c).finish(),
            Predicate::Test(t) => t.fmt(f),
            Predicate::And(a, b) => f.debug_tuple("And").field(a).field(b).finish(),
            Predicate::Or(a, b) => f.debug_tuple("Or").field(a).field(b).finish(),
            Predicate::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Const::True => write!(f, "true"),
            Const::False => write!(f, "false"),
            Const::Null => write!(f, "null"),
        }
    }
}

impl<T: ?Sized> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Const(c) => write!(f, "{c}"),
            Predicate::Test(t) => write!(f, "{}", t.label),
            Predicate::And(a, b) => write!(f, "({a} AND {b})"),
            Predicate::Or(a, b) => write!(f, "({a} OR {b})"),
            Predicate::Not(inner) => write!(f, "(NOT {inner})"),
        }
    }
}
