//! Applying predicates to data.
//!
//! An [`Evaluator`] pairs a predicate with a negation flag and an optional
//! [`Sort`]. Local operations run over slices (see `local`); deferred
//! operations run against a [`QueryHandle`](crate::QueryHandle) through
//! [`Evaluator::on`].

mod deferred;
mod local;
pub(crate) mod reduce;

use std::fmt;
use std::iter::FusedIterator;
use std::slice;
use std::vec;

pub use deferred::Deferred;

use crate::types::{ConditionBuilder, Predicate, Sort};

/// Immutable evaluation settings: the condition, whether to negate it, and
/// how to order results.
///
/// Thread-safe; share it behind `Arc` to evaluate from many threads.
///
/// # Example
///
/// ```
/// use siftflow::{ConditionBuilder, Evaluator, OrderBy};
/// use siftflow::fragments::compare;
///
/// #[derive(Debug)]
/// struct Person { id: u32, age: u32 }
///
/// let people = vec![
///     Person { id: 1, age: 17 },
///     Person { id: 2, age: 25 },
///     Person { id: 3, age: 15 },
/// ];
///
/// let adults = ConditionBuilder::<Person>::new()
///     .add_field(|p| &p.age, compare::greater_than_or_equal(18_u32))?;
///
/// let evaluator = Evaluator::from_builder(&adults);
/// let ids: Vec<u32> = evaluator.filter_all(&people).map(|p| p.id).collect();
/// assert_eq!(ids, vec![2]);
///
/// let minors = evaluator
///     .negate(true)
///     .sort(OrderBy::asc("age", |p: &Person| p.age));
/// let ids: Vec<u32> = minors.filter_all(&people).map(|p| p.id).collect();
/// assert_eq!(ids, vec![3, 1]);
/// # Ok::<(), siftflow::Error>(())
/// ```
pub struct Evaluator<T: ?Sized> {
    predicate: Predicate<T>,
    negate: bool,
    sort: Option<Sort<T>>,
}

impl<T: ?Sized> Evaluator<T> {
    #[must_use]
    pub fn new(predicate: Predicate<T>) -> Self {
        Self {
            predicate,
            negate: false,
            sort: None,
        }
    }

    #[must_use]
    pub fn from_builder(builder: &ConditionBuilder<T>) -> Self {
        Self::new(builder.build())
    }

    /// Matches every entity.
    #[must_use]
    pub fn all() -> Self {
        Self::new(Predicate::always())
    }

    /// Evaluate the negation of the condition instead.
    #[must_use]
    pub fn negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Order results. Secondary keys on the [`Sort`] break ties in order.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<Sort<T>>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate<T> {
        &self.predicate
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    #[must_use]
    pub fn ordering(&self) -> Option<&Sort<T>> {
        self.sort.as_ref()
    }

    /// Whether `entity` satisfies the effective condition.
    #[must_use]
    pub fn matches(&self, entity: &T) -> bool {
        self.predicate.evaluate(entity) != self.negate
    }

    /// The condition with negation applied, as handed to deferred sources.
    #[must_use]
    pub fn effective(&self) -> Predicate<T> {
        if self.negate {
            self.predicate.clone().negate()
        } else {
            self.predicate.clone()
        }
    }

    /// The complement of [`effective`](Self::effective).
    #[must_use]
    pub fn complement(&self) -> Predicate<T> {
        if self.negate {
            self.predicate.clone()
        } else {
            self.predicate.clone().negate()
        }
    }
}

impl<T: ?Sized> Default for Evaluator<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T: ?Sized> Clone for Evaluator<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            negate: self.negate,
            sort: self.sort.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Evaluator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("predicate", &self.predicate)
            .field("negate", &self.negate)
            .field("sort", &self.sort)
            .finish()
    }
}

/// Elements of a slice that pass (or fail) an [`Evaluator`], in result order.
///
/// Without a sort the slice is scanned lazily in source order; with a sort
/// the matches are collected and ordered up front.
pub struct Matches<'e, 'a, T> {
    inner: Inner<'e, 'a, T>,
}

enum Inner<'e, 'a, T> {
    Scan {
        rows: slice::Iter<'a, T>,
        evaluator: &'e Evaluator<T>,
        keep: bool,
    },
    Sorted(vec::IntoIter<&'a T>),
}

impl<'e, 'a, T> Matches<'e, 'a, T> {
    pub(crate) fn new(evaluator: &'e Evaluator<T>, source: &'a [T], keep: bool) -> Self {
        let inner = match &evaluator.sort {
            None => Inner::Scan {
                rows: source.iter(),
                evaluator,
                keep,
            },
            Some(sort) => {
                let mut rows: Vec<&'a T> = source
                    .iter()
                    .filter(|row| evaluator.matches(row) == keep)
                    .collect();
                sort.sort_refs(&mut rows);
                Inner::Sorted(rows.into_iter())
            }
        };
        Self { inner }
    }
}

impl<'a, T> Iterator for Matches<'_, 'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        match &mut self.inner {
            Inner::Scan {
                rows,
                evaluator,
                keep,
            } => rows.find(|row| evaluator.matches(row) == *keep),
            Inner::Sorted(rows) => rows.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Inner::Scan { rows, .. } => (0, Some(rows.len())),
            Inner::Sorted(rows) => rows.size_hint(),
        }
    }
}

impl<'a, T> DoubleEndedIterator for Matches<'_, 'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        match &mut self.inner {
            Inner::Scan {
                rows,
                evaluator,
                keep,
            } => rows.rfind(|row| evaluator.matches(row) == *keep),
            Inner::Sorted(rows) => rows.next_back(),
        }
    }
}

impl<T> FusedIterator for Matches<'_, '_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderBy;

    fn even() -> Predicate<i32> {
        Predicate::test("even", |n: &i32| n % 2 == 0)
    }

    #[test]
    fn matches_respects_negation() {
        let e = Evaluator::new(even());
        assert!(e.matches(&2));
        assert!(!e.matches(&3));
        let e = e.negate(true);
        assert!(!e.matches(&2));
        assert!(e.matches(&3));
    }

    #[test]
    fn effective_and_complement() {
        let e = Evaluator::new(even());
        assert_eq!(e.effective().to_string(), "even");
        assert_eq!(e.complement().to_string(), "(NOT even)");
        let e = e.negate(true);
        assert_eq!(e.effective().to_string(), "(NOT even)");
        assert_eq!(e.complement().to_string(), "even");
    }

    #[test]
    fn all_matches_everything() {
        let e = Evaluator::<i32>::all();
        assert!(e.matches(&1));
        assert!(!e.clone().negate(true).matches(&1));
    }

    #[test]
    fn lazy_scan_both_ends() {
        let data = [1, 2, 3, 4, 5, 6];
        let e = Evaluator::new(even());
        let mut m = Matches::new(&e, &data, true);
        assert_eq!(m.next(), Some(&2));
        assert_eq!(m.next_back(), Some(&6));
        assert_eq!(m.collect::<Vec<_>>(), vec![&4]);
    }

    #[test]
    fn sorted_matches() {
        let data = [1, 2, 3, 4, 5, 6];
        let e = Evaluator::new(even()).sort(OrderBy::desc("n", |n: &i32| *n));
        let m: Vec<_> = Matches::new(&e, &data, true).copied().collect();
        assert_eq!(m, vec![6, 4, 2]);
        let failed: Vec<_> = Matches::new(&e, &data, false).copied().collect();
        assert_eq!(failed, vec![5, 3, 1]);
    }

    #[test]
    fn evaluator_is_send_and_sync() {
        fn assert_send_sync<X: Send + Sync>() {}
        assert_send_sync::<Evaluator<String>>();
        assert_send_sync::<Predicate<String>>();
        assert_send_sync::<Sort<String>>();
    }
}
