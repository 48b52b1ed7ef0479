//! Predicates over collection fields.
//!
//! Works over any [`Collection`]: slices, `Vec`, boxed slices and optional
//! vectors (an absent vector is treated as empty).

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::types::Predicate;

/// A field that exposes its elements as a slice.
pub trait Collection {
    type Item;

    fn items(&self) -> &[Self::Item];
}

impl<V> Collection for [V] {
    type Item = V;

    fn items(&self) -> &[V] {
        self
    }
}

impl<V> Collection for Vec<V> {
    type Item = V;

    fn items(&self) -> &[V] {
        self
    }
}

impl<V> Collection for Box<[V]> {
    type Item = V;

    fn items(&self) -> &[V] {
        self
    }
}

impl<V> Collection for Option<Vec<V>> {
    type Item = V;

    fn items(&self) -> &[V] {
        self.as_deref().unwrap_or(&[])
    }
}

#[must_use]
pub fn is_empty<C: Collection + ?Sized + 'static>() -> Predicate<C> {
    Predicate::test("is empty", |c: &C| c.items().is_empty())
}

#[must_use]
pub fn not_empty<C: Collection + ?Sized + 'static>() -> Predicate<C> {
    Predicate::test("not empty", |c: &C| !c.items().is_empty())
}

#[must_use]
pub fn has_count<C: Collection + ?Sized + 'static>(count: usize) -> Predicate<C> {
    Predicate::test(format!("count == {count}"), move |c: &C| {
        c.items().len() == count
    })
}

#[must_use]
pub fn min_count<C: Collection + ?Sized + 'static>(min: usize) -> Predicate<C> {
    Predicate::test(format!("count >= {min}"), move |c: &C| c.items().len() >= min)
}

#[must_use]
pub fn max_count<C: Collection + ?Sized + 'static>(max: usize) -> Predicate<C> {
    Predicate::test(format!("count <= {max}"), move |c: &C| c.items().len() <= max)
}

#[must_use]
pub fn contains<C>(value: C::Item) -> Predicate<C>
where
    C: Collection + ?Sized + 'static,
    C::Item: PartialEq + Debug + Send + Sync,
{
    Predicate::test(format!("contains {value:?}"), move |c: &C| {
        c.items().contains(&value)
    })
}

/// Every one of `values` is present.
#[must_use]
pub fn contains_all<C>(values: impl IntoIterator<Item = C::Item>) -> Predicate<C>
where
    C: Collection + ?Sized + 'static,
    C::Item: PartialEq + Debug + Send + Sync,
{
    let values: Vec<C::Item> = values.into_iter().collect();
    Predicate::test(format!("contains all {values:?}"), move |c: &C| {
        let items = c.items();
        values.iter().all(|v| items.contains(v))
    })
}

/// At least one of `values` is present.
#[must_use]
pub fn contains_any<C>(values: impl IntoIterator<Item = C::Item>) -> Predicate<C>
where
    C: Collection + ?Sized + 'static,
    C::Item: PartialEq + Debug + Send + Sync,
{
    let values: Vec<C::Item> = values.into_iter().collect();
    Predicate::test(format!("contains any {values:?}"), move |c: &C| {
        let items = c.items();
        values.iter().any(|v| items.contains(v))
    })
}

/// Every element satisfies `element`. Vacuously true for an empty collection.
#[must_use]
pub fn all<C>(element: Predicate<C::Item>) -> Predicate<C>
where
    C: Collection + ?Sized + 'static,
    C::Item: 'static,
{
    Predicate::test(format!("all {element}"), move |c: &C| {
        c.items().iter().all(|item| element.evaluate(item))
    })
}

/// At least one element satisfies `element`.
#[must_use]
pub fn any<C>(element: Predicate<C::Item>) -> Predicate<C>
where
    C: Collection + ?Sized + 'static,
    C::Item: 'static,
{
    Predicate::test(format!("any {element}"), move |c: &C| {
        c.items().iter().any(|item| element.evaluate(item))
    })
}

/// No element appears twice.
#[must_use]
pub fn distinct_items<C>() -> Predicate<C>
where
    C: Collection + ?Sized + 'static,
    C::Item: Hash + Eq,
{
    Predicate::test("distinct items", |c: &C| {
        let mut seen = HashSet::with_capacity(c.items().len());
        c.items().iter().all(|item| seen.insert(item))
    })
}
