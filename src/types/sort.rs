//! Ordering types for result sorting.
//!
//! An [`OrderBy`] pairs a key accessor with a [`Dir`]; a [`Sort`] chains a
//! primary ordering with any number of secondary ones.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dir {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type CompareFn<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

fn total_cmp<K: PartialOrd>(a: &K, b: &K) -> Ordering {
    if let Some(ord) = a.partial_cmp(b) {
        return ord;
    }
    let a_nan = a.partial_cmp(a).is_none();
    let b_nan = b.partial_cmp(b).is_none();
    match (a_nan, b_nan) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// A single ordering clause: a named key and a direction.
///
/// Keys that are not comparable with themselves (NaN) sort as the largest
/// key and are equal to each other, so the order stays total.
pub struct OrderBy<T: ?Sized> {
    name: Arc<str>,
    dir: Dir,
    cmp: Arc<CompareFn<T>>,
}

impl<T: ?Sized> OrderBy<T> {
    /// Ordering by `key` in the given direction.
    pub fn new<K, F>(name: impl Into<Arc<str>>, dir: Dir, key: F) -> Self
    where
        K: PartialOrd,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            dir,
            cmp: Arc::new(move |a: &T, b: &T| total_cmp(&key(a), &key(b))),
        }
    }

    pub fn asc<K, F>(name: impl Into<Arc<str>>, key: F) -> Self
    where
        K: PartialOrd,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::new(name, Dir::Asc, key)
    }

    pub fn desc<K, F>(name: impl Into<Arc<str>>, key: F) -> Self
    where
        K: PartialOrd,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::new(name, Dir::Desc, key)
    }

    /// The key name, used for display and by remote handles.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// The same key in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let dir = match self.dir {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        };
        Self {
            name: Arc::clone(&self.name),
            dir,
            cmp: Arc::clone(&self.cmp),
        }
    }

    /// Compares two items according to this clause, direction applied.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.dir.apply((self.cmp)(a, b))
    }
}

impl<T: ?Sized> Clone for OrderBy<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            dir: self.dir,
            cmp: Arc::clone(&self.cmp),
        }
    }
}

impl<T: ?Sized> fmt::Debug for OrderBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy")
            .field("name", &self.name)
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized> fmt::Display for OrderBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.dir)
    }
}

/// A primary ordering followed by secondary tie-breakers.
///
/// # Example
///
/// ```
/// use siftflow::{OrderBy, Sort};
///
/// let sort = Sort::by(OrderBy::desc("score", |p: &(u32, &str)| p.0))
///     .then_by(OrderBy::asc("name", |p: &(u32, &str)| p.1.to_owned()));
///
/// let mut people = vec![(10, "bo"), (30, "al"), (10, "ann")];
/// sort.sort_slice(&mut people);
/// assert_eq!(people, vec![(30, "al"), (10, "ann"), (10, "bo")]);
/// ```
pub struct Sort<T: ?Sized> {
    primary: OrderBy<T>,
    secondary: Vec<OrderBy<T>>,
}

impl<T: ?Sized> Sort<T> {
    #[must_use]
    pub fn by(primary: OrderBy<T>) -> Self {
        Self {
            primary,
            secondary: Vec::new(),
        }
    }

    /// Append a tie-breaker. Tie-breakers apply in the order they are added.
    #[must_use]
    pub fn then_by(mut self, order: OrderBy<T>) -> Self {
        self.secondary.push(order);
        self
    }

    #[must_use]
    pub fn primary(&self) -> &OrderBy<T> {
        &self.primary
    }

    #[must_use]
    pub fn secondary(&self) -> &[OrderBy<T>] {
        &self.secondary
    }

    /// Every clause, primary first.
    pub fn clauses(&self) -> impl Iterator<Item = &OrderBy<T>> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.clauses()
            .map(|order| order.compare(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Stable in-place sort of borrowed items.
    pub fn sort_refs(&self, items: &mut [&T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

impl<T> Sort<T> {
    /// Stable in-place sort of owned items.
    pub fn sort_slice(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

impl<T: ?Sized> From<OrderBy<T>> for Sort<T> {
    fn from(order: OrderBy<T>) -> Self {
        Self::by(order)
    }
}

impl<T: ?Sized> Clone for Sort<T> {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Sort<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sort")
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .finish()
    }
}

impl<T: ?Sized> fmt::Display for Sort<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary)?;
        for order in &self.secondary {
            write!(f, ", {order}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        group: &'static str,
        score: f64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, group: "b", score: 2.0 },
            Row { id: 2, group: "a", score: 2.0 },
            Row { id: 3, group: "b", score: 1.0 },
            Row { id: 4, group: "a", score: f64::NAN },
        ]
    }

    fn ids(rows: &[Row]) -> Vec<u32> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Dir::default(), Dir::Asc);
    }

    #[test]
    fn primary_only_is_stable() {
        let mut data = rows();
        Sort::by(OrderBy::asc("group", |r: &Row| r.group)).sort_slice(&mut data);
        assert_eq!(ids(&data), vec![2, 4, 1, 3]);
    }

    #[test]
    fn secondary_breaks_ties() {
        let mut data = rows();
        Sort::by(OrderBy::asc("group", |r: &Row| r.group))
            .then_by(OrderBy::desc("id", |r: &Row| r.id))
            .sort_slice(&mut data);
        assert_eq!(ids(&data), vec![4, 2, 3, 1]);
    }

    #[test]
    fn nan_sorts_last_and_ties_fall_through() {
        let a = Row { id: 1, group: "x", score: f64::NAN };
        let b = Row { id: 2, group: "x", score: 1.0 };
        let c = Row { id: 3, group: "x", score: f64::NAN };
        let sort = Sort::by(OrderBy::asc("score", |r: &Row| r.score))
            .then_by(OrderBy::asc("id", |r: &Row| r.id));
        assert_eq!(sort.compare(&a, &b), Ordering::Greater);
        assert_eq!(sort.compare(&b, &a), Ordering::Less);
        assert_eq!(sort.compare(&a, &c), Ordering::Less);
    }

    #[test]
    fn sort_refs_matches_sort_slice() {
        let data = rows();
        let sort = Sort::by(OrderBy::desc("score", |r: &Row| r.score))
            .then_by(OrderBy::asc("id", |r: &Row| r.id));
        let mut refs: Vec<&Row> = data.iter().collect();
        sort.sort_refs(&mut refs);
        let mut owned = data.clone();
        sort.sort_slice(&mut owned);
        let by_ref: Vec<u32> = refs.iter().map(|r| r.id).collect();
        assert_eq!(by_ref, ids(&owned));
    }

    #[test]
    fn reversed_flips_direction() {
        let order = OrderBy::asc("id", |r: &Row| r.id);
        let rev = order.reversed();
        assert_eq!(rev.dir(), Dir::Desc);
        assert_eq!(rev.name(), "id");
        let data = rows();
        assert_eq!(order.compare(&data[0], &data[1]), Ordering::Less);
        assert_eq!(rev.compare(&data[0], &data[1]), Ordering::Greater);
    }

    #[test]
    fn display() {
        let sort = Sort::by(OrderBy::asc("group", |r: &Row| r.group))
            .then_by(OrderBy::desc("score", |r: &Row| r.score));
        assert_eq!(sort.to_string(), "group asc, score desc");
    }
}
