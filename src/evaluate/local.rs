use std::hash::Hash;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::debug;

use super::reduce;
use super::{Evaluator, Matches};
use crate::error::{Error, Result};
use crate::types::page::{BlockWindow, PageWindow};
use crate::types::{BlockPage, Numeric, Sort};

/// Synchronous operations over a materialized slice.
///
/// Results borrow from the source. Operations that return sequences follow
/// the configured sort, or source order when there is none.
impl<T> Evaluator<T> {
    fn enter(&self, operation: &'static str, source: &[T]) {
        debug!(
            operation,
            rows = source.len(),
            negate = self.negate,
            sorted = self.sort.is_some(),
            "evaluating"
        );
    }

    /// Evaluate a single entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullEntity`] when `entity` is `None`.
    pub fn evaluate<'x>(&self, entity: impl Into<Option<&'x T>>) -> Result<bool>
    where
        T: 'x,
    {
        entity
            .into()
            .map(|e| self.matches(e))
            .ok_or(Error::NullEntity)
    }

    /// Whether any element matches.
    pub fn any(&self, source: &[T]) -> bool {
        self.enter("any", source);
        source.iter().any(|row| self.matches(row))
    }

    pub fn count(&self, source: &[T]) -> usize {
        self.enter("count", source);
        source.iter().filter(|row| self.matches(row)).count()
    }

    /// Every matching element.
    pub fn filter_all<'e, 'a>(&'e self, source: &'a [T]) -> Matches<'e, 'a, T> {
        self.enter("filter_all", source);
        Matches::new(self, source, true)
    }

    /// Every element that does not match.
    pub fn failed_all<'e, 'a>(&'e self, source: &'a [T]) -> Matches<'e, 'a, T> {
        self.enter("failed_all", source);
        Matches::new(self, source, false)
    }

    /// One page of matches; pages start at 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `page` or `page_size` is zero.
    pub fn page<'a>(&self, source: &'a [T], page: usize, page_size: usize) -> Result<Vec<&'a T>> {
        let window = PageWindow::page(page, page_size)?;
        debug!(page, page_size, "page");
        Ok(self
            .filter_all(source)
            .skip(window.offset)
            .take(window.limit)
            .collect())
    }

    /// The first `count` matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `count` is zero.
    pub fn top<'a>(&self, source: &'a [T], count: usize) -> Result<Vec<&'a T>> {
        let window = PageWindow::top(count)?;
        Ok(self.filter_all(source).take(window.limit).collect())
    }

    /// A page read from inside one block of matches.
    ///
    /// The page is cut at the block end, so a page that straddles two blocks
    /// (or a `page_size` larger than `block_size`) comes back short.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any size is zero.
    pub fn block_page<'a>(
        &self,
        source: &'a [T],
        block_size: usize,
        page: usize,
        page_size: usize,
    ) -> Result<BlockPage<&'a T>> {
        let window = BlockWindow::new(block_size, page, page_size)?;
        debug!(block_size, page, page_size, "block_page");
        let block: Vec<&'a T> = self
            .filter_all(source)
            .skip(window.block_offset)
            .take(block_size)
            .collect();
        Ok(window.cut(block))
    }

    /// The first match for each distinct key.
    pub fn distinct<'a, K, F>(&self, source: &'a [T], key: F) -> Vec<&'a T>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        reduce::distinct(self.filter_all(source), key)
    }

    /// Every match whose key is shared with another match.
    pub fn duplicates<'a, K, F>(&self, source: &'a [T], key: F) -> Vec<&'a T>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        reduce::duplicates(self.filter_all(source), key)
    }

    /// Matches grouped by key, groups in first-seen order.
    pub fn group_by<'a, K, F>(&self, source: &'a [T], key: F) -> IndexMap<K, Vec<&'a T>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        reduce::group_by(self.filter_all(source), key)
    }

    pub fn count_by_group<K, F>(&self, source: &[T], key: F) -> IndexMap<K, usize>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        self.group_by(source, key)
            .into_iter()
            .map(|(k, rows)| (k, rows.len()))
            .collect()
    }

    /// Sum of `value` per group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if a group's total does not fit in `N`.
    pub fn sum_by_group<K, N, F, S>(
        &self,
        source: &[T],
        key: F,
        value: S,
    ) -> Result<IndexMap<K, N>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
    {
        reduce::per_group(self.group_by(source, key), |rows| {
            reduce::sum(rows.into_iter().map(&value), "sum_by_group")
        })
    }

    /// Smallest value per group.
    ///
    /// # Errors
    ///
    /// Never fails for the groups produced here (every group has a member);
    /// the signature matches [`min`](Self::min).
    pub fn min_by_group<K, N, F, S>(&self, source: &[T], key: F, value: S) -> Result<IndexMap<K, N>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
    {
        reduce::per_group(self.group_by(source, key), |rows| {
            reduce::min(rows.into_iter().map(&value), "min_by_group")
        })
    }

    /// Largest value per group.
    ///
    /// # Errors
    ///
    /// See [`min_by_group`](Self::min_by_group).
    pub fn max_by_group<K, N, F, S>(&self, source: &[T], key: F, value: S) -> Result<IndexMap<K, N>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
    {
        reduce::per_group(self.group_by(source, key), |rows| {
            reduce::max(rows.into_iter().map(&value), "max_by_group")
        })
    }

    /// Exact decimal mean per group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a value has no decimal form (NaN,
    /// infinity).
    pub fn average_by_group<K, N, F, S>(
        &self,
        source: &[T],
        key: F,
        value: S,
    ) -> Result<IndexMap<K, Decimal>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
    {
        reduce::per_group(self.group_by(source, key), |rows| {
            reduce::average(rows.into_iter().map(&value), "average_by_group")
        })
    }

    /// Fold each group's values with `f`, starting from zero.
    pub fn aggregate_by_group<K, N, F, S, A>(
        &self,
        source: &[T],
        key: F,
        value: S,
        f: A,
    ) -> IndexMap<K, N>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
        A: Fn(N, N) -> N,
    {
        self.group_by(source, key)
            .into_iter()
            .map(|(k, rows)| (k, reduce::fold(rows.into_iter().map(&value), &f)))
            .collect()
    }

    /// Groups with more than one member.
    pub fn duplicates_by_group<'a, K, F>(&self, source: &'a [T], key: F) -> IndexMap<K, Vec<&'a T>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        reduce::duplicate_groups(self.group_by(source, key))
    }

    /// The single member of every group that has exactly one.
    pub fn uniques_by_group<'a, K, F>(&self, source: &'a [T], key: F) -> IndexMap<K, &'a T>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        reduce::unique_groups(self.group_by(source, key))
    }

    /// The first `count` members of each group, ordered by `order`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `count` is zero.
    pub fn top_by_group<'a, K, F>(
        &self,
        source: &'a [T],
        key: F,
        count: usize,
        order: impl Into<Sort<T>>,
    ) -> Result<IndexMap<K, Vec<&'a T>>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        Error::positive("count", count)?;
        Ok(reduce::top_groups(
            self.group_by(source, key),
            count,
            &order.into(),
        ))
    }

    /// Sum of `value` over matches; zero when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the total does not fit in `N`.
    pub fn sum<N, S>(&self, source: &[T], value: S) -> Result<N>
    where
        N: Numeric,
        S: Fn(&T) -> N,
    {
        reduce::sum(self.filter_all(source).map(value), "sum")
    }

    /// # Errors
    ///
    /// Returns [`Error::EmptyAggregation`] when nothing matches.
    pub fn min<N, S>(&self, source: &[T], value: S) -> Result<N>
    where
        N: Numeric,
        S: Fn(&T) -> N,
    {
        reduce::min(self.filter_all(source).map(value), "min")
    }

    /// # Errors
    ///
    /// Returns [`Error::EmptyAggregation`] when nothing matches.
    pub fn max<N, S>(&self, source: &[T], value: S) -> Result<N>
    where
        N: Numeric,
        S: Fn(&T) -> N,
    {
        reduce::max(self.filter_all(source).map(value), "max")
    }

    /// Exact decimal mean of `value` over matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAggregation`] when nothing matches and
    /// [`Error::InvalidArgument`] for values with no decimal form.
    pub fn average<N, S>(&self, source: &[T], value: S) -> Result<Decimal>
    where
        N: Numeric,
        S: Fn(&T) -> N,
    {
        reduce::average(self.filter_all(source).map(value), "average")
    }

    /// Fold `value` over matches with `f`, starting from zero.
    pub fn aggregate<N, S, A>(&self, source: &[T], value: S, f: A) -> N
    where
        N: Numeric,
        S: Fn(&T) -> N,
        A: Fn(N, N) -> N,
    {
        reduce::fold(self.filter_all(source).map(value), f)
    }

    fn ordered<'a>(&self, source: &'a [T]) -> Vec<&'a T> {
        let mut rows: Vec<&'a T> = source.iter().collect();
        if let Some(sort) = &self.sort {
            sort.sort_refs(&mut rows);
        }
        rows
    }

    /// Position of the first match in the ordered (unfiltered) source.
    pub fn first_match_index(&self, source: &[T]) -> Option<usize> {
        self.enter("first_match_index", source);
        self.ordered(source)
            .into_iter()
            .position(|row| self.matches(row))
    }

    /// Position of the last match in the ordered (unfiltered) source.
    pub fn last_match_index(&self, source: &[T]) -> Option<usize> {
        self.enter("last_match_index", source);
        self.ordered(source)
            .into_iter()
            .rposition(|row| self.matches(row))
    }

    pub fn first<'a>(&self, source: &'a [T]) -> Option<&'a T> {
        self.filter_all(source).next()
    }

    pub fn last<'a>(&self, source: &'a [T]) -> Option<&'a T> {
        self.filter_all(source).next_back()
    }

    pub fn first_failed<'a>(&self, source: &'a [T]) -> Option<&'a T> {
        self.failed_all(source).next()
    }

    pub fn last_failed<'a>(&self, source: &'a [T]) -> Option<&'a T> {
        self.failed_all(source).next_back()
    }
}
