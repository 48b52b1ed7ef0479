//! Deferred data sources.
//!
//! A [`QueryHandle`] is a lazily executed query plan: refining it (`filter`,
//! `order`, `slice`) only records intent, and nothing runs until `count` or
//! `fetch` is awaited. [`MemoryQuery`] is the in-process implementation.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{Predicate, Sort};

/// A deferred, refinable query over entities of type `T`.
///
/// Refinements compose: filters are ANDed, the latest order replaces any
/// previous one, and slices narrow the current window (the offset of a later
/// slice is relative to the earlier one).
#[async_trait]
pub trait QueryHandle<T>: Send + Sync + Sized
where
    T: Send + 'static,
{
    /// Failure reported by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Keep only entities satisfying `predicate`.
    fn filter(self, predicate: Predicate<T>) -> Self;

    /// Order results by `sort`.
    fn order(self, sort: Sort<T>) -> Self;

    /// Skip `offset` results and keep at most `limit`.
    fn slice(self, offset: usize, limit: usize) -> Self;

    /// Number of results the plan currently yields.
    async fn count(&self) -> Result<usize, Self::Error>;

    /// Materialize the results.
    async fn fetch(&self) -> Result<Vec<T>, Self::Error>;
}

/// In-memory [`QueryHandle`] over shared data.
///
/// Cloning is cheap: the data is shared and only the plan is copied.
///
/// # Example
///
/// ```
/// use siftflow::{MemoryQuery, Predicate, QueryHandle};
///
/// # tokio_test_block(async {
/// let query = MemoryQuery::new(vec![1, 2, 3, 4, 5])
///     .filter(Predicate::test("odd", |n: &i32| n % 2 == 1))
///     .slice(1, 5);
/// assert_eq!(query.fetch().await.unwrap(), vec![3, 5]);
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct MemoryQuery<T> {
    data: Arc<[T]>,
    filters: Vec<Predicate<T>>,
    sort: Option<Sort<T>>,
    offset: usize,
    limit: Option<usize>,
}

impl<T> MemoryQuery<T> {
    pub fn new(data: impl Into<Arc<[T]>>) -> Self {
        Self {
            data: data.into(),
            filters: Vec::new(),
            sort: None,
            offset: 0,
            limit: None,
        }
    }

    /// Total number of rows before any refinement.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn rows(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self
            .data
            .iter()
            .filter(|row| self.filters.iter().all(|p| p.evaluate(row)))
            .collect();
        if let Some(sort) = &self.sort {
            sort.sort_refs(&mut rows);
        }
        rows.into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

impl<T> Clone for MemoryQuery<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            filters: self.filters.clone(),
            sort: self.sort.clone(),
            offset: self.offset,
            limit: self.limit,
        }
    }
}

impl<T> fmt::Debug for MemoryQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryQuery")
            .field("rows", &self.data.len())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .finish()
    }
}

#[async_trait]
impl<T> QueryHandle<T> for MemoryQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Error = Infallible;

    fn filter(mut self, predicate: Predicate<T>) -> Self {
        self.filters.push(predicate);
        self
    }

    fn order(mut self, sort: Sort<T>) -> Self {
        self.sort = Some(sort);
        self
    }

    fn slice(mut self, offset: usize, limit: usize) -> Self {
        let remaining = self.limit.map(|l| l.saturating_sub(offset));
        self.offset = self.offset.saturating_add(offset);
        self.limit = Some(remaining.map_or(limit, |r| r.min(limit)));
        self
    }

    async fn count(&self) -> Result<usize, Infallible> {
        Ok(self.rows().len())
    }

    async fn fetch(&self) -> Result<Vec<T>, Infallible> {
        Ok(self.rows().into_iter().cloned().collect())
    }
}
