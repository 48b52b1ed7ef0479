use std::any::type_name;
use std::hash::Hash;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{reduce, Evaluator};
use crate::error::{Error, Result};
use crate::source::QueryHandle;
use crate::types::page::{BlockWindow, PageWindow};
use crate::types::{BlockPage, Numeric, Sort};

/// An [`Evaluator`] bound to a deferred [`QueryHandle`].
///
/// Refining methods (`query`, `page_query`, ...) return a narrowed handle
/// without executing anything. Executing methods are `async` and only
/// suspend inside the handle; drop the future to cancel. Handle failures are
/// wrapped in [`Error::OperationFailed`].
pub struct Deferred<'e, T, Q> {
    evaluator: &'e Evaluator<T>,
    handle: Q,
}

impl<T> Evaluator<T>
where
    T: Send + Sync + 'static,
{
    /// Bind this evaluator to a deferred source.
    pub fn on<Q: QueryHandle<T> + Clone>(&self, handle: Q) -> Deferred<'_, T, Q> {
        Deferred {
            evaluator: self,
            handle,
        }
    }
}

fn failed<T, E>(operation: &'static str) -> impl FnOnce(E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |source| {
        let entity = type_name::<T>();
        warn!(operation, entity, error = %source, "query handle failed");
        Error::OperationFailed {
            operation,
            entity,
            source: Box::new(source),
        }
    }
}

impl<T, Q> Deferred<'_, T, Q>
where
    T: Send + Sync + 'static,
    Q: QueryHandle<T> + Clone,
{
    fn ordered(&self, handle: Q) -> Q {
        match self.evaluator.ordering() {
            Some(sort) => handle.order(sort.clone()),
            None => handle,
        }
    }

    /// The handle narrowed to matching entities, ordered.
    #[must_use]
    pub fn query(&self) -> Q {
        self.ordered(self.handle.clone().filter(self.evaluator.effective()))
    }

    /// The handle narrowed to entities that do not match, ordered.
    #[must_use]
    pub fn failed_query(&self) -> Q {
        self.ordered(self.handle.clone().filter(self.evaluator.complement()))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `page` or `page_size` is zero.
    pub fn page_query(&self, page: usize, page_size: usize) -> Result<Q> {
        let window = PageWindow::page(page, page_size)?;
        Ok(self.query().slice(window.offset, window.limit))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `count` is zero.
    pub fn top_query(&self, count: usize) -> Result<Q> {
        let window = PageWindow::top(count)?;
        Ok(self.query().slice(window.offset, window.limit))
    }

    /// The handle narrowed to `page` of the block that holds it.
    ///
    /// The slice starts at the page's offset inside its block and takes
    /// `page_size` entities. Unlike [`block_page`](Self::block_page) it is not
    /// cut at the block end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any size is zero.
    pub fn block_page_query(&self, block_size: usize, page: usize, page_size: usize) -> Result<Q> {
        let window = BlockWindow::new(block_size, page, page_size)?;
        Ok(self
            .query()
            .slice(window.block_offset.saturating_add(window.local_offset), window.page_size))
    }

    async fn fetch(&self, handle: &Q, operation: &'static str) -> Result<Vec<T>> {
        debug!(operation, entity = type_name::<T>(), "fetching");
        handle.fetch().await.map_err(failed::<T, _>(operation))
    }

    async fn count_of(&self, handle: &Q, operation: &'static str) -> Result<usize> {
        debug!(operation, entity = type_name::<T>(), "counting");
        handle.count().await.map_err(failed::<T, _>(operation))
    }

    async fn matching(&self, operation: &'static str) -> Result<Vec<T>> {
        self.fetch(&self.query(), operation).await
    }

    async fn last_of(&self, handle: Q, operation: &'static str) -> Result<Option<T>> {
        let total = self.count_of(&handle, operation).await?;
        if total == 0 {
            return Ok(None);
        }
        let tail = handle.slice(total - 1, 1);
        Ok(self.fetch(&tail, operation).await?.pop())
    }

    pub async fn any(&self) -> Result<bool> {
        let head = self.query().slice(0, 1);
        Ok(self.count_of(&head, "any").await? > 0)
    }

    pub async fn count(&self) -> Result<usize> {
        self.count_of(&self.query(), "count").await
    }

    /// Every matching entity.
    pub async fn all(&self) -> Result<Vec<T>> {
        self.matching("all").await
    }

    pub async fn page(&self, page: usize, page_size: usize) -> Result<Vec<T>> {
        let handle = self.page_query(page, page_size)?;
        self.fetch(&handle, "page").await
    }

    pub async fn top(&self, count: usize) -> Result<Vec<T>> {
        let handle = self.top_query(count)?;
        self.fetch(&handle, "top").await
    }

    /// Reads one block from the handle and cuts the page out of it.
    pub async fn block_page(
        &self,
        block_size: usize,
        page: usize,
        page_size: usize,
    ) -> Result<BlockPage<T>> {
        let window = BlockWindow::new(block_size, page, page_size)?;
        let handle = self
            .query()
            .slice(window.block_offset, window.block_size);
        let block = self.fetch(&handle, "block_page").await?;
        Ok(window.cut(block))
    }

    pub async fn first(&self) -> Result<Option<T>> {
        let head = self.query().slice(0, 1);
        Ok(self.fetch(&head, "first").await?.into_iter().next())
    }

    pub async fn last(&self) -> Result<Option<T>> {
        self.last_of(self.query(), "last").await
    }

    pub async fn first_failed(&self) -> Result<Option<T>> {
        let head = self.failed_query().slice(0, 1);
        Ok(self.fetch(&head, "first_failed").await?.into_iter().next())
    }

    pub async fn last_failed(&self) -> Result<Option<T>> {
        self.last_of(self.failed_query(), "last_failed").await
    }

    pub async fn distinct<K, F>(&self, key: F) -> Result<Vec<T>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        Ok(reduce::distinct(self.matching("distinct").await?, key))
    }

    pub async fn duplicates<K, F>(&self, key: F) -> Result<Vec<T>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        Ok(reduce::duplicates(self.matching("duplicates").await?, key))
    }

    pub async fn group_by<K, F>(&self, key: F) -> Result<IndexMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        Ok(reduce::group_by(self.matching("group_by").await?, key))
    }

    pub async fn count_by_group<K, F>(&self, key: F) -> Result<IndexMap<K, usize>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        let groups = reduce::group_by(self.matching("count_by_group").await?, key);
        Ok(groups.into_iter().map(|(k, rows)| (k, rows.len())).collect())
    }

    pub async fn sum_by_group<K, N, F, S>(&self, key: F, value: S) -> Result<IndexMap<K, N>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
    {
        let groups = reduce::group_by(self.matching("sum_by_group").await?, key);
        reduce::per_group(groups, |rows| {
            reduce::sum(rows.iter().map(&value), "sum_by_group")
        })
    }

    pub async fn min_by_group<K, N, F, S>(&self, key: F, value: S) -> Result<IndexMap<K, N>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
    {
        let groups = reduce::group_by(self.matching("min_by_group").await?, key);
        reduce::per_group(groups, |rows| {
            reduce::min(rows.iter().map(&value), "min_by_group")
        })
    }

    pub async fn max_by_group<K, N, F, S>(&self, key: F, value: S) -> Result<IndexMap<K, N>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
    {
        let groups = reduce::group_by(self.matching("max_by_group").await?, key);
        reduce::per_group(groups, |rows| {
            reduce::max(rows.iter().map(&value), "max_by_group")
        })
    }

    pub async fn average_by_group<K, N, F, S>(
        &self,
        key: F,
        value: S,
    ) -> Result<IndexMap<K, Decimal>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
    {
        let groups = reduce::group_by(self.matching("average_by_group").await?, key);
        reduce::per_group(groups, |rows| {
            reduce::average(rows.iter().map(&value), "average_by_group")
        })
    }

    pub async fn aggregate_by_group<K, N, F, S, A>(
        &self,
        key: F,
        value: S,
        f: A,
    ) -> Result<IndexMap<K, N>>
    where
        K: Hash + Eq,
        N: Numeric,
        F: Fn(&T) -> K,
        S: Fn(&T) -> N,
        A: Fn(N, N) -> N,
    {
        let groups = reduce::group_by(self.matching("aggregate_by_group").await?, key);
        reduce::per_group(groups, |rows| {
            Ok(reduce::fold(rows.iter().map(&value), &f))
        })
    }

    pub async fn duplicates_by_group<K, F>(&self, key: F) -> Result<IndexMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        let groups = reduce::group_by(self.matching("duplicates_by_group").await?, key);
        Ok(reduce::duplicate_groups(groups))
    }

    pub async fn uniques_by_group<K, F>(&self, key: F) -> Result<IndexMap<K, T>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        let groups = reduce::group_by(self.matching("uniques_by_group").await?, key);
        Ok(reduce::unique_groups(groups))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `count` is zero, before touching
    /// the handle.
    pub async fn top_by_group<K, F>(
        &self,
        key: F,
        count: usize,
        order: impl Into<Sort<T>>,
    ) -> Result<IndexMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        Error::positive("count", count)?;
        let order = order.into();
        let groups = reduce::group_by(self.matching("top_by_group").await?, key);
        Ok(reduce::top_groups(groups, count, &order))
    }

    pub async fn sum<N, S>(&self, value: S) -> Result<N>
    where
        N: Numeric,
        S: Fn(&T) -> N,
    {
        let rows = self.matching("sum").await?;
        reduce::sum(rows.iter().map(value), "sum")
    }

    pub async fn min<N, S>(&self, value: S) -> Result<N>
    where
        N: Numeric,
        S: Fn(&T) -> N,
    {
        let rows = self.matching("min").await?;
        reduce::min(rows.iter().map(value), "min")
    }

    pub async fn max<N, S>(&self, value: S) -> Result<N>
    where
        N: Numeric,
        S: Fn(&T) -> N,
    {
        let rows = self.matching("max").await?;
        reduce::max(rows.iter().map(value), "max")
    }

    pub async fn average<N, S>(&self, value: S) -> Result<Decimal>
    where
        N: Numeric,
        S: Fn(&T) -> N,
    {
        let rows = self.matching("average").await?;
        reduce::average(rows.iter().map(value), "average")
    }

    pub async fn aggregate<N, S, A>(&self, value: S, f: A) -> Result<N>
    where
        N: Numeric,
        S: Fn(&T) -> N,
        A: Fn(N, N) -> N,
    {
        let rows = self.matching("aggregate").await?;
        Ok(reduce::fold(rows.iter().map(value), f))
    }

    /// Position of the first match in the ordered, unfiltered handle.
    pub async fn first_match_index(&self) -> Result<Option<usize>> {
        let rows = self
            .fetch(&self.ordered(self.handle.clone()), "first_match_index")
            .await?;
        Ok(rows.iter().position(|row| self.evaluator.matches(row)))
    }

    /// Position of the last match in the ordered, unfiltered handle.
    pub async fn last_match_index(&self) -> Result<Option<usize>> {
        let rows = self
            .fetch(&self.ordered(self.handle.clone()), "last_match_index")
            .await?;
        Ok(rows.iter().rposition(|row| self.evaluator.matches(row)))
    }
}
