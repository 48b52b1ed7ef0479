use std::fmt;

use super::condition::ConditionBuilder;
use super::page::{defaults, PageWindow};
use super::predicate::Predicate;
use super::sort::{OrderBy, Sort};
use crate::error::{Error, Result};
use crate::evaluate::Evaluator;
use crate::source::QueryHandle;

/// A reusable bundle of filter, ordering, paging and top-N options.
///
/// Paging applies when either a page or a page size is set; the missing one
/// falls back to [`defaults`]. Top-N is applied after paging.
///
/// # Example
///
/// ```
/// use siftflow::{OrderBy, Predicate, QuerySpec};
///
/// let spec = QuerySpec::new()
///     .with_filter(Predicate::test("odd", |n: &u32| n % 2 == 1))
///     .order_by(OrderBy::desc("n", |n: &u32| *n))
///     .with_pagination(1, 2)?;
///
/// let data = [1, 2, 3, 4, 5, 6, 7];
/// let page: Vec<u32> = spec.apply(&data).into_iter().copied().collect();
/// assert_eq!(page, vec![7, 5]);
/// # Ok::<(), siftflow::Error>(())
/// ```
pub struct QuerySpec<T> {
    filter: Predicate<T>,
    negate: bool,
    order: Option<Sort<T>>,
    page: Option<usize>,
    page_size: Option<usize>,
    top: Option<usize>,
}

impl<T> Default for QuerySpec<T> {
    fn default() -> Self {
        Self {
            filter: Predicate::always(),
            negate: false,
            order: None,
            page: None,
            page_size: None,
            top: None,
        }
    }
}

impl<T> QuerySpec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Predicate<T>) -> Self {
        self.filter = filter;
        self
    }

    /// Use the current state of `builder` as the filter.
    #[must_use]
    pub fn with_condition(self, builder: &ConditionBuilder<T>) -> Self {
        self.with_filter(builder.build())
    }

    #[must_use]
    pub fn negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Set the primary ordering, discarding any previous ordering.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy<T>) -> Self {
        self.order = Some(Sort::by(order));
        self
    }

    /// Add a tie-breaker after the primary ordering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullArgument`] if no primary ordering was set.
    pub fn then_by(mut self, order: OrderBy<T>) -> Result<Self> {
        let sort = self.order.take().ok_or(Error::NullArgument {
            argument: "order_by",
        })?;
        self.order = Some(sort.then_by(order));
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either value is zero.
    pub fn with_pagination(self, page: usize, page_size: usize) -> Result<Self> {
        self.with_page(page)?.with_page_size(page_size)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `page` is zero.
    pub fn with_page(mut self, page: usize) -> Result<Self> {
        Error::positive("page", page)?;
        self.page = Some(page);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `page_size` is zero.
    pub fn with_page_size(mut self, page_size: usize) -> Result<Self> {
        Error::positive("page_size", page_size)?;
        self.page_size = Some(page_size);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `top` is zero.
    pub fn with_top(mut self, top: usize) -> Result<Self> {
        Error::positive("top", top)?;
        self.top = Some(top);
        Ok(self)
    }

    #[must_use]
    pub fn filter(&self) -> &Predicate<T> {
        &self.filter
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    #[must_use]
    pub fn ordering(&self) -> Option<&Sort<T>> {
        self.order.as_ref()
    }

    #[must_use]
    pub fn page(&self) -> Option<usize> {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    #[must_use]
    pub fn top(&self) -> Option<usize> {
        self.top
    }

    /// An evaluator carrying this filter, negation and ordering.
    #[must_use]
    pub fn evaluator(&self) -> Evaluator<T> {
        let evaluator = Evaluator::new(self.filter.clone()).negate(self.negate);
        match &self.order {
            Some(sort) => evaluator.sort(sort.clone()),
            None => evaluator,
        }
    }

    fn window(&self) -> Option<PageWindow> {
        if self.page.is_none() && self.page_size.is_none() {
            return None;
        }
        let page = self.page.unwrap_or(defaults::PAGE);
        let page_size = self.page_size.unwrap_or(defaults::PAGE_SIZE);
        PageWindow::page(page, page_size).ok()
    }

    /// Filter, order and page a slice.
    pub fn apply<'a>(&self, source: &'a [T]) -> Vec<&'a T> {
        let evaluator = self.evaluator();
        let rows = evaluator.filter_all(source);
        let rows: Vec<&'a T> = match self.window() {
            Some(w) => rows.skip(w.offset).take(w.limit).collect(),
            None => rows.collect(),
        };
        match self.top {
            Some(top) => rows.into_iter().take(top).collect(),
            None => rows,
        }
    }

    /// Narrow a deferred handle the same way [`apply`](Self::apply) narrows a
    /// slice.
    pub fn apply_to<Q>(&self, handle: Q) -> Q
    where
        T: Send + Sync + 'static,
        Q: QueryHandle<T> + Clone,
    {
        let mut handle = self.evaluator().on(handle).query();
        if let Some(w) = self.window() {
            handle = handle.slice(w.offset, w.limit);
        }
        if let Some(top) = self.top {
            handle = handle.slice(0, top);
        }
        handle
    }
}

impl<T> Clone for QuerySpec<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            negate: self.negate,
            order: self.order.clone(),
            page: self.page,
            page_size: self.page_size,
            top: self.top,
        }
    }
}

impl<T> fmt::Debug for QuerySpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySpec")
            .field("filter", &self.filter)
            .field("negate", &self.negate)
            .field("order", &self.order)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("top", &self.top)
            .finish()
    }
}
