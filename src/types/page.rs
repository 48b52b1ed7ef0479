use crate::error::{Error, Result};

/// Default option values.
pub mod defaults {
    /// First page number.
    pub const PAGE: usize = 1;
    /// Page size used when none is given.
    pub const PAGE_SIZE: usize = 10;
    /// Block size for block pagination.
    pub const BLOCK_SIZE: usize = 1000;
    /// Page size within a block.
    pub const BLOCK_PAGE_SIZE: usize = 100;
}

/// One page read out of a larger block of matches.
///
/// Only the block that contains the requested page is materialized; callers
/// page within it and fetch the next block when `has_more_blocks` is set and
/// the current block is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub block_size: usize,
    /// Number of elements in the fetched block.
    pub items_in_block: usize,
    /// A full block was fetched, so the next block may hold more matches.
    pub has_more_blocks: bool,
}

impl<T> BlockPage<T> {
    /// Zero-based index of the block holding this page. Zero for a page or
    /// block size of zero.
    #[must_use]
    pub fn block(&self) -> usize {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .checked_div(self.block_size)
            .unwrap_or(0)
    }

    /// Transform the items, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> BlockPage<U> {
        BlockPage {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            block_size: self.block_size,
            items_in_block: self.items_in_block,
            has_more_blocks: self.has_more_blocks,
        }
    }
}

/// Validated offsets for page based reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    pub(crate) fn page(page: usize, page_size: usize) -> Result<Self> {
        Error::positive("page", page)?;
        Error::positive("page_size", page_size)?;
        Ok(Self {
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        })
    }

    pub(crate) fn top(count: usize) -> Result<Self> {
        Error::positive("count", count)?;
        Ok(Self {
            offset: 0,
            limit: count,
        })
    }
}

/// Validated block coordinates for a block page read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockWindow {
    pub block_size: usize,
    pub page: usize,
    pub page_size: usize,
    /// Offset of the block in the filtered sequence.
    pub block_offset: usize,
    /// Offset of the page inside the block.
    pub local_offset: usize,
}

impl BlockWindow {
    pub(crate) fn new(block_size: usize, page: usize, page_size: usize) -> Result<Self> {
        Error::positive("block_size", block_size)?;
        Error::positive("page", page)?;
        Error::positive("page_size", page_size)?;
        let start = (page - 1).saturating_mul(page_size);
        let block = start / block_size;
        Ok(Self {
            block_size,
            page,
            page_size,
            block_offset: block.saturating_mul(block_size),
            local_offset: start % block_size,
        })
    }

    /// Cut the page out of an already fetched block.
    pub(crate) fn cut<T>(&self, block: Vec<T>) -> BlockPage<T> {
        let items_in_block = block.len();
        let items = block
            .into_iter()
            .skip(self.local_offset)
            .take(self.page_size)
            .collect();
        BlockPage {
            items,
            page: self.page,
            page_size: self.page_size,
            block_size: self.block_size,
            items_in_block,
            has_more_blocks: items_in_block == self.block_size,
        }
    }
}
