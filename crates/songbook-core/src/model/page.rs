use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::song::Song;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size served; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated page request: `page >= 1`, `1 <= page_size <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Build a page request, clamping `page_size` to [`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidData`] when `page` or `page_size` is zero.
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        if page == 0 {
            return Err(Error::InvalidData("page must be at least 1".to_string()));
        }
        if page_size == 0 {
            return Err(Error::InvalidData("page size must be at least 1".to_string()));
        }
        Ok(Self {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination summary returned alongside a page of songs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

impl Pagination {
    #[must_use]
    pub fn new(request: PageRequest, total_count: u64) -> Self {
        Self {
            page: request.page,
            page_size: request.page_size,
            total_count,
            total_pages: total_count.div_ceil(u64::from(request.page_size)),
        }
    }
}

/// One page of songs plus its pagination block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongPage {
    pub songs: Vec<Song>,
    pub pagination: Pagination,
}
