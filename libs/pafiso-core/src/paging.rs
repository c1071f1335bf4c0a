use serde::{Deserialize, Serialize};

/// Skip/take window. No maximum `take` is enforced here; callers that need
/// a cap use [`Paging::clamped`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Paging {
    pub skip: u64,
    pub take: u64,
}

impl Paging {
    pub fn new(skip: u64, take: u64) -> Self {
        Self { skip, take }
    }

    /// Zero-based page number and page size.
    pub fn from_page(page: u64, page_size: u64) -> Self {
        Self {
            skip: page.saturating_mul(page_size),
            take: page_size,
        }
    }

    /// Page number this window starts at; `0` when `take` is zero.
    pub fn page(&self) -> u64 {
        self.skip.checked_div(self.take).unwrap_or(0)
    }

    pub fn page_size(&self) -> u64 {
        self.take
    }

    pub fn clamped(self, max_take: u64) -> Self {
        Self {
            skip: self.skip,
            take: self.take.min(max_take),
        }
    }

    /// Window bounds over a sequence of `len` items.
    pub(crate) fn bounds(&self, len: usize) -> (usize, usize) {
        let start = usize::try_from(self.skip).unwrap_or(usize::MAX).min(len);
        let take = usize::try_from(self.take).unwrap_or(usize::MAX);
        (start, start.saturating_add(take).min(len))
    }
}

/// One materialized page of results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedList<T> {
    pub total_entries: u64,
    pub entries: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}

impl<T> PagedList<T> {
    /// Echoes `page`/`page_size` back from `paging` when one was applied.
    pub fn new(total_entries: u64, entries: Vec<T>, paging: Option<Paging>) -> Self {
        Self {
            total_entries,
            entries,
            page: paging.map(|p| p.page()),
            page_size: paging.map(|p| p.page_size()),
        }
    }

    pub fn empty() -> Self {
        Self::new(0, Vec::new(), None)
    }

    /// Maps entries while keeping the counters (entity → DTO convenience).
    pub fn map_entries<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            total_entries: self.total_entries,
            entries: self.entries.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}
