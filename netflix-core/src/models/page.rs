//! Pagination windows.

use serde::Deserialize;

use super::history::{RatingRecord, ViewingHistoryItem};
use crate::traits::PageResponse;

/// One fixed-size page window of a paginated resource.
///
/// Produced per fetch and consumed immediately by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult<T> {
    /// Records of this page, in server order.
    pub items: Vec<T>,
    /// Zero-based page index reported by the server.
    pub page: u32,
    /// Page size reported by the server.
    pub page_size: u32,
    /// Total number of records across all pages.
    pub total_count: u32,
}

impl<T> PagedResult<T> {
    /// Number of pages implied by this window: `floor(total / size) + 1`.
    ///
    /// Returns `None` when the server reports a page size of zero.
    pub fn page_count(&self) -> Option<u32> {
        self.total_count
            .checked_div(self.page_size)
            .map(|full| full.saturating_add(1))
    }

    /// Index of the page after this one.
    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }
}

/// Raw payload of the `ratinghistory` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingHistoryPage {
    /// Ratings on this page.
    #[serde(default)]
    pub rating_items: Vec<RatingRecord>,
    /// Total number of ratings.
    #[serde(default)]
    pub total_ratings: u32,
    /// Page size.
    #[serde(default)]
    pub size: u32,
    /// Page index.
    #[serde(default)]
    pub page: u32,
}

impl PageResponse for RatingHistoryPage {
    type Item = RatingRecord;

    fn into_paged(self) -> PagedResult<RatingRecord> {
        PagedResult {
            items: self.rating_items,
            page: self.page,
            page_size: self.size,
            total_count: self.total_ratings,
        }
    }
}

/// Raw payload of the `viewingactivity` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingHistoryPage {
    /// Viewing entries on this page.
    #[serde(default)]
    pub viewed_items: Vec<ViewingHistoryItem>,
    /// Total number of viewing entries.
    #[serde(default)]
    pub vh_size: u32,
    /// Page size.
    #[serde(default)]
    pub size: u32,
    /// Page index.
    #[serde(default)]
    pub page: u32,
}

impl PageResponse for ViewingHistoryPage {
    type Item = ViewingHistoryItem;

    fn into_paged(self) -> PagedResult<ViewingHistoryItem> {
        PagedResult {
            items: self.viewed_items,
            page: self.page,
            page_size: self.size,
            total_count: self.vh_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(total: u32, size: u32) -> PagedResult<()> {
        PagedResult {
            items: Vec::new(),
            page: 0,
            page_size: size,
            total_count: total,
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(window(24, 10).page_count(), Some(3));
        assert_eq!(window(20, 10).page_count(), Some(3));
        assert_eq!(window(0, 10).page_count(), Some(1));
        assert_eq!(window(5, 0).page_count(), None);
    }
}
