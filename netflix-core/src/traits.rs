//! Trait definitions for netflix2.

use crate::models::PagedResult;

/// A raw page payload returned by a paginated endpoint.
///
/// Every paginated resource reports its window with slightly different
/// field names (`totalRatings` vs `vhSize`, `ratingItems` vs
/// `viewedItems`). Implementors map their payload onto the common
/// [`PagedResult`] shape so a single collection algorithm can drive them
/// all.
pub trait PageResponse {
    /// The record type carried by each page.
    type Item;

    /// Converts the raw payload into a normalized page.
    fn into_paged(self) -> PagedResult<Self::Item>;
}
