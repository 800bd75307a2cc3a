//! Paged collection retrieval.

use std::future::Future;

use netflix_core::PagedResult;
use tracing::debug;

/// Fetches every page of a paginated resource, strictly in order.
///
/// Starts at page 0 and keeps going while `page < floor(total / size) + 1`,
/// where the page count is recomputed from each response. The next page is
/// the server-reported page plus one, but never less than one past the page
/// just requested. A reported page size of zero stops after the current page.
/// The first error aborts the collection.
pub async fn collect_pages<T, E, F, Fut>(mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PagedResult<T>, E>>,
{
    let mut items = Vec::new();
    let mut page = 0_u32;
    let mut pages = 1_u32;

    while page < pages {
        let requested = page;
        let window = fetch(requested).await?;
        debug!(
            page = window.page,
            size = window.page_size,
            total = window.total_count,
            count = window.items.len(),
            "Fetched page"
        );

        let Some(count) = window.page_count() else {
            debug!("Page size is zero, stopping");
            items.extend(window.items);
            break;
        };
        pages = count;
        page = window.next_page().max(requested.saturating_add(1));
        items.extend(window.items);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn window(page: u32, len: usize, size: u32, total: u32) -> PagedResult<usize> {
        let start = page as usize * size as usize;
        PagedResult {
            items: (start..start + len).collect(),
            page,
            page_size: size,
            total_count: total,
        }
    }

    #[tokio::test]
    async fn test_collects_all_pages_in_order() {
        let calls = RefCell::new(Vec::new());
        let items = collect_pages(|page| {
            calls.borrow_mut().push(page);
            let len = [10, 10, 4][page as usize];
            async move { Ok::<_, String>(window(page, len, 10, 24)) }
        })
        .await
        .unwrap();

        assert_eq!(items, (0..24).collect::<Vec<_>>());
        assert_eq!(*calls.borrow(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_empty_collection_fetches_once() {
        let calls = RefCell::new(0);
        let items = collect_pages(|page| {
            *calls.borrow_mut() += 1;
            async move { Ok::<_, String>(window(page, 0, 10, 0)) }
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_zero_page_size_stops() {
        let calls = RefCell::new(0);
        let items = collect_pages(|page| {
            *calls.borrow_mut() += 1;
            async move { Ok::<_, String>(window(page, 3, 0, 100)) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_stale_page_index_still_advances() {
        let calls = RefCell::new(Vec::new());
        let items = collect_pages(|page| {
            calls.borrow_mut().push(page);
            // Server always claims page 0.
            async move {
                let mut w = window(page, 5, 5, 10);
                w.page = 0;
                Ok::<_, String>(w)
            }
        })
        .await
        .unwrap();

        assert_eq!(*calls.borrow(), vec![0, 1, 2]);
        assert_eq!(items.len(), 15);
    }

    #[tokio::test]
    async fn test_error_aborts() {
        let calls = RefCell::new(0);
        let result = collect_pages(|page| {
            *calls.borrow_mut() += 1;
            async move {
                if page == 1 {
                    Err("boom".to_string())
                } else {
                    Ok(window(page, 10, 10, 30))
                }
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(*calls.borrow(), 2);
    }
}
