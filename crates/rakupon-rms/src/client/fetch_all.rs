//! Multi-page catalog fetch loop for `RmsClient`.

use std::time::Duration;

use crate::error::RmsError;
use crate::types::RmsItem;

use super::RmsClient;
use super::{FIRST_CURSOR_MARK, MAX_PAGES};

impl RmsClient {
    /// Fetches the full catalog by following `cursorMark` pagination.
    ///
    /// Starts from the `*` cursor and follows `nextCursorMark` until the API
    /// repeats the cursor just used or stops returning one, which is how the
    /// items search signals its final page.
    ///
    /// `inter_request_delay_ms` is the delay in milliseconds between page
    /// requests (applied after every page except the first).
    ///
    /// **All-or-nothing semantics**: on any page failure, items already
    /// fetched from earlier pages are discarded and the error is returned.
    /// A partial catalog would silently leave the remaining titles stale.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_items_page`]. Returns
    /// [`RmsError::PaginationLimit`] if the number of pages exceeds
    /// [`MAX_PAGES`].
    pub async fn fetch_all_items(
        &self,
        hits: u32,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<RmsItem>, RmsError> {
        let mut all_items: Vec<RmsItem> = Vec::new();
        let mut cursor = FIRST_CURSOR_MARK.to_owned();
        let mut is_first_page = true;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(RmsError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            if !is_first_page && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }
            is_first_page = false;

            let response = self.fetch_items_page(hits, &cursor).await?;
            all_items.extend(response.results.into_iter().map(|result| result.item));

            match response.next_cursor_mark {
                Some(next) if !next.is_empty() && next != cursor => cursor = next,
                _ => break,
            }
        }

        Ok(all_items)
    }
}
