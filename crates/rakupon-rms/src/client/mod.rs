//! HTTP client for the Rakuten RMS item and coupon endpoints.

mod coupons;
mod fetch_all;

use std::time::Duration;

use reqwest::Client;

use crate::auth::EsaCredentials;
use crate::error::RmsError;
use crate::rate_limit::retry_with_backoff;
use crate::types::ItemSearchResponse;

/// Maximum number of item-search pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursor marks.
///
/// Note: each page request may be retried up to `max_retries` times on
/// transient errors, so the effective worst-case request count is
/// `MAX_PAGES * (1 + max_retries)`.
pub(super) const MAX_PAGES: usize = 200;

/// Cursor mark the items search expects on the first page.
pub(super) const FIRST_CURSOR_MARK: &str = "*";

/// HTTP client for the RMS item and coupon APIs.
///
/// Carries the `ESA` credentials and attaches the `Authorization` header to
/// every request. Handles rate limiting (429), not-found (404), and other
/// non-2xx responses as typed errors; transient errors are automatically
/// retried with exponential backoff up to `max_retries` additional attempts.
#[derive(Debug)]
pub struct RmsClient {
    pub(super) client: Client,
    pub(super) base_url: String,
    pub(super) credentials: EsaCredentials,
    /// Maximum number of retry attempts after the first failure.
    pub(super) max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    pub(super) backoff_base_secs: u64,
}

impl RmsClient {
    /// Creates an `RmsClient` with configured timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// `base_url` is the API origin (`https://api.rms.rakuten.co.jp` in
    /// production); it is overridable so tests can point the client at a
    /// local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`RmsError::InvalidBaseUrl`] if `base_url` does not parse as a
    /// URL base, or [`RmsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        credentials: EsaCredentials,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, RmsError> {
        reqwest::Url::parse(base_url).map_err(|e| RmsError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one page of the items search, with automatic retry on
    /// transient errors.
    ///
    /// # Errors
    ///
    /// - [`RmsError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`RmsError::NotFound`] — HTTP 404 (not retried).
    /// - [`RmsError::UnexpectedStatus`] — other non-2xx status (5xx retried, 4xx not).
    /// - [`RmsError::Http`] — network or TLS failure after all retries exhausted.
    /// - [`RmsError::Deserialize`] — response body is not valid JSON (not retried).
    pub async fn fetch_items_page(
        &self,
        hits: u32,
        cursor_mark: &str,
    ) -> Result<ItemSearchResponse, RmsError> {
        let url = self.items_search_url(hits, cursor_mark)?;
        let body = self.get_body_with_retry(url).await?;
        serde_json::from_str::<ItemSearchResponse>(&body).map_err(|e| RmsError::Deserialize {
            context: format!("items search page (cursorMark {cursor_mark})"),
            source: e,
        })
    }

    /// Issues a GET with auth headers and shared status handling, returning
    /// the response body. Transient failures are retried.
    pub(super) async fn get_body_with_retry(&self, url: String) -> Result<String, RmsError> {
        let max_retries = self.max_retries;
        let backoff_base_secs = self.backoff_base_secs;

        retry_with_backoff(max_retries, backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::AUTHORIZATION,
                        self.credentials.authorization_header(),
                    )
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        "application/json; charset=utf-8",
                    )
                    .send()
                    .await?;

                Self::check_status(&url, &response)?;
                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Maps non-2xx statuses onto typed errors shared by every endpoint.
    pub(super) fn check_status(url: &str, response: &reqwest::Response) -> Result<(), RmsError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(RmsError::RateLimited { retry_after_secs });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RmsError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(RmsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(())
    }

    /// Builds the items search URL for the given page size and cursor.
    ///
    /// # Errors
    ///
    /// Returns [`RmsError::InvalidBaseUrl`] if the configured base URL cannot
    /// be combined into a valid request URL.
    fn items_search_url(&self, hits: u32, cursor_mark: &str) -> Result<String, RmsError> {
        let base = format!("{}/es/2.0/items/search", self.base_url);
        let mut url = reqwest::Url::parse(&base).map_err(|e| RmsError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("isHiddenItem", "false")
            .append_pair("hits", &hits.to_string())
            .append_pair("cursorMark", cursor_mark);

        Ok(url.to_string())
    }

    /// Builds a coupon endpoint URL with optional query parameters.
    pub(super) fn coupon_url(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, RmsError> {
        let base = format!("{}{path}", self.base_url);
        let mut url = reqwest::Url::parse(&base).map_err(|e| RmsError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        for (key, value) in query {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
