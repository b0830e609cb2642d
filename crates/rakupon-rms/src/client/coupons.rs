//! Coupon search/get endpoints and the title-update sink.

use serde_json::json;

use crate::error::RmsError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{CouponConditions, RawCoupon};
use crate::xml::{parse_coupon_conditions, parse_coupon_search};

use super::RmsClient;

/// `itemType` marker for coupons that apply to every item in the store.
pub(crate) const ITEM_TYPE_ALL_ITEMS: &str = "4";

impl RmsClient {
    /// Fetches the coupons scoped to one item.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the shared GET path and
    /// [`RmsError::Xml`] if the response body does not parse.
    pub async fn search_item_coupons(
        &self,
        manage_number: &str,
    ) -> Result<Vec<RawCoupon>, RmsError> {
        let url = self.coupon_url("/es/1.0/coupon/search", &[("itemUrl", manage_number)])?;
        let body = self.get_body_with_retry(url).await?;
        parse_coupon_search(&body, &format!("coupon search for item {manage_number}"))
    }

    /// Fetches the store-wide coupons: the full coupon list filtered to the
    /// applies-to-all-items marker.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the shared GET path and
    /// [`RmsError::Xml`] if the response body does not parse.
    pub async fn search_store_coupons(&self) -> Result<Vec<RawCoupon>, RmsError> {
        let url = self.coupon_url("/es/1.0/coupon/search", &[])?;
        let body = self.get_body_with_retry(url).await?;
        let mut coupons = parse_coupon_search(&body, "store-wide coupon search")?;
        coupons.retain(|coupon| coupon.item_type.as_deref() == Some(ITEM_TYPE_ALL_ITEMS));
        Ok(coupons)
    }

    /// Fetches the conditions attached to one coupon.
    ///
    /// # Errors
    ///
    /// Propagates transport errors, [`RmsError::Xml`] on unparseable bodies,
    /// and [`RmsError::InvalidNumber`] if a declared minimum-spend value is
    /// not an integer.
    pub async fn fetch_coupon_conditions(
        &self,
        coupon_code: &str,
    ) -> Result<CouponConditions, RmsError> {
        let url = self.coupon_url("/es/1.0/coupon/get", &[("couponCode", coupon_code)])?;
        let body = self.get_body_with_retry(url).await?;
        parse_coupon_conditions(&body, coupon_code)
    }

    /// Pushes a rewritten title for one item. RMS answers 204 on success.
    ///
    /// # Errors
    ///
    /// - [`RmsError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`RmsError::NotFound`] — HTTP 404, e.g. a stale manage number.
    /// - [`RmsError::UnexpectedStatus`] — anything other than 204.
    /// - [`RmsError::Http`] — network failure after all retries exhausted.
    pub async fn update_item_title(
        &self,
        manage_number: &str,
        new_title: &str,
    ) -> Result<(), RmsError> {
        let url = format!("{}/es/2.0/items/manage-numbers/{manage_number}", self.base_url);
        let max_retries = self.max_retries;
        let backoff_base_secs = self.backoff_base_secs;

        retry_with_backoff(max_retries, backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .patch(&url)
                    .header(
                        reqwest::header::AUTHORIZATION,
                        self.credentials.authorization_header(),
                    )
                    .json(&json!({ "title": new_title }))
                    .send()
                    .await?;

                Self::check_status(&url, &response)?;

                let status = response.status();
                if status != reqwest::StatusCode::NO_CONTENT {
                    return Err(RmsError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(())
            }
        })
        .await
    }
}
