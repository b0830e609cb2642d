//! RMS API wire types.
//!
//! ## Items search (`/es/2.0/items/search`, JSON)
//!
//! Each result wraps an `item` object whose `variants` field is a map keyed
//! by SKU identifier. `standardPrice` has been observed both as a JSON number
//! and as a numeric string depending on the listing, so both shapes are
//! accepted and reconciled during normalization.
//!
//! ## Coupon search / get (`/es/1.0/coupon/*`, XML)
//!
//! The coupon endpoints respond with XML that echoes the request parameters
//! (including a `couponCode` field) ahead of the result list. [`RawCoupon`]
//! holds one coupon's fields exactly as they appear on the wire; conversion
//! to the domain [`rakupon_core::Coupon`] happens in [`crate::normalize`].

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level response from the items search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearchResponse {
    pub results: Vec<ItemSearchResult>,
    /// Cursor for the next page. On the last page the API repeats the cursor
    /// that was just used (Solr-style `cursorMark` termination).
    #[serde(default)]
    pub next_cursor_mark: Option<String>,
}

/// One search hit, wrapping the item payload.
#[derive(Debug, Deserialize)]
pub struct ItemSearchResult {
    pub item: RmsItem,
}

/// A catalog item as returned by the items search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RmsItem {
    pub manage_number: String,
    pub title: String,
    /// Variants keyed by SKU identifier. A `BTreeMap` keeps iteration order
    /// deterministic across runs.
    #[serde(default)]
    pub variants: BTreeMap<String, RmsVariant>,
}

/// A single SKU variant of an [`RmsItem`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RmsVariant {
    /// Standard selling price in yen; absent for variants without a price.
    #[serde(default)]
    pub standard_price: Option<PriceValue>,
}

/// A price that arrives either as a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Int(i64),
    Text(String),
}

/// A coupon as it appears in the coupon search XML, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawCoupon {
    pub coupon_code: String,
    /// Wire marker for coupon applicability; `"4"` means the coupon applies
    /// to every item in the store.
    pub item_type: Option<String>,
    pub start_date: String,
    pub end_date: String,
    /// Wire discount type code: `"1"` fixed yen, `"2"` percentage.
    pub discount_type: String,
    pub discount_factor: String,
}

/// Conditions attached to a coupon, from `/es/1.0/coupon/get`.
#[derive(Debug, Clone)]
pub struct CouponConditions {
    /// The `RS003` (minimum purchase amount) condition value, if declared.
    pub min_spend: Option<i64>,
    /// `true` if the coupon carries any condition type other than `RS003`.
    /// Whether such coupons are excluded from selection is a configuration
    /// choice made by the orchestrator.
    pub has_unrecognized: bool,
}
