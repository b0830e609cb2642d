use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Whether a coupon is tied to one product or applies across the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponScope {
    PerItem,
    StoreWide,
}

/// Discount carried by a coupon.
///
/// The RMS wire format encodes these as numeric string codes (`"1"`, `"2"`);
/// they are mapped to this tagged variant during normalization so the engine
/// has no stringly-typed fallback branches. Unrecognized wire codes become
/// [`Discount::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    None,
    /// Subtract a fixed amount of yen.
    FixedAmount(i64),
    /// Multiply by the remaining fraction; the value is percentage points
    /// in 0–100.
    Percentage(i64),
}

/// A promotional coupon with its validity window and spend condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub scope: CouponScope,
    /// Start of the validity window. Invariant: `start_time < end_time`.
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub discount: Discount,
    /// Minimum base price required for the coupon to be honored, in yen.
    /// `0` means the coupon has no spend condition.
    pub min_spend_condition: i64,
}

/// Outcome of coupon selection for one product.
///
/// Built once per product per run and consumed immediately by the title
/// composer; never persisted. Results are assembled into an output collection
/// only after all computation is done, so no partially-written shared state
/// exists at any point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub discount: Discount,
    /// Winner's resulting price truncated toward zero, in yen. Equals
    /// `original_price` when no coupon applied. May be zero or negative —
    /// the calculator never clamps.
    pub discounted_price: i64,
    /// The base price the selection ran against, kept so the arrow-style
    /// title can print "old → new" without re-threading the product.
    pub original_price: i64,
    pub coupon_applied: bool,
}

impl SelectionResult {
    /// The no-coupon sentinel: nothing applied, price unchanged.
    #[must_use]
    pub fn no_coupon(base_price: i64) -> Self {
        Self {
            discount: Discount::None,
            discounted_price: base_price,
            original_price: base_price,
            coupon_applied: false,
        }
    }
}
