//! Normalization from RMS wire shapes into core domain types.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};

use rakupon_core::{Coupon, CouponScope, Discount, Product};

use crate::error::RmsError;
use crate::types::{PriceValue, RawCoupon, RmsItem};

/// Reduces a raw RMS item to the fields the promotion engine needs.
///
/// `base_price` is the minimum standard price across SKU variants, and
/// `sku_variant_count` the number of *distinct* prices; the title wording
/// only cares whether the listing sells at more than one price point.
///
/// Returns `Ok(None)` for items with no priced variants; there is nothing to
/// promote and the caller decides whether to log the skip.
///
/// # Errors
///
/// Returns [`RmsError::InvalidNumber`] if a variant price is present but does
/// not parse as an integer, a data-quality failure that must surface rather
/// than silently dropping the item.
pub fn normalize_item(item: &RmsItem) -> Result<Option<Product>, RmsError> {
    let mut prices = BTreeSet::new();
    for (sku, variant) in &item.variants {
        let Some(price) = &variant.standard_price else {
            continue;
        };
        let value = match price {
            PriceValue::Int(v) => *v,
            PriceValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    continue;
                }
                trimmed
                    .parse::<i64>()
                    .map_err(|_| RmsError::InvalidNumber {
                        context: format!("standardPrice of {}:{sku}", item.manage_number),
                        value: s.clone(),
                    })?
            }
        };
        prices.insert(value);
    }

    let Some(&base_price) = prices.first() else {
        return Ok(None);
    };

    Ok(Some(Product {
        manage_number: item.manage_number.clone(),
        title: item.title.clone(),
        base_price,
        sku_variant_count: u32::try_from(prices.len()).unwrap_or(u32::MAX),
    }))
}

/// Converts a raw coupon into the domain type.
///
/// Wire discount type `"1"` is a fixed yen discount and `"2"` a percentage;
/// any other code carries no usable promotion and maps to [`Discount::None`].
/// `min_spend_condition` comes from the separate coupon get endpoint and is
/// `0` when the coupon declares no minimum purchase amount.
///
/// # Errors
///
/// Malformed timestamps and discount factors are data-quality errors and
/// propagate — treating them as an inactive coupon would mask upstream
/// corruption.
pub fn normalize_coupon(
    raw: &RawCoupon,
    scope: CouponScope,
    min_spend_condition: i64,
) -> Result<Coupon, RmsError> {
    let start_time = parse_rms_timestamp(&raw.coupon_code, &raw.start_date)?;
    let end_time = parse_rms_timestamp(&raw.coupon_code, &raw.end_date)?;

    let discount = match raw.discount_type.as_str() {
        "1" => Discount::FixedAmount(parse_discount_factor(raw)?),
        "2" => Discount::Percentage(parse_discount_factor(raw)?),
        _ => Discount::None,
    };

    Ok(Coupon {
        code: raw.coupon_code.clone(),
        scope,
        start_time,
        end_time,
        discount,
        min_spend_condition,
    })
}

fn parse_rms_timestamp(coupon_code: &str, value: &str) -> Result<DateTime<FixedOffset>, RmsError> {
    DateTime::parse_from_rfc3339(value).map_err(|source| RmsError::InvalidTimestamp {
        coupon_code: coupon_code.to_string(),
        value: value.to_string(),
        source,
    })
}

fn parse_discount_factor(raw: &RawCoupon) -> Result<i64, RmsError> {
    raw.discount_factor
        .trim()
        .parse::<i64>()
        .map_err(|_| RmsError::InvalidNumber {
            context: format!("discountFactor of coupon {}", raw.coupon_code),
            value: raw.discount_factor.clone(),
        })
}
