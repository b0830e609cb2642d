//! Event-driven parsing of the RMS coupon XML endpoints.
//!
//! The search response echoes the request parameters (including a
//! `couponCode` element) ahead of the result list, so coupon fields are only
//! read while inside a `<coupon>` element; anything outside is ignored.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::RmsError;
use crate::types::{CouponConditions, RawCoupon};

/// Condition type code for "minimum purchase amount".
pub(crate) const MIN_SPEND_CONDITION_TYPE: &str = "RS003";

/// Parses a coupon search response into [`RawCoupon`] records.
pub(crate) fn parse_coupon_search(xml: &str, context: &str) -> Result<Vec<RawCoupon>, RmsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut coupons = Vec::new();
    let mut current: Option<RawCoupon> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                if name == "coupon" {
                    current = Some(RawCoupon::default());
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "coupon" {
                    if let Some(coupon) = current.take() {
                        coupons.push(coupon);
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(coupon) = current.as_mut() {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "couponCode" => coupon.coupon_code = text,
                        "itemType" => coupon.item_type = Some(text),
                        "couponStartDate" => coupon.start_date = text,
                        "couponEndDate" => coupon.end_date = text,
                        "discountType" => coupon.discount_type = text,
                        "discountFactor" => coupon.discount_factor = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RmsError::Xml {
                    context: context.to_string(),
                    source: e,
                })
            }
            _ => {}
        }
    }

    Ok(coupons)
}

/// Extracts the minimum-spend condition from a coupon get response.
///
/// The response lists `conditionTypeCode`/`startValue` element pairs; the
/// pair with type `RS003` carries the minimum purchase amount. Other
/// condition types are reported via `has_unrecognized` so the orchestrator
/// can exclude the coupon when strict condition handling is configured.
pub(crate) fn parse_coupon_conditions(
    xml: &str,
    coupon_code: &str,
) -> Result<CouponConditions, RmsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut condition_types: Vec<String> = Vec::new();
    let mut start_values: Vec<String> = Vec::new();
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                current_tag = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
            }
            Ok(Event::End(_)) => {
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                match current_tag.as_str() {
                    "conditionTypeCode" => condition_types.push(text),
                    "startValue" => start_values.push(text),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RmsError::Xml {
                    context: format!("conditions of coupon {coupon_code}"),
                    source: e,
                })
            }
            _ => {}
        }
    }

    if condition_types.len() != start_values.len() {
        return Err(RmsError::MalformedResponse {
            context: format!("conditions of coupon {coupon_code}"),
            reason: format!(
                "{} conditionTypeCode elements but {} startValue elements",
                condition_types.len(),
                start_values.len()
            ),
        });
    }

    let mut min_spend = None;
    let mut has_unrecognized = false;
    for (condition_type, start_value) in condition_types.iter().zip(&start_values) {
        if condition_type == MIN_SPEND_CONDITION_TYPE {
            let value = start_value.trim().parse::<i64>().map_err(|_| {
                RmsError::InvalidNumber {
                    context: format!("minimum-spend condition of coupon {coupon_code}"),
                    value: start_value.clone(),
                }
            })?;
            if min_spend.is_none() {
                min_spend = Some(value);
            }
        } else {
            has_unrecognized = true;
        }
    }

    Ok(CouponConditions {
        min_spend,
        has_unrecognized,
    })
}
