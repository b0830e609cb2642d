//! Title banner composition.
//!
//! A rewritten title is a bracketed banner followed by the bare product name
//! with no separator. The banner wording branches on the winning discount's
//! type and magnitude; the price is formatted with thousands separators and
//! multi-price listings get a trailing `～` ("starting from").

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use rakupon_core::{Discount, SelectionResult, TitleStyle};

/// Composes the new display title for a product from its selection result.
///
/// The original title's leading `【...】` banner (if any) is stripped first so
/// repeated runs replace yesterday's banner instead of stacking a new one in
/// front of it.
///
/// `TitleStyle::DateBanner` opens with today's month/day (no zero padding);
/// `TitleStyle::PriceArrow` drops the date and prints `old円→new円` instead.
/// With no applied coupon the date-banner style still emits the date-only
/// banner, while the arrow style has no price claim to make and returns the
/// bare name unchanged.
#[must_use]
pub fn compose_title(
    original_title: &str,
    selection: &SelectionResult,
    sku_variant_count: u32,
    today: NaiveDate,
    style: TitleStyle,
) -> String {
    let bare = strip_leading_banner(original_title);
    let suffix = if sku_variant_count > 1 { "～" } else { "" };
    let price = format_yen(selection.discounted_price);

    let banner = match style {
        TitleStyle::DateBanner => {
            let date = format!("{}/{}", today.month(), today.day());
            match selection.discount {
                Discount::None => format!("【{date}！】"),
                Discount::FixedAmount(_) => {
                    format!("【{date}！クーポンで{price}円{suffix}】")
                }
                Discount::Percentage(value) if value > 51 => {
                    format!("【{date}！{value}％OFF！{price}円{suffix}】")
                }
                Discount::Percentage(50) => {
                    format!("【{date}！半額クーポンで{price}円{suffix}】")
                }
                Discount::Percentage(_) => {
                    format!("【{date}！クーポン利用で{price}円{suffix}】")
                }
            }
        }
        TitleStyle::PriceArrow => {
            let old = format_yen(selection.original_price);
            match selection.discount {
                Discount::None => String::new(),
                Discount::FixedAmount(_) => {
                    format!("【クーポンで{old}円→{price}円{suffix}】")
                }
                Discount::Percentage(value) if value > 51 => {
                    format!("【{value}％OFF！{old}円→{price}円{suffix}】")
                }
                Discount::Percentage(50) => {
                    format!("【半額クーポンで{old}円→{price}円{suffix}】")
                }
                Discount::Percentage(_) => {
                    format!("【クーポン利用で{old}円→{price}円{suffix}】")
                }
            }
        }
    };

    format!("{banner}{bare}")
}

/// Strips one leading `【...】` segment from a title, if present.
///
/// Non-greedy and anchored: only the first banner at the very start of the
/// string is removed, so a bracket appearing mid-title stays untouched.
fn strip_leading_banner(title: &str) -> &str {
    let re = Regex::new("^【[^】]*】").expect("valid banner regex");
    match re.find(title) {
        Some(m) => &title[m.end()..],
        None => title,
    }
}

/// Formats a yen amount with thousands separators, keeping the sign.
fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
