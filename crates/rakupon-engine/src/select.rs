use chrono::{DateTime, FixedOffset};

use rakupon_core::{Coupon, Product, SelectionResult};

use crate::discount::apply;
use crate::eligibility::is_active;

/// Picks the coupon giving the lowest resulting price among active candidates
/// whose minimum-spend condition the product meets.
///
/// Candidates are considered in discovery order: item-scoped coupons first,
/// then store-wide ones. The sort by resulting price is stable, so price ties
/// favor the first-seen coupon. Selection is greedy and condition-gated: a
/// cheaper candidate that fails its minimum-spend condition is skipped in
/// favor of the next-cheapest, not dropped along with the whole pool.
///
/// The winner's price is truncated toward zero when fixed into the result;
/// ranking itself runs on the real-valued prices.
#[must_use]
pub fn select_coupon(
    product: &Product,
    item_coupons: &[Coupon],
    store_coupons: &[Coupon],
    now: DateTime<FixedOffset>,
) -> SelectionResult {
    let mut candidates: Vec<(&Coupon, f64)> = item_coupons
        .iter()
        .chain(store_coupons.iter())
        .filter(|coupon| is_active(coupon, now))
        .map(|coupon| (coupon, apply(product.base_price, coupon.discount)))
        .collect();

    if candidates.is_empty() {
        return SelectionResult::no_coupon(product.base_price);
    }

    // Stable sort: equal prices keep discovery order.
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

    for (coupon, resulting_price) in candidates {
        if coupon.min_spend_condition <= product.base_price {
            return SelectionResult {
                discount: coupon.discount,
                discounted_price: resulting_price as i64,
                original_price: product.base_price,
                coupon_applied: true,
            };
        }
    }

    SelectionResult::no_coupon(product.base_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rakupon_core::{CouponScope, Discount};

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).expect("valid timestamp")
    }

    fn run_now() -> DateTime<FixedOffset> {
        ts("2026-08-15T12:00:00+09:00")
    }

    fn make_product(base_price: i64) -> Product {
        Product {
            manage_number: "widget-001".to_string(),
            title: "Widget".to_string(),
            base_price,
            sku_variant_count: 1,
        }
    }

    fn active_coupon(code: &str, discount: Discount, min_spend: i64) -> Coupon {
        Coupon {
            code: code.to_string(),
            scope: CouponScope::PerItem,
            start_time: ts("2026-08-01T00:00:00+09:00"),
            end_time: ts("2026-08-31T00:00:00+09:00"),
            discount,
            min_spend_condition: min_spend,
        }
    }

    fn expired_coupon(code: &str, discount: Discount) -> Coupon {
        Coupon {
            code: code.to_string(),
            scope: CouponScope::PerItem,
            start_time: ts("2026-07-01T00:00:00+09:00"),
            end_time: ts("2026-07-31T00:00:00+09:00"),
            discount,
            min_spend_condition: 0,
        }
    }

    #[test]
    fn no_candidates_returns_default() {
        let result = select_coupon(&make_product(1000), &[], &[], run_now());
        assert_eq!(result, SelectionResult::no_coupon(1000));
    }

    #[test]
    fn only_expired_candidates_returns_default() {
        let coupons = vec![expired_coupon("OLD", Discount::FixedAmount(500))];
        let result = select_coupon(&make_product(1000), &coupons, &[], run_now());
        assert!(!result.coupon_applied);
        assert_eq!(result.discounted_price, 1000);
    }

    #[test]
    fn single_fixed_coupon_wins() {
        let coupons = vec![active_coupon("SAVE200", Discount::FixedAmount(200), 0)];
        let result = select_coupon(&make_product(1000), &coupons, &[], run_now());
        assert_eq!(result.discount, Discount::FixedAmount(200));
        assert_eq!(result.discounted_price, 800);
        assert_eq!(result.original_price, 1000);
        assert!(result.coupon_applied);
    }

    #[test]
    fn percentage_price_is_truncated_toward_zero() {
        // 999 * 0.9 = 899.1 → 899
        let coupons = vec![active_coupon("TEN", Discount::Percentage(10), 0)];
        let result = select_coupon(&make_product(999), &coupons, &[], run_now());
        assert_eq!(result.discounted_price, 899);
    }

    #[test]
    fn cheapest_resulting_price_wins() {
        let coupons = vec![
            active_coupon("TEN", Discount::Percentage(10), 0),
            active_coupon("SIXTY", Discount::Percentage(60), 0),
            active_coupon("SAVE100", Discount::FixedAmount(100), 0),
        ];
        let result = select_coupon(&make_product(1000), &coupons, &[], run_now());
        assert_eq!(result.discount, Discount::Percentage(60));
        assert_eq!(result.discounted_price, 400);
    }

    #[test]
    fn failed_min_spend_skips_to_next_cheapest() {
        // FIXED 500 gives the lowest price (500) but needs a 2000-yen spend;
        // PERCENTAGE 10 (900) is the one that must win.
        let coupons = vec![
            active_coupon("BIG", Discount::FixedAmount(500), 2000),
            active_coupon("TEN", Discount::Percentage(10), 0),
        ];
        let result = select_coupon(&make_product(1000), &coupons, &[], run_now());
        assert_eq!(result.discount, Discount::Percentage(10));
        assert_eq!(result.discounted_price, 900);
        assert!(result.coupon_applied);
    }

    #[test]
    fn all_conditions_failing_returns_default() {
        let coupons = vec![
            active_coupon("BIG", Discount::FixedAmount(500), 2000),
            active_coupon("HUGE", Discount::FixedAmount(700), 5000),
        ];
        let result = select_coupon(&make_product(1000), &coupons, &[], run_now());
        assert_eq!(result, SelectionResult::no_coupon(1000));
    }

    #[test]
    fn min_spend_equal_to_base_price_passes() {
        let coupons = vec![active_coupon("EDGE", Discount::FixedAmount(100), 1000)];
        let result = select_coupon(&make_product(1000), &coupons, &[], run_now());
        assert!(result.coupon_applied);
        assert_eq!(result.discounted_price, 900);
    }

    #[test]
    fn zero_min_spend_always_passes() {
        let coupons = vec![active_coupon("FREE", Discount::FixedAmount(100), 0)];
        let result = select_coupon(&make_product(0), &coupons, &[], run_now());
        assert!(result.coupon_applied);
        assert_eq!(result.discounted_price, -100);
    }

    #[test]
    fn price_tie_favors_first_seen() {
        // Both land on 800; the item-scoped one was discovered first.
        let item = vec![active_coupon("ITEM", Discount::FixedAmount(200), 0)];
        let store = vec![active_coupon("STORE", Discount::Percentage(20), 0)];
        let result = select_coupon(&make_product(1000), &item, &store, run_now());
        assert_eq!(result.discount, Discount::FixedAmount(200));
    }

    #[test]
    fn store_wide_coupon_can_win_over_item_coupon() {
        let item = vec![active_coupon("ITEM", Discount::FixedAmount(100), 0)];
        let store = vec![active_coupon("STORE", Discount::Percentage(50), 0)];
        let result = select_coupon(&make_product(1000), &item, &store, run_now());
        assert_eq!(result.discount, Discount::Percentage(50));
        assert_eq!(result.discounted_price, 500);
    }

    #[test]
    fn winner_beats_every_other_satisfying_candidate() {
        let coupons = vec![
            active_coupon("A", Discount::FixedAmount(50), 0),
            active_coupon("B", Discount::Percentage(30), 0),
            active_coupon("C", Discount::FixedAmount(450), 0),
            active_coupon("D", Discount::Percentage(5), 0),
        ];
        let product = make_product(1000);
        let result = select_coupon(&product, &coupons, &[], run_now());
        for coupon in &coupons {
            let other = apply(product.base_price, coupon.discount);
            assert!(
                result.discounted_price as f64 <= other,
                "winner {} must undercut {}",
                result.discounted_price,
                other
            );
        }
    }

    #[test]
    fn selection_is_idempotent() {
        let coupons = vec![
            active_coupon("A", Discount::Percentage(25), 500),
            active_coupon("B", Discount::FixedAmount(300), 0),
        ];
        let product = make_product(1200);
        let first = select_coupon(&product, &coupons, &[], run_now());
        let second = select_coupon(&product, &coupons, &[], run_now());
        assert_eq!(first, second);
    }

    #[test]
    fn negative_resulting_price_is_surfaced_when_chosen() {
        let coupons = vec![active_coupon("OVER", Discount::FixedAmount(1500), 0)];
        let result = select_coupon(&make_product(1000), &coupons, &[], run_now());
        assert!(result.coupon_applied);
        assert_eq!(result.discounted_price, -500);
    }

    #[test]
    fn none_discount_candidate_keeps_base_price_when_chosen() {
        // A coupon whose wire type was unrecognized maps to Discount::None;
        // if it is the only active candidate the price is unchanged but the
        // coupon still counts as applied.
        let coupons = vec![active_coupon("WEIRD", Discount::None, 0)];
        let result = select_coupon(&make_product(1000), &coupons, &[], run_now());
        assert!(result.coupon_applied);
        assert_eq!(result.discounted_price, 1000);
        assert_eq!(result.discount, Discount::None);
    }
}
