use rakupon_core::Discount;

/// Applies `discount` to `base_price` and returns the resulting price as a
/// real number.
///
/// Fixed-amount results may be zero or negative; they are returned unclamped,
/// since ranking naturally discards them in favor of better candidates and a
/// chosen negative price must be surfaced as computed. Percentage math stays
/// real-valued here; truncation to integer yen happens only when the selector
/// fixes the winner into a `SelectionResult`.
#[must_use]
pub fn apply(base_price: i64, discount: Discount) -> f64 {
    match discount {
        Discount::FixedAmount(value) => (base_price - value) as f64,
        Discount::Percentage(value) => base_price as f64 * (100 - value) as f64 / 100.0,
        Discount::None => base_price as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_amount_subtracts_yen() {
        assert_eq!(apply(1000, Discount::FixedAmount(200)), 800.0);
    }

    #[test]
    fn fixed_amount_may_go_negative() {
        assert_eq!(apply(300, Discount::FixedAmount(500)), -200.0);
    }

    #[test]
    fn fixed_amount_may_hit_zero() {
        assert_eq!(apply(500, Discount::FixedAmount(500)), 0.0);
    }

    #[test]
    fn percentage_scales_by_remaining_fraction() {
        assert_eq!(apply(1000, Discount::Percentage(10)), 900.0);
        assert_eq!(apply(1000, Discount::Percentage(60)), 400.0);
    }

    #[test]
    fn percentage_keeps_fractional_result() {
        // 999 * 0.9 = 899.1 — ranking must see the real value.
        assert!((apply(999, Discount::Percentage(10)) - 899.1).abs() < 1e-9);
    }

    #[test]
    fn percentage_hundred_zeroes_the_price() {
        assert_eq!(apply(1000, Discount::Percentage(100)), 0.0);
    }

    #[test]
    fn percentage_over_hundred_goes_negative() {
        assert_eq!(apply(1000, Discount::Percentage(150)), -500.0);
    }

    #[test]
    fn none_returns_base_price() {
        assert_eq!(apply(1234, Discount::None), 1234.0);
    }

    #[test]
    fn zero_and_negative_base_prices_compute_arithmetically() {
        assert_eq!(apply(0, Discount::Percentage(50)), 0.0);
        assert_eq!(apply(-100, Discount::FixedAmount(50)), -150.0);
        assert_eq!(apply(-100, Discount::Percentage(50)), -50.0);
    }
}
