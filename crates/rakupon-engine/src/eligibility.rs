use chrono::{DateTime, FixedOffset};

use rakupon_core::Coupon;

/// Returns `true` if `coupon` is active at the instant `now`.
///
/// Both bounds are strict: a coupon is not active exactly at its start or end
/// instant. `now` is the run's fixed evaluation time; the orchestrator
/// captures it once per batch so every product is judged against the same
/// instant no matter how long the run takes.
#[must_use]
pub fn is_active(coupon: &Coupon, now: DateTime<FixedOffset>) -> bool {
    coupon.start_time < now && now < coupon.end_time
}
