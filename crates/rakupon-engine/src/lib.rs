//! Coupon resolution and title composition.
//!
//! Everything in this crate is pure and synchronous: given a product, the
//! coupons in play, and the run's fixed "now", it decides which coupon wins,
//! what the discounted price is, and what the rewritten title looks like.
//! Fetching catalog and coupon data is the `rakupon-rms` crate's job; driving
//! the batch is the CLI's.

pub mod discount;
pub mod eligibility;
pub mod select;
pub mod title;

pub use discount::apply;
pub use eligibility::is_active;
pub use select::select_coupon;
pub use title::compose_title;
