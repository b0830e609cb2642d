pub mod auth;
pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

mod rate_limit;
mod xml;

pub use auth::EsaCredentials;
pub use client::RmsClient;
pub use error::RmsError;
pub use normalize::{normalize_coupon, normalize_item};
pub use types::{CouponConditions, ItemSearchResponse, RawCoupon, RmsItem};
