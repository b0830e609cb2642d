pub mod app_config;
pub mod catalog;
pub mod config;
pub mod coupon;

pub use app_config::{AppConfig, TitleStyle};
pub use catalog::Product;
pub use config::{load_app_config, load_app_config_from_env};
pub use coupon::{Coupon, CouponScope, Discount, SelectionResult};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
