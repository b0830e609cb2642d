use crate::app_config::{AppConfig, TitleStyle};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let service_secret = require("RMS_SERVICE_SECRET")?;
    let license_key = require("RMS_LICENSE_KEY")?;

    let api_base_url = or_default("RAKUPON_API_BASE_URL", "https://api.rms.rakuten.co.jp");
    let log_level = or_default("RAKUPON_LOG_LEVEL", "info");
    let hits_limit = parse_u32("RAKUPON_HITS_LIMIT", "100")?;
    let request_timeout_secs = parse_u64("RAKUPON_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("RAKUPON_USER_AGENT", "rakupon/0.1 (coupon-title-updater)");
    let inter_request_delay_ms = parse_u64("RAKUPON_INTER_REQUEST_DELAY_MS", "1000")?;
    let max_retries = parse_u32("RAKUPON_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("RAKUPON_RETRY_BACKOFF_BASE_SECS", "5")?;
    let max_concurrent_items = parse_usize("RAKUPON_MAX_CONCURRENT_ITEMS", "1")?;
    let batch_max_retries = parse_u32("RAKUPON_BATCH_MAX_RETRIES", "2")?;
    let batch_retry_pause_secs = parse_u64("RAKUPON_BATCH_RETRY_PAUSE_SECS", "5")?;
    let title_style = parse_title_style(&or_default("RAKUPON_TITLE_STYLE", "date-banner"));
    let strict_condition_types =
        parse_bool(&or_default("RAKUPON_STRICT_CONDITION_TYPES", "false"));

    Ok(AppConfig {
        service_secret,
        license_key,
        api_base_url,
        log_level,
        hits_limit,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_secs,
        max_concurrent_items,
        batch_max_retries,
        batch_retry_pause_secs,
        title_style,
        strict_condition_types,
    })
}

/// Parse a string into a `TitleStyle` variant.
///
/// Unrecognized values default to `TitleStyle::DateBanner`.
fn parse_title_style(s: &str) -> TitleStyle {
    match s {
        "price-arrow" => TitleStyle::PriceArrow,
        _ => TitleStyle::DateBanner,
    }
}

/// Parse a boolean flag: `"true"` and `"1"` are true, everything else false.
fn parse_bool(s: &str) -> bool {
    matches!(s, "true" | "1")
}
