/// Which banner grammar the title composer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    /// `【M/D！…】` banner carrying today's date (the original format).
    DateBanner,
    /// `【…{old}円→{new}円…】` banner without the date.
    PriceArrow,
}

impl std::fmt::Display for TitleStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TitleStyle::DateBanner => write!(f, "date-banner"),
            TitleStyle::PriceArrow => write!(f, "price-arrow"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub service_secret: String,
    pub license_key: String,
    pub api_base_url: String,
    pub log_level: String,
    pub hits_limit: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub max_concurrent_items: usize,
    pub batch_max_retries: u32,
    pub batch_retry_pause_secs: u64,
    pub title_style: TitleStyle,
    pub strict_condition_types: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("service_secret", &"[redacted]")
            .field("license_key", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("log_level", &self.log_level)
            .field("hits_limit", &self.hits_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("max_concurrent_items", &self.max_concurrent_items)
            .field("batch_max_retries", &self.batch_max_retries)
            .field("batch_retry_pause_secs", &self.batch_retry_pause_secs)
            .field("title_style", &self.title_style)
            .field("strict_condition_types", &self.strict_condition_types)
            .finish()
    }
}
