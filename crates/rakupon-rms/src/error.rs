use thiserror::Error;

#[derive(Debug, Error)]
pub enum RmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML parse error for {context}: {source}")]
    Xml {
        context: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed response for {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    #[error("invalid timestamp \"{value}\" on coupon {coupon_code}: {source}")]
    InvalidTimestamp {
        coupon_code: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid number \"{value}\" in {context}")]
    InvalidNumber { context: String, value: String },

    #[error("rate limited by RMS (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("pagination limit reached for items search: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },
}
