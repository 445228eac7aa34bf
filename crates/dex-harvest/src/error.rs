//! Error types for harvesting
//!
//! Only the listing fetch, configuration and output writing can fail a run.
//! Everything that goes wrong per entity degrades to partial data instead.

use thiserror::Error;

/// Result type for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Listing parse error: {0}")]
    Listing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Document(#[from] dex_common::DexError),
}

impl HarvestError {
    pub fn selector(selector: &str, err: impl std::fmt::Display) -> Self {
        Self::Selector {
            selector: selector.to_string(),
            message: err.to_string(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            HarvestError::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            HarvestError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retry_classification() {
        let not_found = HarvestError::Status {
            status: 404,
            url: "https://pokemondb.net/ability/none".to_string(),
        };
        let unavailable = HarvestError::Status {
            status: 503,
            url: "https://pokemondb.net/pokedex/all".to_string(),
        };
        let throttled = HarvestError::Status {
            status: 429,
            url: "https://pokemondb.net/pokedex/all".to_string(),
        };

        assert!(!not_found.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(throttled.is_retryable());
        assert!(!HarvestError::config("bad").is_retryable());
    }

    #[test]
    fn test_status_message() {
        let err = HarvestError::Status {
            status: 500,
            url: "https://pokemondb.net/pokedex/mew".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500 for https://pokemondb.net/pokedex/mew");
    }
}
