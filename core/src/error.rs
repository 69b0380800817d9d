//! Error types for the scraper API client.
//!
//! # Design
//! Health and sites failures carry only the status code; their bodies are
//! never read. Scrape failures carry the server's `message` when the error
//! body provides one, otherwise the status code rendered as text. Transport
//! failures (DNS, refused connection, timeout, malformed base URL) are
//! passed through from reqwest untouched.

use thiserror::Error;

/// Errors returned by `ScraperClient` parse methods and `ScraperApi` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `/health` or `/sites` returned a non-2xx status.
    #[error("request failed with status {status}")]
    RequestFailed { status: u16 },

    /// `/scrape` returned a non-2xx status.
    #[error("scraping failed: {message}")]
    ScrapeFailed { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The product decoded but its `current_price` is not a number.
    #[error("price is not a number: {0:?}")]
    UnparsedPrice(String),
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status } | ApiError::ScrapeFailed { status, .. } => {
                Some(*status)
            }
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            ApiError::DeserializationError(_) | ApiError::UnparsedPrice(_) => None,
        }
    }
}
