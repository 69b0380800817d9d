//! Stateless HTTP request builder and response parser for the scraper API.
//!
//! # Design
//! `ScraperClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! the core deterministic and free of I/O.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ErrorBody, HealthStatus, Product, SitesResponse};

/// Synchronous, stateless client for the scraper API.
#[derive(Debug, Clone)]
pub struct ScraperClient {
    base_url: String,
}

impl ScraperClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_health_check(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/health", self.base_url))
    }

    pub fn build_supported_sites(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/sites", self.base_url))
    }

    /// `site` and `uri` are passed through unchecked.
    pub fn build_scrape_product(&self, site: &str, uri: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/scrape", self.base_url))
            .with_query("site", site)
            .with_query("uri", uri)
    }

    pub fn parse_health_check(&self, response: HttpResponse) -> Result<HealthStatus, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_supported_sites(&self, response: HttpResponse) -> Result<SitesResponse, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_scrape_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        if !response.is_success() {
            return Err(scrape_failure(&response));
        }
        decode(&response)
    }
}

/// Non-2xx becomes `RequestFailed`; the body is not inspected.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::RequestFailed {
        status: response.status,
    })
}

/// Falls back to the status code when the body is not JSON or has no message.
fn scrape_failure(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| response.status.to_string());
    ApiError::ScrapeFailed {
        status: response.status,
        message,
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
