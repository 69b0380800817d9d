//! Asynchronous client that executes `ScraperClient` requests with reqwest.
//!
//! # Design
//! `ScraperApi` is the host half of the build/parse split: it turns an
//! `HttpRequest` into a reqwest call, collects the status and body into an
//! `HttpResponse`, and hands that back to the matching `parse_*` method.
//! Every call is one GET with no retries and no caching. The type is cheap
//! to clone and holds no mutable state, so concurrent calls need no
//! coordination.

use tracing::{debug, warn};

use crate::client::ScraperClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{HealthStatus, Price, Product, SitesResponse};

/// Outcome of `ScraperApi::current_price`.
///
/// A failed lookup keeps its cause instead of collapsing into `None`; use
/// `price()` when only the number matters.
#[derive(Debug)]
pub enum PriceLookup {
    Found(f64),
    Unavailable(ApiError),
}

impl PriceLookup {
    pub fn price(&self) -> Option<f64> {
        match self {
            PriceLookup::Found(price) => Some(*price),
            PriceLookup::Unavailable(_) => None,
        }
    }

    pub fn into_result(self) -> Result<f64, ApiError> {
        match self {
            PriceLookup::Found(price) => Ok(price),
            PriceLookup::Unavailable(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperApi {
    client: ScraperClient,
    http: reqwest::Client,
}

impl ScraperApi {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: ScraperClient::new(&config.base_url),
            http: builder.build()?,
        })
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(ClientConfig::default().with_base_url(base_url))
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// `GET {base}/health`.
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let response = self.execute(self.client.build_health_check()).await?;
        self.client.parse_health_check(response)
    }

    /// `GET {base}/sites`.
    pub async fn supported_sites(&self) -> Result<SitesResponse, ApiError> {
        let response = self.execute(self.client.build_supported_sites()).await?;
        self.client.parse_supported_sites(response)
    }

    /// `GET {base}/scrape?site=..&uri=..`.
    pub async fn scrape_product(&self, site: &str, uri: &str) -> Result<Product, ApiError> {
        let response = self
            .execute(self.client.build_scrape_product(site, uri))
            .await?;
        self.client.parse_scrape_product(response)
    }

    /// Scrapes the product and keeps only its price. Never returns an error;
    /// failures, including a price text that is not a number, are logged and
    /// reported as `PriceLookup::Unavailable`.
    pub async fn current_price(&self, site: &str, uri: &str) -> PriceLookup {
        let outcome = self
            .scrape_product(site, uri)
            .await
            .and_then(|product| match product.current_price {
                Price::Amount(amount) => Ok(amount),
                Price::Unparsed(raw) => Err(ApiError::UnparsedPrice(raw)),
            });
        match outcome {
            Ok(price) => PriceLookup::Found(price),
            Err(err) => {
                warn!(site, uri, error = %err, "failed to get current price");
                PriceLookup::Unavailable(err)
            }
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url();
        debug!(%url, "sending request");

        let mut builder = self.http.get(&url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(%url, status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}
