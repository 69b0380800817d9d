//! Client for the web scraper REST API.
//!
//! # Overview
//! Wraps the four calls the scraper service offers: health check, supported
//! sites listing, product scrape and the current-price shortcut built on top
//! of it. Responses are decoded JSON bodies; non-2xx statuses become
//! `ApiError` values.
//!
//! # Design
//! - `ScraperClient` is stateless and I/O-free: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `ScraperApi` executes those requests asynchronously with reqwest.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use api::{PriceLookup, ScraperApi};
pub use client::ScraperClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use types::{ErrorBody, HealthStatus, KnownSite, Price, Product, SiteDescriptor, SitesResponse, UnknownSite};
