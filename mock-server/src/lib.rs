use std::{collections::HashMap, sync::Arc, time::Instant};

use axum::{
    extract::{Query, Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub service: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteInfo {
    pub name: String,
    pub identifier: String,
    pub base_url: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SitesResponse {
    pub supported_sites: Vec<SiteInfo>,
    pub count: usize,
}

/// A scraped product as the server renders it. Prices are display strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub current_price: String,
    pub currency: String,
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub url: String,
    pub site: String,
    pub scraped_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct ScrapeParams {
    pub site: Option<String>,
    pub uri: Option<String>,
}

/// A product page the mock server can "scrape".
#[derive(Clone, Debug)]
pub struct Listing {
    pub name: String,
    pub price: f64,
    pub brand: Option<String>,
    pub availability: String,
}

/// Product pages keyed by URL.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    listings: HashMap<String, Listing>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: &str, listing: Listing) {
        self.listings.insert(uri.to_string(), listing);
    }

    pub fn get(&self, uri: &str) -> Option<&Listing> {
        self.listings.get(uri)
    }

    pub fn seeded() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            "https://kontakt.az/iphone-13-128-gb-midnight",
            Listing {
                name: "Apple iPhone 13 128GB Midnight".to_string(),
                price: 1299.99,
                brand: Some("Apple".to_string()),
                availability: "In Stock".to_string(),
            },
        );
        catalog.insert(
            "https://irshad.az/az/telefon-ve-aksesuarlar/samsung-galaxy-a55-8-256-gb-navy",
            Listing {
                name: "Samsung Galaxy A55 8/256 GB Navy".to_string(),
                price: 749.0,
                brand: None,
                availability: "In Stock".to_string(),
            },
        );
        catalog
    }
}

struct Site {
    identifier: &'static str,
    name: &'static str,
    base_url: &'static str,
    domain: &'static str,
}

/// Registration order is the order `/sites` reports.
static SITES: [Site; 2] = [
    Site {
        identifier: "kontakt",
        name: "Kontakt.az",
        base_url: "https://kontakt.az",
        domain: "kontakt.az",
    },
    Site {
        identifier: "irshad",
        name: "Irshad.az",
        base_url: "https://irshad.az",
        domain: "irshad.az",
    },
];

pub type Db = Arc<Catalog>;

pub fn app() -> Router {
    app_with_catalog(Catalog::seeded())
}

pub fn app_with_catalog(catalog: Catalog) -> Router {
    let db: Db = Arc::new(catalog);
    let api = Router::new()
        .route("/health", get(health))
        .route("/sites", get(list_sites))
        .route("/scrape", get(scrape))
        .with_state(db);
    Router::new()
        .nest("/api/v1", api)
        .layer(cors())
        .layer(middleware::from_fn(log_requests))
}

/// Any origin may call the API; preflights are answered before routing.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();
    let response = next.run(request).await;
    info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "handled request"
    );
    response
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn format_price(price: f64) -> String {
    format!("{price:.2} AZN")
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now_rfc3339(),
        version: "1.0.0".to_string(),
        service: "web-scraper-api".to_string(),
    })
}

async fn list_sites() -> Json<SitesResponse> {
    let supported_sites: Vec<SiteInfo> = SITES
        .iter()
        .map(|site| SiteInfo {
            name: site.name.to_string(),
            identifier: site.identifier.to_string(),
            base_url: site.base_url.to_string(),
            description: format!("Scraper for {}", site.name),
        })
        .collect();
    let count = supported_sites.len();
    Json(SitesResponse {
        supported_sites,
        count,
    })
}

type ApiFailure = (StatusCode, Json<ErrorResponse>);

fn failure(status: StatusCode, error: &str, message: String) -> ApiFailure {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
}

async fn scrape(
    State(db): State<Db>,
    Query(params): Query<ScrapeParams>,
) -> Result<Json<Product>, ApiFailure> {
    let (site_id, uri) = match (params.site, params.uri) {
        (Some(site), Some(uri)) if !site.is_empty() && !uri.is_empty() => (site, uri),
        _ => {
            return Err(failure(
                StatusCode::BAD_REQUEST,
                "missing_parameters",
                "Both 'site' and 'uri' parameters are required".to_string(),
            ))
        }
    };

    let site = SITES.iter().find(|s| s.identifier == site_id).ok_or_else(|| {
        failure(
            StatusCode::BAD_REQUEST,
            "unsupported_site",
            format!("Site '{site_id}' is not supported. Use /api/v1/sites to see available sites"),
        )
    })?;

    if !uri.to_lowercase().contains(site.domain) {
        return Err(failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "scraping_failed",
            format!("Failed to scrape URL: URL does not belong to {}: {uri}", site.domain),
        ));
    }

    let listing = db.get(&uri).ok_or_else(|| {
        failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "scraping_failed",
            format!("Failed to scrape URL: product page not found: {uri}"),
        )
    })?;

    Ok(Json(Product {
        name: listing.name.clone(),
        current_price: format_price(listing.price),
        currency: "AZN".to_string(),
        availability: listing.availability.clone(),
        brand: listing.brand.clone(),
        url: uri,
        site: site.identifier.to_string(),
        scraped_at: now_rfc3339(),
    }))
}
