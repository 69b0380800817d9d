//! HTTP transport types for the host-does-IO split.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `ScraperClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network; `ScraperApi` (or any other host)
//! performs the actual round-trip in between.
//!
//! Every endpoint of the scraper API is a GET, so a request is fully
//! described by its path, its query pairs and its headers.

use url::form_urlencoded;

/// A GET request described as plain data.
///
/// Query pairs are kept decoded; `url()` applies form-urlencoding when the
/// request is rendered, so a `uri` containing `&`, `=` or spaces survives
/// the trip to the server unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(path: String) -> Self {
        Self {
            path,
            query: Vec::new(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Full request URL with the query string appended in insertion order.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{query}", self.path)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
