use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_catalog, Catalog, ErrorResponse, HealthResponse, Listing, Product, SitesResponse};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

const KONTAKT_IPHONE: &str = "https%3A%2F%2Fkontakt.az%2Fiphone-13-128-gb-midnight";

// --- health ---

#[tokio::test]
async fn health_reports_service_and_version() {
    let resp = app().oneshot(get("/api/v1/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = body_json(resp).await;
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
    assert_eq!(health.service, "web-scraper-api");
    assert!(health.timestamp.ends_with('Z'));
}

#[tokio::test]
async fn routes_outside_prefix_are_not_found() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- cors ---

#[tokio::test]
async fn preflight_is_answered_with_cors_headers() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/v1/scrape")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("GET"));
    assert!(methods.contains("OPTIONS"));
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap().to_lowercase();
    assert!(allowed.contains("content-type"));
    assert!(allowed.contains("authorization"));
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn cross_origin_get_carries_allow_origin() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

// --- sites ---

#[tokio::test]
async fn sites_are_listed_in_registration_order() {
    let resp = app().oneshot(get("/api/v1/sites")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let sites: SitesResponse = body_json(resp).await;
    assert_eq!(sites.count, 2);
    let ids: Vec<&str> = sites.supported_sites.iter().map(|s| s.identifier.as_str()).collect();
    assert_eq!(ids, ["kontakt", "irshad"]);
    assert_eq!(sites.supported_sites[0].name, "Kontakt.az");
    assert_eq!(sites.supported_sites[0].base_url, "https://kontakt.az");
    assert_eq!(sites.supported_sites[0].description, "Scraper for Kontakt.az");
}

// --- scrape ---

#[tokio::test]
async fn scrape_known_product() {
    let resp = app()
        .oneshot(get(&format!("/api/v1/scrape?site=kontakt&uri={KONTAKT_IPHONE}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let product: Product = body_json(resp).await;
    assert_eq!(product.name, "Apple iPhone 13 128GB Midnight");
    assert_eq!(product.current_price, "1299.99 AZN");
    assert_eq!(product.brand.as_deref(), Some("Apple"));
    assert_eq!(product.url, "https://kontakt.az/iphone-13-128-gb-midnight");
    assert_eq!(product.site, "kontakt");
}

#[tokio::test]
async fn scrape_missing_parameters_returns_400() {
    let resp = app().oneshot(get("/api/v1/scrape?site=kontakt")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.error, "missing_parameters");
}

#[tokio::test]
async fn scrape_empty_parameter_returns_400() {
    let resp = app()
        .oneshot(get(&format!("/api/v1/scrape?site=&uri={KONTAKT_IPHONE}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.error, "missing_parameters");
}

#[tokio::test]
async fn scrape_unsupported_site_returns_400() {
    let resp = app()
        .oneshot(get(&format!("/api/v1/scrape?site=optimal&uri={KONTAKT_IPHONE}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.error, "unsupported_site");
    assert_eq!(
        err.message,
        "Site 'optimal' is not supported. Use /api/v1/sites to see available sites"
    );
}

#[tokio::test]
async fn scrape_foreign_url_returns_500() {
    let resp = app()
        .oneshot(get(&format!("/api/v1/scrape?site=irshad&uri={KONTAKT_IPHONE}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.error, "scraping_failed");
    assert!(err.message.contains("does not belong to irshad.az"));
}

#[tokio::test]
async fn scrape_unknown_page_returns_500() {
    let resp = app()
        .oneshot(get("/api/v1/scrape?site=kontakt&uri=https%3A%2F%2Fkontakt.az%2Fnope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.error, "scraping_failed");
    assert_eq!(
        err.message,
        "Failed to scrape URL: product page not found: https://kontakt.az/nope"
    );
}

#[tokio::test]
async fn scrape_decodes_reserved_characters_in_uri() {
    let mut catalog = Catalog::new();
    catalog.insert(
        "https://kontakt.az/search?q=a b&page=2",
        Listing {
            name: "Search hit".to_string(),
            price: 10.5,
            brand: None,
            availability: "In Stock".to_string(),
        },
    );

    let resp = app_with_catalog(catalog)
        .oneshot(get(
            "/api/v1/scrape?site=kontakt&uri=https%3A%2F%2Fkontakt.az%2Fsearch%3Fq%3Da+b%26page%3D2",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["url"], "https://kontakt.az/search?q=a b&page=2");
    assert_eq!(json["current_price"], "10.50 AZN");
    assert!(json.get("brand").is_none());
}
