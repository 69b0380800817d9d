//! Walks through every client call against a running scraper API.
//!
//! Usage: `scraper-demo [site] [uri]`. The base URL is read from
//! `SCRAPER_API_URL` and defaults to the local server.

use scraper_client::{ClientConfig, PriceLookup, ScraperApi};
use tracing_subscriber::EnvFilter;

const DEFAULT_SITE: &str = "kontakt";
const DEFAULT_URI: &str = "https://kontakt.az/iphone-13-128-gb-midnight";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = ClientConfig::default();
    if let Ok(base_url) = std::env::var("SCRAPER_API_URL") {
        config = config.with_base_url(base_url);
    }
    let mut args = std::env::args().skip(1);
    let site = args.next().unwrap_or_else(|| DEFAULT_SITE.to_string());
    let uri = args.next().unwrap_or_else(|| DEFAULT_URI.to_string());

    let api = ScraperApi::new(config)?;

    println!("=== API Health Check ===");
    let health = api.health_check().await?;
    println!("Status: {}", health.status);
    println!("Version: {}", health.version);
    println!();

    println!("=== Supported Sites ===");
    let sites = api.supported_sites().await?;
    for site in &sites.supported_sites {
        println!("- {} ({})", site.name, site.identifier);
    }
    println!();

    println!("=== Scraping Product ===");
    let product = api.scrape_product(&site, &uri).await?;
    println!("Product: {}", product.name);
    println!("Price: {}", product.current_price);
    println!("Brand: {}", product.brand.as_deref().unwrap_or("N/A"));
    println!("Scraped at: {}", product.scraped_at);
    println!();

    println!("=== Current Price Only ===");
    match api.current_price(&site, &uri).await {
        PriceLookup::Found(price) => println!("Current Price: {price}"),
        PriceLookup::Unavailable(err) => println!("Current Price: unavailable ({err})"),
    }

    Ok(())
}
