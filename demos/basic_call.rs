//! Basic example talking to a BSH backend.
//!
//! This example shows how to:
//! - Configure an engine with a host and an API key
//! - Check platform health
//! - Look up an entity row and read the envelope
//! - Hand a failure to an `on_error` callback
//!
//! Run with: `BSH_HOST=http://localhost:2024 BSH_API_KEY=... cargo run --example basic_call`

use bsh_engine::{BshEngine, BshSearch, Callbacks, Credential, Error, FilterOperator};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Product {
    id: u64,
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("bsh_engine=debug,basic_call=info")
        .init();

    let host = std::env::var("BSH_HOST").unwrap_or_else(|_| "http://localhost:2024".to_string());
    let mut builder = BshEngine::builder().host(host);
    if let Ok(key) = std::env::var("BSH_API_KEY") {
        builder = builder.auth(Credential::api_key(key));
    }
    let engine = builder.build();

    println!("=== Health ===");
    let health = engine.status()?.health::<Value>(Callbacks::none()).await?;
    if let Some(response) = health.value() {
        println!("Code: {} ({})", response.code, response.status);
    }
    println!();

    println!("=== Find by id ===");
    let products = engine.entities("Product")?;
    match products.find_by_id::<Product>(1, Callbacks::none()).await {
        Ok(outcome) => println!("Product: {:?}", outcome.into_value().and_then(|r| r.into_first())),
        Err(Error::Api(err)) => println!("Lookup failed with {} at {}", err.status, err.endpoint),
        Err(e) => return Err(e),
    }
    println!();

    println!("=== Search with callbacks ===");
    let search = BshSearch::new()
        .filter("name", FilterOperator::Like, "La")
        .page(0, 5);
    products
        .search::<Product, _>(
            &search,
            Callbacks::none()
                .on_success(|r| println!("Found {} product(s)", r.data.len()))
                .on_error(|e| println!("Search failed: {}", e)),
        )
        .await?;

    Ok(())
}
