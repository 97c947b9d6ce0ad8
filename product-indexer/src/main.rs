use std::env;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use product_indexer::input::load_json;
use product_indexer::{Dependencies, IndexingError, Settings};
use product_indexer_shared::{Order, Product};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run() -> Result<(), IndexingError> {
    let settings = Settings::from_env()?;

    let products: Vec<Product> = load_json(&settings.products_path)?;
    let orders: Vec<Order> = load_json(&settings.orders_path)?;
    info!(
        products = products.len(),
        orders = orders.len(),
        "Loaded catalog and order history"
    );

    let dependencies = Dependencies::new(&settings).await?;
    let summary = dependencies.orchestrator.run(&products, &orders).await?;

    info!(
        products = summary.products_processed,
        published = summary.documents_published,
        skipped_line_items = summary.aggregation.skipped,
        "Indexing finished"
    );
    println!("Indexed products: {}", summary.products_processed);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "Product indexer failed");
        return Err(e);
    }

    Ok(())
}
