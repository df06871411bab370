// stockroom-client/examples/list_products.rs
// Print one page of products and the category metrics

use shared::{Availability, Query};
use stockroom_client::{ClientConfig, ProductService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("Usage: {} [name] [availability]", args[0]);
        println!("  Example: {} milk in_stock", args[0]);
        return Ok(());
    }

    let config = ClientConfig::from_env();
    let service = ProductService::new(config.build_http_client()?);

    let name = args.get(1).map(String::as_str).unwrap_or("");
    let availability: Availability = args.get(2).map(String::as_str).unwrap_or("").parse()?;

    let mut query = Query::new(config.page_size);
    query.set_filters(name, Vec::<String>::new(), availability);

    let page = match service.list(&query).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Failed to list products: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Page {} of {} ({} products)",
        page.page_number + 1,
        page.total_pages().max(1),
        page.total_elements
    );
    for product in &page.items {
        println!(
            "{:>5}  {:<24} {:<14} $ {:>9.2} {:>6}",
            product.id, product.name, product.category, product.unit_price, product.in_stock
        );
    }

    match service.metrics().await {
        Ok(metrics) => {
            for metric in metrics {
                println!(
                    "{:<14} {:>6} $ {:>10.2} $ {:>8.2}",
                    metric.category, metric.product_count, metric.total_value, metric.average_price
                );
            }
        }
        Err(e) => tracing::error!("Failed to load metrics: {}", e),
    }

    Ok(())
}
