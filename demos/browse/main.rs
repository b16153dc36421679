//! Browsing session walkthrough
//!
//! This example demonstrates:
//! - Seeding an in-memory catalog from YAML
//! - Combining filters and watching results update
//! - Debounced name search
//! - Submitting an offer on a negotiable product
//! - Filling a cart and reading its total
//!
//! Run with `RUST_LOG=catalog=debug` to see every query the session issues.

use anyhow::Result;
use catalog::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CATALOG: &str = include_str!("catalog.yaml");

fn print_listings(session: &CatalogSession) {
    let currency = &session.config().currency;
    for listing in session.listings() {
        let product = &listing.product;
        match listing.pricing {
            Some(pricing) if pricing.has_discount() => println!(
                "   - {} ({}, {}): {} (was {}, -{}%)",
                product.name,
                product.brand,
                product.state,
                pricing.format_display(currency),
                pricing.format_original(currency),
                pricing.promo
            ),
            Some(pricing) => println!(
                "   - {} ({}, {}): {}",
                product.name,
                product.brand,
                product.state,
                pricing.format_display(currency)
            ),
            None => println!("   - {} ({}): price unavailable", product.name, product.brand),
        }
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🛒 Marketplace Catalog Example");
    println!("==============================\n");

    let store = InMemoryCatalogStore::from_yaml_str(CATALOG)?;
    println!("✅ Loaded {} products\n", store.len());

    let config = CatalogConfig::default();
    let mut session = CatalogSession::new(
        Caller::client(Uuid::new_v4()),
        Arc::new(store.clone()),
        config,
    )?;
    let mut events = session.subscribe();

    // Initial listing: nothing active, so everything comes back
    session.refresh().await;
    println!("📦 All products:");
    print_listings(&session);

    // Category and state combine
    session.input(CriterionKind::Category, "phone").await?;
    session.set_enabled(CriterionKind::Category, true).await;
    session.input(CriterionKind::State, "used").await?;
    session.set_enabled(CriterionKind::State, true).await;
    println!("📱 Used phones:");
    print_listings(&session);

    // Clear both and search by name
    session.set_enabled(CriterionKind::Category, false).await;
    session.set_enabled(CriterionKind::State, false).await;
    for text in ["a", "ai", "air"] {
        session.input(CriterionKind::Name, text).await?;
    }
    tokio::time::sleep(session.config().debounce() + Duration::from_millis(50)).await;
    println!("🔎 Name contains \"air\":");
    print_listings(&session);

    // Negotiate on the first negotiable match
    if let Some(product) = session
        .current_results()
        .into_iter()
        .find(|p| p.negotiable)
    {
        session.submit_offer(product.id, 1650.0).await?;
        let updated = session.product(product.id).await?;
        println!(
            "🤝 Offer on {}: {}\n",
            updated.name,
            updated
                .offer
                .map(|offer| PriceDisplay::format_amount(&session.config().currency, offer))
                .unwrap_or_default()
        );
    }

    // Fill the cart
    let all = store.fetch_all().await?;
    for (name, quantity) in [("Redmi Note 12", 2), ("AirPods Pro", 1)] {
        if let Some(product) = all.iter().find(|p| p.name == name) {
            session.add_to_cart(product.id, quantity).await?;
        }
    }
    if let Some(airpods) = all.iter().find(|p| p.name == "AirPods Pro") {
        session.cart_mut().set_quantity(airpods.id, 1)?;
    }
    println!("🧾 Cart ({} lines):", session.cart().line_count());
    for line in session.cart().lines() {
        println!(
            "   - {} x{}: {}",
            line.product().name,
            line.quantity(),
            PriceDisplay::format_amount(&session.config().currency, line.line_total()?)
        );
    }
    println!(
        "   Total: {}\n",
        PriceDisplay::format_amount(&session.config().currency, session.cart().grand_total()?)
    );

    println!("📡 Events seen:");
    while let Ok(event) = events.try_recv() {
        println!("   - {}", serde_json::to_string(&event)?);
    }

    session.logout();
    println!("\n👋 Logged out, cart has {} lines", session.cart().line_count());

    Ok(())
}
