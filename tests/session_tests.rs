//! Integration tests for the browsing session surface
//!
//! These tests verify that:
//! - Listings carry derived prices
//! - The wishlist resolves products by id
//! - Catalogs and sessions can be configured from YAML
//! - Search forms map onto the same query as the filters

mod catalog_harness;

use catalog::prelude::*;
use catalog_harness::*;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

const CATALOG_YAML: &str = r#"
- name: Mi Band 8
  brand: Xiaomi
  category: Accessories
  state: new
  price: 120
  promo: 25
  stock: 10
  created_at: 2024-05-02T09:00:00Z
- name: Pixel 7
  brand: Google
  category: Phone
  state: used
  price: 510
  negotiable: true
  stock: 1
  created_at: 2024-05-20T09:00:00Z
"#;

#[tokio::test]
async fn test_listings_carry_prices() {
    let session =
        CatalogSession::new(client(), Arc::new(sample_store()), CatalogConfig::default()).unwrap();
    session.refresh().await;

    let listings = session.listings();
    assert_eq!(listings.len(), sample_products().len());

    let thinkpad = listings
        .iter()
        .find(|l| l.product.name == "ThinkPad T14")
        .unwrap();
    let pricing = thinkpad.pricing.unwrap();
    assert!(pricing.has_discount());
    assert_eq!(pricing.display_price, dec!(650));
    assert_eq!(pricing.original_price, dec!(812.5));
    assert_eq!(pricing.format_original("TND"), "TND 812.50");

    let galaxy = listings
        .iter()
        .find(|l| l.product.name == "Galaxy S24")
        .unwrap();
    let pricing = galaxy.pricing.unwrap();
    assert!(!pricing.has_discount());
    assert_eq!(pricing.original_price, pricing.display_price);
}

#[tokio::test]
async fn test_impossible_promo_has_no_pricing() {
    let broken = Product::new("Cable", "Anker", Category::Accessories, ProductState::New, dec!(9))
        .with_promo(dec!(100))
        .with_stock(4);
    let store = InMemoryCatalogStore::with_products([broken]);
    let session =
        CatalogSession::new(client(), Arc::new(store), CatalogConfig::default()).unwrap();
    session.refresh().await;

    let listings = session.listings();
    assert_eq!(listings.len(), 1);
    assert!(listings[0].pricing.is_none());
}

#[tokio::test]
async fn test_unrepresentable_original_price_keeps_listing() {
    let extreme = Product::new("Yacht", "Azimut", Category::Others, ProductState::New, Decimal::MAX)
        .with_promo(dec!(99.99))
        .with_stock(1);
    let store = InMemoryCatalogStore::with_products(sample_products().into_iter().chain([extreme]));
    let session =
        CatalogSession::new(client(), Arc::new(store), CatalogConfig::default()).unwrap();
    session.refresh().await;

    let listings = session.listings();
    assert_eq!(listings.len(), sample_products().len() + 1);

    let yacht = listings.iter().find(|l| l.product.name == "Yacht").unwrap();
    assert!(yacht.pricing.is_none());
    assert_eq!(
        listings.iter().filter(|l| l.pricing.is_some()).count(),
        sample_products().len()
    );
}

#[tokio::test]
async fn test_wishlist_products_skip_removed_ids() {
    let store = sample_store();
    let frame = product_named(&store, "Samsung Frame").await;
    let drone = product_named(&store, "Drone mini").await;
    let mut session =
        CatalogSession::new(client(), Arc::new(store), CatalogConfig::default()).unwrap();

    assert!(session.toggle_wishlist(frame.id));
    assert!(session.toggle_wishlist(Uuid::new_v4()));
    assert!(session.toggle_wishlist(drone.id));

    let products = session.wishlist_products().await.unwrap();
    assert_eq!(names(&products), vec!["Drone mini", "Samsung Frame"]);

    assert!(!session.toggle_wishlist(frame.id));
    assert_eq!(session.wishlist().len(), 2);
}

#[tokio::test]
async fn test_product_detail() {
    let store = sample_store();
    let galaxy = product_named(&store, "Galaxy S24").await;
    let session =
        CatalogSession::new(client(), Arc::new(store), CatalogConfig::default()).unwrap();

    assert_eq!(session.product(galaxy.id).await.unwrap(), galaxy);
    assert_eq!(
        session.product(Uuid::new_v4()).await.unwrap_err().error_code(),
        "NOT_FOUND"
    );
}

#[tokio::test]
async fn test_yaml_catalog_and_config() {
    let mut catalog_file = NamedTempFile::new().unwrap();
    catalog_file.write_all(CATALOG_YAML.as_bytes()).unwrap();
    let store = InMemoryCatalogStore::from_yaml_file(catalog_file.path().to_str().unwrap()).unwrap();
    assert_eq!(store.len(), 2);

    let config = CatalogConfig::from_yaml_str(
        r#"
debounce_ms: 250
currency: EUR
enabled_by_default: [name, availability]
"#,
    )
    .unwrap();
    assert_eq!(config.debounce_ms, 250);

    let session = CatalogSession::new(client(), Arc::new(store), config).unwrap();
    session.input(CriterionKind::Availability, "yes").await.unwrap();

    let listings = session.listings();
    assert_eq!(listings.len(), 2);
    let band = listings
        .iter()
        .find(|l| l.product.name == "Mi Band 8")
        .unwrap();
    assert_eq!(
        band.pricing.unwrap().format_display(&session.config().currency),
        "EUR 120.00"
    );
    assert_eq!(
        band.pricing.unwrap().format_original(&session.config().currency),
        "EUR 160.00"
    );
}

#[tokio::test]
async fn test_search_form_matches_filter_query() {
    let store = CountingStore::new(sample_store());
    let session =
        CatalogSession::new(client(), Arc::new(store.clone()), CatalogConfig::default()).unwrap();

    session.input(CriterionKind::Price, "300..1000").await.unwrap();
    session.set_enabled(CriterionKind::Price, true).await;
    session.input(CriterionKind::State, "used").await.unwrap();
    session.set_enabled(CriterionKind::State, true).await;

    let from_form = ProductQuery::from_pairs([
        ("maxPrice", "1000"),
        ("state", "used"),
        ("minPrice", "300"),
        ("brand", "  "),
        ("sort", "price"),
    ])
    .unwrap();

    assert_eq!(store.last_query().unwrap(), from_form);
    assert_eq!(
        names(&session.current_results()),
        names(&from_form.apply(sample_products()))
    );
    assert_eq!(
        names(&session.current_results()),
        vec!["Drone mini", "Samsung Frame", "ThinkPad T14", "iPhone 13"]
    );
}
