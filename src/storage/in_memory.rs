//! In-memory implementation of CatalogStore for testing and development

use crate::core::{CatalogStore, Product, ProductQuery};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory catalog store
///
/// Keeps products in insertion order so listings are stable. Uses RwLock for
/// thread-safe access; clones share the same catalog.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalogStore {
    products: Arc<RwLock<IndexMap<Uuid, Product>>>,
}

impl InMemoryCatalogStore {
    /// Create an empty in-memory catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `products`
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }

    /// Seed a catalog from a YAML list of products
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let products: Vec<Product> =
            serde_yaml::from_str(yaml).context("invalid product catalog")?;
        Ok(Self::with_products(products))
    }

    /// Seed a catalog from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Insert or replace a product
    pub fn insert(&self, product: Product) -> Result<Product> {
        let mut products = self
            .products
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        products.insert(product.id, product.clone());

        Ok(product)
    }

    /// Number of products in the catalog
    pub fn len(&self) -> usize {
        self.products.read().map(|p| p.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn fetch_all(&self) -> Result<Vec<Product>> {
        let products = self
            .products
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(products.values().cloned().collect())
    }

    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let products = self
            .products
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(products
            .values()
            .filter(|product| query.matches(product))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Product>> {
        let products = self
            .products
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(products.get(id).cloned())
    }

    async fn patch_offer(&self, id: &Uuid, amount: Decimal) -> Result<()> {
        let mut products = self
            .products
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let product = products
            .get_mut(id)
            .ok_or_else(|| anyhow!("Product {} not found", id))?;
        product.offer = Some(amount);

        Ok(())
    }
}
