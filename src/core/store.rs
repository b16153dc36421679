//! Catalog Store contract consumed by the core

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::product::Product;
use crate::core::query::ProductQuery;

/// Source of product records
///
/// The core is agnostic to how the store is reached (local call, HTTP,
/// RPC). Any error returned here is treated as the store being
/// unavailable.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every product in the catalog
    async fn fetch_all(&self) -> Result<Vec<Product>>;

    /// Products matching every field set in `query`
    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>>;

    /// A single product, used to hand a product over to a detail view
    async fn get(&self, id: &Uuid) -> Result<Option<Product>>;

    /// Overwrite the current offer of a product
    ///
    /// Concurrent patches are last-write-wins.
    async fn patch_offer(&self, id: &Uuid, amount: Decimal) -> Result<()>;
}
