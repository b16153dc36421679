//! Browsing session: the single logical actor of the catalog core
//!
//! A [`CatalogSession`] is created for one authenticated caller and owns
//! everything scoped to that visit: the filter state and result set, the
//! cart and the wishlist. Nothing here is shared across sessions; the only
//! shared state is the Catalog Store itself.

pub mod cart;
pub mod composer;
pub mod negotiation;
pub mod wishlist;

pub use cart::{Cart, CartLine};
pub use composer::{QueryComposer, Refresh};
pub use negotiation::NegotiationHandler;
pub use wishlist::Wishlist;

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::core::auth::Caller;
use crate::core::error::{CatalogError, CatalogResult};
use crate::core::events::CatalogEvent;
use crate::core::filter::{Criterion, CriterionKind};
use crate::core::pricing::PriceDisplay;
use crate::core::product::Product;
use crate::core::store::CatalogStore;

/// A product ready for display
///
/// `pricing` is `None` when the product carries an impossible promo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListing {
    pub product: Product,
    pub pricing: Option<PriceDisplay>,
}

impl ProductListing {
    pub fn new(product: Product) -> Self {
        let pricing = match product.pricing() {
            Ok(pricing) => Some(pricing),
            Err(err) => {
                tracing::warn!(product_id = %product.id, error = %err, "cannot price product");
                None
            }
        };
        Self { product, pricing }
    }
}

pub struct CatalogSession {
    caller: Caller,
    config: CatalogConfig,
    store: Arc<dyn CatalogStore>,
    composer: QueryComposer,
    negotiation: NegotiationHandler,
    cart: Cart,
    wishlist: Wishlist,
}

impl CatalogSession {
    pub fn new(
        caller: Caller,
        store: Arc<dyn CatalogStore>,
        config: CatalogConfig,
    ) -> CatalogResult<Self> {
        let composer = QueryComposer::new(store.clone(), &config)?;
        tracing::debug!(caller_id = %caller.id, role = %caller.role, "catalog session started");
        Ok(Self {
            caller,
            config,
            negotiation: NegotiationHandler::new(store.clone()),
            store,
            composer,
            cart: Cart::new(),
            wishlist: Wishlist::new(),
        })
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn composer(&self) -> &QueryComposer {
        &self.composer
    }

    // === Filters and results ===

    pub async fn set_criterion(&self, criterion: Criterion) -> Refresh {
        self.composer.set_criterion(criterion).await
    }

    /// Parse raw UI input for `kind`, then store it
    ///
    /// Malformed input is rejected here and leaves the filters untouched.
    /// Price bounds must also sit on the configured slider steps.
    pub async fn input(&self, kind: CriterionKind, raw: &str) -> CatalogResult<Refresh> {
        let criterion = Criterion::parse(kind, raw)?;
        if let Criterion::PriceBetween(range) = &criterion {
            self.config.price_range.check_notches(range)?;
        }
        Ok(self.composer.set_criterion(criterion).await)
    }

    pub async fn set_enabled(&self, kind: CriterionKind, enabled: bool) -> Refresh {
        self.composer.set_enabled(kind, enabled).await
    }

    pub fn active_criteria(&self) -> Vec<Criterion> {
        self.composer.active_criteria()
    }

    pub async fn refresh(&self) -> Refresh {
        self.composer.refresh().await
    }

    pub fn current_results(&self) -> Vec<Product> {
        self.composer.current_results()
    }

    /// Current results paired with their derived prices
    pub fn listings(&self) -> Vec<ProductListing> {
        self.current_results()
            .into_iter()
            .map(ProductListing::new)
            .collect()
    }

    pub fn last_notice(&self) -> Option<CatalogError> {
        self.composer.last_notice()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.composer.subscribe()
    }

    /// Fetch one product by id for a detail view
    pub async fn product(&self, id: Uuid) -> CatalogResult<Product> {
        self.store
            .get(&id)
            .await
            .map_err(|e| CatalogError::upstream(&e))?
            .ok_or_else(|| CatalogError::not_found("product", id))
    }

    // === Negotiation ===

    /// Submit an offer as this session's caller
    ///
    /// On success the cached copy in the current results shows the new offer.
    pub async fn submit_offer(&self, product_id: Uuid, amount: f64) -> CatalogResult<Product> {
        let product = self
            .negotiation
            .submit_offer(&self.caller, product_id, amount)
            .await?;
        self.composer.update_cached(&product);
        Ok(product)
    }

    // === Cart ===

    /// Look the product up by id and append a cart line for it
    pub async fn add_to_cart(&mut self, product_id: Uuid, quantity: u32) -> CatalogResult<usize> {
        let product = self.product(product_id).await?;
        self.cart.add_line(&product, quantity)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    // === Wishlist ===

    pub fn toggle_wishlist(&mut self, product_id: Uuid) -> bool {
        self.wishlist.toggle(product_id)
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Resolve wishlist entries; products deleted since are skipped
    pub async fn wishlist_products(&self) -> CatalogResult<Vec<Product>> {
        let mut products = Vec::with_capacity(self.wishlist.len());
        for id in self.wishlist.ids() {
            match self.store.get(id).await {
                Ok(Some(product)) => products.push(product),
                Ok(None) => tracing::debug!(product_id = %id, "wishlist product no longer listed"),
                Err(err) => return Err(CatalogError::upstream(&err)),
            }
        }
        Ok(products)
    }

    /// Drop everything scoped to the caller
    pub fn logout(&mut self) {
        self.composer.cancel_pending();
        self.cart.clear();
        self.wishlist.clear();
        tracing::debug!(caller_id = %self.caller.id, "catalog session ended");
    }
}

impl std::fmt::Debug for CatalogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSession")
            .field("caller", &self.caller)
            .field("composer", &self.composer)
            .field("cart_lines", &self.cart.line_count())
            .field("wishlist", &self.wishlist.len())
            .finish()
    }
}
