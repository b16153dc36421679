//! # Marketplace Catalog
//!
//! Catalog query and negotiation engine for a marketplace where sellers list
//! products and clients browse, negotiate and fill a cart.
//!
//! ## Features
//!
//! - **Composable Filters**: independently toggleable criteria combined with logical AND
//! - **Debounced Text Search**: one query per pause in typing, not per keystroke
//! - **Ordered Results**: late responses never overwrite fresher ones
//! - **Graceful Degradation**: store failures keep the last good result set
//! - **Promo Pricing**: display and struck-through prices derived from a discount
//! - **Negotiation**: a single overwritable offer on negotiable products
//! - **Carts and Wishlists**: session-scoped, recomputed totals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog::prelude::*;
//!
//! let store = Arc::new(InMemoryCatalogStore::from_yaml_file("catalog.yaml")?);
//! let mut session = CatalogSession::new(Caller::client(client_id), store, CatalogConfig::default())?;
//!
//! session.refresh().await;
//! session.input(CriterionKind::Category, "Laptop").await?;
//! session.set_enabled(CriterionKind::Category, true).await;
//!
//! for listing in session.listings() {
//!     println!("{} {:?}", listing.product.name, listing.pricing);
//! }
//!
//! session.submit_offer(product_id, 850.0).await?;
//! session.add_to_cart(product_id, 1).await?;
//! println!("total: {}", session.cart().grand_total()?);
//! ```

pub mod config;
pub mod core;
pub mod session;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{Caller, Role},
        error::{CatalogError, CatalogResult, ErrorNotice},
        events::{CatalogEvent, EventBus},
        filter::{Criterion, CriterionKind, FilterSet, PriceRange},
        pricing::{PriceDisplay, derive},
        product::{Category, Product, ProductState},
        query::ProductQuery,
        store::CatalogStore,
    };

    // === Session ===
    pub use crate::session::{
        Cart, CartLine, CatalogSession, NegotiationHandler, ProductListing, QueryComposer,
        Refresh, Wishlist,
    };

    // === Storage ===
    pub use crate::storage::InMemoryCatalogStore;

    // === Config ===
    pub use crate::config::{CatalogConfig, PriceSliderConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use rust_decimal::Decimal;
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
