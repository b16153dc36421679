//! Core module containing the catalog domain types and pure logic

pub mod auth;
pub mod error;
pub mod events;
pub mod filter;
pub mod pricing;
pub mod product;
pub mod query;
pub mod store;

pub use auth::{Caller, Role};
pub use error::{CatalogError, CatalogResult, ErrorNotice};
pub use events::{CatalogEvent, EventBus};
pub use filter::{Criterion, CriterionKind, FilterSet, FilterSlot, PriceRange};
pub use pricing::PriceDisplay;
pub use product::{Category, Product, ProductState};
pub use query::ProductQuery;
pub use store::CatalogStore;
