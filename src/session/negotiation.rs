//! Negotiation Handler: single overwritable offer per product
//!
//! A client may propose a price on a product its seller marked negotiable.
//! The amount replaces whatever offer was stored before; there is no history
//! and no accept/reject/counter state.
//!
//! Offers are not serialized: two clients submitting at the same time race,
//! and the write that completes last is the one the store keeps.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::Caller;
use crate::core::error::{CatalogError, CatalogResult};
use crate::core::product::Product;
use crate::core::store::CatalogStore;

#[derive(Clone)]
pub struct NegotiationHandler {
    store: Arc<dyn CatalogStore>,
}

impl NegotiationHandler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Validate a raw offer amount: finite and >= 0
    pub fn validate_amount(amount: f64) -> CatalogResult<Decimal> {
        if !amount.is_finite() {
            return Err(CatalogError::invalid_input(
                "offer",
                format!("offer must be a finite number, got {}", amount),
            ));
        }
        if amount < 0.0 {
            return Err(CatalogError::invalid_input(
                "offer",
                format!("offer must be >= 0, got {}", amount),
            ));
        }
        Decimal::from_f64(amount)
            .map(|d| d.normalize())
            .ok_or_else(|| CatalogError::invalid_input("offer", "offer is out of range"))
    }

    /// Record `amount` as the current offer on `product_id`
    ///
    /// Returns the product as it reads after the write.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: amount is NaN, infinite or negative
    /// - `InvalidOperation`: the caller is not a client or the product is not negotiable
    /// - `NotFound`: no such product
    /// - `UpstreamUnavailable`: the store failed reading or writing
    pub async fn submit_offer(
        &self,
        caller: &Caller,
        product_id: Uuid,
        amount: f64,
    ) -> CatalogResult<Product> {
        let amount = Self::validate_amount(amount)?;

        if !caller.can_negotiate() {
            return Err(CatalogError::invalid_operation(format!(
                "a {} cannot submit offers",
                caller.role
            )));
        }

        let mut product = self
            .store
            .get(&product_id)
            .await
            .map_err(|e| CatalogError::upstream(&e))?
            .ok_or_else(|| CatalogError::not_found("product", product_id))?;

        if !product.negotiable {
            return Err(CatalogError::invalid_operation(format!(
                "product '{}' is not negotiable",
                product.name
            )));
        }

        self.store
            .patch_offer(&product_id, amount)
            .await
            .map_err(|e| CatalogError::upstream(&e))?;

        tracing::info!(
            product_id = %product_id,
            client_id = %caller.id,
            offer = %amount,
            previous = ?product.offer,
            "offer recorded"
        );
        product.offer = Some(amount);
        Ok(product)
    }
}
