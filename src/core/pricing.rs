//! Display price derivation from a promotional discount
//!
//! The stored `price` is what the client pays. When a promo is running, the
//! listing also shows the price before the discount, struck through:
//!
//! ```text
//! original = price / (1 - promo / 100)      when promo > 0
//! original = price                          otherwise
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::error::{CatalogError, CatalogResult};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Prices rendered for one product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceDisplay {
    /// Price the client pays
    pub display_price: Decimal,
    /// Price before the promo (equal to `display_price` without promo)
    pub original_price: Decimal,
    /// Promo percentage the prices were derived from
    pub promo: Decimal,
}

impl PriceDisplay {
    /// Whether a struck-through original price should be shown
    pub fn has_discount(&self) -> bool {
        self.promo > Decimal::ZERO
    }

    /// Amount saved compared to the original price
    pub fn discount_amount(&self) -> Decimal {
        self.original_price - self.display_price
    }

    /// Render `amount` with two decimals after `currency`, e.g. `TND 125.00`
    pub fn format_amount(currency: &str, amount: Decimal) -> String {
        format!("{} {:.2}", currency, amount.round_dp(2))
    }

    pub fn format_display(&self, currency: &str) -> String {
        Self::format_amount(currency, self.display_price)
    }

    pub fn format_original(&self, currency: &str) -> String {
        Self::format_amount(currency, self.original_price)
    }
}

/// Derive the display and original price of a product
///
/// # Errors
///
/// - `InvalidInput` on `price` when it is negative
/// - `InvalidInput` on `promo` when it is outside `[0, 100)`
/// - `InvalidInput` on `price` when the original price does not fit a `Decimal`
pub fn derive(price: Decimal, promo: Decimal) -> CatalogResult<PriceDisplay> {
    if price < Decimal::ZERO {
        return Err(CatalogError::invalid_input(
            "price",
            format!("price must be >= 0, got {}", price),
        ));
    }
    if promo < Decimal::ZERO {
        return Err(CatalogError::invalid_input(
            "promo",
            format!("promo must be >= 0, got {}", promo),
        ));
    }
    if promo >= HUNDRED {
        return Err(CatalogError::invalid_input(
            "promo",
            format!("promo must be below 100, got {}", promo),
        ));
    }

    let original_price = if promo > Decimal::ZERO {
        let remaining = Decimal::ONE - promo / HUNDRED;
        price
            .checked_div(remaining)
            .ok_or_else(|| CatalogError::invalid_input("price", "original price out of range"))?
            .normalize()
    } else {
        price
    };

    Ok(PriceDisplay {
        display_price: price,
        original_price,
        promo,
    })
}
