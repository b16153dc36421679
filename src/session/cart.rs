//! Cart Aggregator
//!
//! Totals are always recomputed from `unit_price × quantity`; nothing is
//! cached, so mutations can never leave a stale total behind. Arithmetic is
//! checked: a mutation whose total would not fit a `Decimal` is refused.
//!
//! Adding the same product twice creates two lines, each with its own
//! quantity. Lines are never merged.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::product::Product;

/// One cart entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    product: Product,
    unit_price: Decimal,
    quantity: u32,
}

impl CartLine {
    /// Product as it was when added
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> CatalogResult<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(total_out_of_range)
    }

    /// Upper bound for the quantity, taken from the snapshot's stock
    fn max_quantity(&self) -> u32 {
        self.product.stock.max(1)
    }
}

fn total_out_of_range() -> CatalogError {
    CatalogError::invalid_operation("cart total out of range")
}

/// Checked sum of line totals
fn total_of<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> CatalogResult<Decimal> {
    lines.into_iter().try_fold(Decimal::ZERO, |total, line| {
        total
            .checked_add(line.line_total()?)
            .ok_or_else(total_out_of_range)
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line for `product`. Returns the new line's index.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: quantity is 0
    /// - `InvalidOperation`: product unavailable, quantity above stock, or
    ///   a cart total that would overflow
    pub fn add_line(&mut self, product: &Product, quantity: u32) -> CatalogResult<usize> {
        if quantity == 0 {
            return Err(CatalogError::invalid_input(
                "quantity",
                "quantity must be at least 1",
            ));
        }
        if !product.available {
            return Err(CatalogError::invalid_operation(format!(
                "product '{}' is not available",
                product.name
            )));
        }
        if quantity > product.stock {
            return Err(CatalogError::invalid_operation(format!(
                "only {} of '{}' in stock",
                product.stock, product.name
            )));
        }

        let line = CartLine {
            product: product.clone(),
            unit_price: product.price,
            quantity,
        };
        total_of(self.lines.iter().chain([&line]))?;

        self.lines.push(line);
        tracing::info!(product_id = %product.id, quantity, "cart line added");
        Ok(self.lines.len() - 1)
    }

    /// Remove the line at `index` immediately
    pub fn remove_line(&mut self, index: usize) -> CatalogResult<CartLine> {
        if index >= self.lines.len() {
            return Err(CatalogError::not_found("cart line", index));
        }
        let line = self.lines.remove(index);
        tracing::info!(product_id = %line.product.id, index, "cart line removed");
        Ok(line)
    }

    /// Shift the quantity of every line holding `product_id` by `delta`
    ///
    /// Quantities are clamped to `[1, stock]`. An increment is refused when
    /// every matching line already sits at its stock limit.
    pub fn set_quantity(&mut self, product_id: Uuid, delta: i64) -> CatalogResult<()> {
        let matching: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.product.id == product_id)
            .map(|(index, _)| index)
            .collect();
        if matching.is_empty() {
            return Err(CatalogError::not_found("cart line for product", product_id));
        }

        let saturated = matching
            .iter()
            .filter_map(|index| self.lines.get(*index))
            .all(|line| line.quantity >= line.max_quantity());
        if delta > 0 && saturated {
            return Err(CatalogError::invalid_operation(
                "quantity already at available stock",
            ));
        }

        let mut updated = self.lines.clone();
        for index in matching {
            if let Some(line) = updated.get_mut(index) {
                let max = i64::from(line.max_quantity());
                let target = i64::from(line.quantity).saturating_add(delta).clamp(1, max);
                line.quantity = u32::try_from(target).unwrap_or(line.quantity);
            }
        }
        total_of(&updated)?;

        self.lines = updated;
        Ok(())
    }

    /// Sum of every line total, recomputed on each call
    pub fn grand_total(&self) -> CatalogResult<Decimal> {
        total_of(&self.lines)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
