//! Session-scoped wishlist
//!
//! Holds product ids only; products are resolved by id when the wishlist is
//! displayed so it never shows stale copies.

use indexmap::IndexSet;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    items: IndexSet<Uuid>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the product, or remove it if already present
    ///
    /// Returns `true` when the product is in the wishlist afterwards.
    pub fn toggle(&mut self, product_id: Uuid) -> bool {
        if self.items.shift_remove(&product_id) {
            false
        } else {
            self.items.insert(product_id);
            true
        }
    }

    pub fn contains(&self, product_id: &Uuid) -> bool {
        self.items.contains(product_id)
    }

    pub fn remove(&mut self, product_id: &Uuid) -> bool {
        self.items.shift_remove(product_id)
    }

    /// Product ids in the order they were added
    pub fn ids(&self) -> impl Iterator<Item = &Uuid> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
