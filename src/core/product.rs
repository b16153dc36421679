//! Product records owned by the Catalog Store

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::pricing::{self, PriceDisplay};

/// Condition of a listed product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductState {
    New,
    Used,
}

impl ProductState {
    pub const ALL: [ProductState; 2] = [ProductState::New, ProductState::Used];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductState::New => "new",
            ProductState::Used => "used",
        }
    }
}

impl fmt::Display for ProductState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductState {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                CatalogError::invalid_input("state", format!("unknown state '{}'", trimmed))
            })
    }
}

/// Catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Laptop,
    Phone,
    #[serde(rename = "TV")]
    Tv,
    Accessories,
    Others,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Laptop,
        Category::Phone,
        Category::Tv,
        Category::Accessories,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Laptop => "Laptop",
            Category::Phone => "Phone",
            Category::Tv => "TV",
            Category::Accessories => "Accessories",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                CatalogError::invalid_input(
                    "category",
                    format!("unknown category '{}'", trimmed),
                )
            })
    }
}

/// A product listed by a seller
///
/// `offer` stays `None` until a client negotiates; afterwards it only ever
/// holds the most recent amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
    pub category: Category,
    pub state: ProductState,
    pub price: Decimal,
    #[serde(default)]
    pub promo: Decimal,
    #[serde(default)]
    pub offer: Option<Decimal>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub negotiable: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stock: u32,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create an available, non-negotiable product without promo or stock
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        category: Category,
        state: ProductState,
        price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            brand: brand.into(),
            category,
            state,
            price,
            promo: Decimal::ZERO,
            offer: None,
            available: true,
            negotiable: false,
            created_at: Utc::now(),
            stock: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_promo(mut self, promo: Decimal) -> Self {
        self.promo = promo;
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn negotiable(mut self) -> Self {
        self.negotiable = true;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Calendar date the product was listed on (UTC)
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Display and struck-through price derived from `price` and `promo`
    pub fn pricing(&self) -> CatalogResult<PriceDisplay> {
        pricing::derive(self.price, self.promo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_state_from_str_is_case_insensitive() {
        assert_eq!("NEW".parse::<ProductState>().unwrap(), ProductState::New);
        assert_eq!(" used ".parse::<ProductState>().unwrap(), ProductState::Used);
        assert!("refurbished".parse::<ProductState>().is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("tv".parse::<Category>().unwrap(), Category::Tv);
        assert_eq!("Laptop".parse::<Category>().unwrap(), Category::Laptop);

        let err = "Fridge".parse::<Category>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
name: ThinkPad X1
category: Laptop
state: used
price: 1200
"#;
        let product: Product = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(product.price, dec!(1200));
        assert_eq!(product.promo, Decimal::ZERO);
        assert!(product.available);
        assert!(!product.negotiable);
        assert!(product.offer.is_none());
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_tv_serializes_as_upper_case() {
        let json = serde_json::to_string(&Category::Tv).unwrap();
        assert_eq!(json, "\"TV\"");
    }
}
