//! Predicate descriptor sent to the Catalog Store
//!
//! A [`ProductQuery`] is the conjunction of every active criterion: a product
//! matches only if it satisfies all of the fields that are set. Unset fields
//! do not constrain anything, so the default query matches the whole catalog.
//!
//! # Matching rules
//!
//! - `name` / `brand`: case-insensitive substring
//! - `state` / `category` / `available`: exact match
//! - `minPrice` / `maxPrice`: inclusive bounds, each usable alone
//! - `date`: products created on that calendar day or later
//!
//! # Example
//! ```rust,ignore
//! // HTTP front-end:
//! GET /products/search?name=mac&category=Laptop&minPrice=500&maxPrice=2000
//! let query = ProductQuery::from_pairs(request.query_pairs())?;
//! let products = store.query(&query).await?;
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::filter::{Criterion, PriceRange, parse_bool, parse_bound, parse_date};
use crate::core::product::{Category, Product, ProductState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub name_substring: Option<String>,

    #[serde(rename = "brand", skip_serializing_if = "Option::is_none")]
    pub brand_substring: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ProductState>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,

    #[serde(rename = "available", skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,

    #[serde(rename = "date", skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
}

impl ProductQuery {
    /// Fold active criteria into one conjunctive descriptor
    pub fn from_criteria<'a>(criteria: impl IntoIterator<Item = &'a Criterion>) -> Self {
        let mut query = Self::default();
        for criterion in criteria {
            match criterion {
                Criterion::NameContains(text) => query.name_substring = Some(text.clone()),
                Criterion::BrandContains(text) => query.brand_substring = Some(text.clone()),
                Criterion::StateEquals(state) => query.state = Some(*state),
                Criterion::CategoryEquals(category) => query.category = Some(*category),
                Criterion::PriceBetween(range) => {
                    query.min_price = Some(range.min());
                    query.max_price = Some(range.max());
                }
                Criterion::AvailableEquals(available) => query.availability = Some(*available),
                Criterion::CreatedOnOrAfter(date) => query.min_date = Some(*date),
            }
        }
        query
    }

    /// Parse raw `key=value` pairs as sent by a search form
    ///
    /// Blank values are ignored, unknown keys are skipped, and malformed
    /// values are rejected.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> CatalogResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "name" => query.name_substring = Some(value.to_string()),
                "brand" => query.brand_substring = Some(value.to_string()),
                "state" => query.state = Some(value.parse()?),
                "category" => query.category = Some(value.parse()?),
                "minPrice" => query.min_price = Some(parse_bound("minPrice", value)?),
                "maxPrice" => query.max_price = Some(parse_bound("maxPrice", value)?),
                "available" => query.availability = Some(parse_bool(value)?),
                "date" => query.min_date = Some(parse_date(value)?),
                other => tracing::debug!(key = other, "ignoring unknown query parameter"),
            }
        }
        query.validated()
    }

    fn validated(mut self) -> CatalogResult<Self> {
        for text in [&mut self.name_substring, &mut self.brand_substring] {
            if let Some(trimmed) = text.as_deref().map(str::trim) {
                *text = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
        }
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => {
                PriceRange::new(min, max)?;
            }
            (Some(bound), None) | (None, Some(bound)) if bound < Decimal::ZERO => {
                return Err(CatalogError::invalid_input(
                    "price",
                    "price bounds must be >= 0",
                ));
            }
            _ => {}
        }
        Ok(self)
    }

    /// True when no field is set, i.e. the query is a plain fetch-all
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether `product` satisfies every field that is set
    pub fn matches(&self, product: &Product) -> bool {
        contains_ignore_case(&product.name, self.name_substring.as_deref())
            && contains_ignore_case(&product.brand, self.brand_substring.as_deref())
            && self.state.is_none_or(|state| product.state == state)
            && self.category.is_none_or(|category| product.category == category)
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
            && self
                .availability
                .is_none_or(|available| product.available == available)
            && self.min_date.is_none_or(|date| product.created_on() >= date)
    }

    /// Keep only the matching products, preserving order
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| haystack.to_lowercase().contains(&needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn laptop() -> Product {
        Product::new(
            "MacBook Air",
            "Apple",
            Category::Laptop,
            ProductState::Used,
            dec!(1500),
        )
        .created_at(Utc.with_ymd_and_hms(2024, 5, 10, 18, 30, 0).unwrap())
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = ProductQuery::default();
        assert!(query.is_empty());
        assert!(query.matches(&laptop()));
    }

    #[test]
    fn test_text_match_is_case_insensitive_substring() {
        let query = ProductQuery {
            name_substring: Some("BOOK".to_string()),
            brand_substring: Some("app".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&laptop()));

        let query = ProductQuery {
            brand_substring: Some("dell".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&laptop()));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let query = ProductQuery {
            min_price: Some(dec!(1500)),
            max_price: Some(dec!(1500)),
            ..Default::default()
        };
        assert!(query.matches(&laptop()));

        let query = ProductQuery {
            max_price: Some(dec!(1499.99)),
            ..Default::default()
        };
        assert!(!query.matches(&laptop()));
    }

    #[test]
    fn test_date_compares_calendar_day() {
        let same_day = ProductQuery {
            min_date: NaiveDate::from_ymd_opt(2024, 5, 10),
            ..Default::default()
        };
        assert!(same_day.matches(&laptop()));

        let next_day = ProductQuery {
            min_date: NaiveDate::from_ymd_opt(2024, 5, 11),
            ..Default::default()
        };
        assert!(!next_day.matches(&laptop()));
    }

    #[test]
    fn test_conjunction_requires_every_field() {
        let query = ProductQuery {
            category: Some(Category::Laptop),
            state: Some(ProductState::New),
            ..Default::default()
        };
        assert!(!query.matches(&laptop()));
    }

    #[test]
    fn test_from_criteria() {
        let range = PriceRange::new(dec!(10), dec!(20)).unwrap();
        let query = ProductQuery::from_criteria(&[
            Criterion::BrandContains("sony".to_string()),
            Criterion::PriceBetween(range),
            Criterion::AvailableEquals(true),
        ]);

        assert_eq!(query.brand_substring.as_deref(), Some("sony"));
        assert_eq!(query.min_price, Some(dec!(10)));
        assert_eq!(query.max_price, Some(dec!(20)));
        assert_eq!(query.availability, Some(true));
        assert!(query.name_substring.is_none());
    }

    #[test]
    fn test_from_pairs_one_sided_price() {
        let query = ProductQuery::from_pairs([("minPrice", "100"), ("name", "  ")]).unwrap();
        assert_eq!(query.min_price, Some(dec!(100)));
        assert!(query.max_price.is_none());
        assert!(query.name_substring.is_none());
    }

    #[test]
    fn test_from_pairs_rejects_malformed_values() {
        assert!(ProductQuery::from_pairs([("minPrice", "cheap")]).is_err());
        assert!(ProductQuery::from_pairs([("minPrice", "50"), ("maxPrice", "10")]).is_err());
        assert!(ProductQuery::from_pairs([("available", "perhaps")]).is_err());
        assert!(ProductQuery::from_pairs([("minPrice", "-3")]).is_err());
    }
}
