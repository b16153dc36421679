//! Filter Predicate Set: independently toggleable filter criteria
//!
//! Each criterion kind owns one slot holding an `enabled` flag and the last
//! value the user entered. Toggling a criterion off keeps its value around
//! (so toggling it back on restores it) but a disabled slot never reaches the
//! query, whatever it stores.
//!
//! Raw UI input goes through [`Criterion::parse`] first: anything malformed
//! is rejected there and never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::product::{Category, ProductState};

/// Identifies one filter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Name,
    Brand,
    State,
    Category,
    Price,
    Availability,
    CreatedSince,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 7] = [
        CriterionKind::Name,
        CriterionKind::Brand,
        CriterionKind::State,
        CriterionKind::Category,
        CriterionKind::Price,
        CriterionKind::Availability,
        CriterionKind::CreatedSince,
    ];

    /// Text kinds are typed key by key and therefore debounced
    pub fn is_text(&self) -> bool {
        matches!(self, CriterionKind::Name | CriterionKind::Brand)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionKind::Name => "name",
            CriterionKind::Brand => "brand",
            CriterionKind::State => "state",
            CriterionKind::Category => "category",
            CriterionKind::Price => "price",
            CriterionKind::Availability => "availability",
            CriterionKind::CreatedSince => "created_since",
        }
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive price bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    /// Build a range, rejecting negative bounds and `min > max`
    pub fn new(min: Decimal, max: Decimal) -> CatalogResult<Self> {
        if min < Decimal::ZERO || max < Decimal::ZERO {
            return Err(CatalogError::invalid_input(
                "price",
                "price bounds must be >= 0",
            ));
        }
        if min > max {
            return Err(CatalogError::invalid_input(
                "price",
                format!("min price {} is above max price {}", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

impl FromStr for PriceRange {
    type Err = CatalogError;

    /// Accepts `min..max` or `min,max`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once("..")
            .or_else(|| s.split_once(','))
            .ok_or_else(|| {
                CatalogError::invalid_input("price", format!("expected 'min..max', got '{}'", s))
            })?;
        Self::new(parse_bound("minPrice", min)?, parse_bound("maxPrice", max)?)
    }
}

pub(crate) fn parse_bound(field: &str, raw: &str) -> CatalogResult<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed).map_err(|_| {
        CatalogError::invalid_input(field, format!("'{}' is not a number", trimmed))
    })
}

/// A single filter rule, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Criterion {
    NameContains(String),
    BrandContains(String),
    StateEquals(ProductState),
    CategoryEquals(Category),
    PriceBetween(PriceRange),
    AvailableEquals(bool),
    CreatedOnOrAfter(NaiveDate),
}

impl Criterion {
    pub fn kind(&self) -> CriterionKind {
        match self {
            Criterion::NameContains(_) => CriterionKind::Name,
            Criterion::BrandContains(_) => CriterionKind::Brand,
            Criterion::StateEquals(_) => CriterionKind::State,
            Criterion::CategoryEquals(_) => CriterionKind::Category,
            Criterion::PriceBetween(_) => CriterionKind::Price,
            Criterion::AvailableEquals(_) => CriterionKind::Availability,
            Criterion::CreatedOnOrAfter(_) => CriterionKind::CreatedSince,
        }
    }

    /// Parse raw UI input for `kind`
    ///
    /// Text is kept as typed (trimming happens when the value is stored);
    /// every other kind must parse completely or the input is rejected.
    pub fn parse(kind: CriterionKind, raw: &str) -> CatalogResult<Self> {
        let trimmed = raw.trim();
        let criterion = match kind {
            CriterionKind::Name => Criterion::NameContains(raw.to_string()),
            CriterionKind::Brand => Criterion::BrandContains(raw.to_string()),
            CriterionKind::State => Criterion::StateEquals(trimmed.parse()?),
            CriterionKind::Category => Criterion::CategoryEquals(trimmed.parse()?),
            CriterionKind::Price => Criterion::PriceBetween(trimmed.parse()?),
            CriterionKind::Availability => Criterion::AvailableEquals(parse_bool(trimmed)?),
            CriterionKind::CreatedSince => Criterion::CreatedOnOrAfter(parse_date(trimmed)?),
        };
        Ok(criterion)
    }

    /// Trim text values
    fn normalized(self) -> Self {
        match self {
            Criterion::NameContains(text) => Criterion::NameContains(text.trim().to_string()),
            Criterion::BrandContains(text) => Criterion::BrandContains(text.trim().to_string()),
            other => other,
        }
    }

    /// Whether the stored value can constrain a query at all
    fn is_meaningful(&self) -> bool {
        match self {
            Criterion::NameContains(text) | Criterion::BrandContains(text) => !text.is_empty(),
            _ => true,
        }
    }
}

pub(crate) fn parse_bool(raw: &str) -> CatalogResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(CatalogError::invalid_input(
            "available",
            format!("expected true or false, got '{}'", raw),
        )),
    }
}

pub(crate) fn parse_date(raw: &str) -> CatalogResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CatalogError::invalid_input("date", format!("expected YYYY-MM-DD, got '{}'", raw))
    })
}

/// One slot of the [`FilterSet`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSlot {
    pub enabled: bool,
    pub value: Option<Criterion>,
}

impl FilterSlot {
    fn active(&self) -> Option<&Criterion> {
        self.value
            .as_ref()
            .filter(|criterion| self.enabled && criterion.is_meaningful())
    }
}

/// Stateful collection of filter criteria for one browsing session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    slots: BTreeMap<CriterionKind, FilterSlot>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given kinds enabled and the price slot preset to
    /// `price` (the slider's resting position)
    pub fn with_defaults(enabled: &[CriterionKind], price: PriceRange) -> Self {
        let mut set = Self::new();
        set.set_criterion(Criterion::PriceBetween(price));
        for kind in enabled {
            set.set_enabled(*kind, true);
        }
        set
    }

    /// Store a value in the slot of its kind, keeping the slot's enabled flag
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_criterion(&mut self, criterion: Criterion) -> bool {
        let criterion = criterion.normalized();
        let slot = self.slots.entry(criterion.kind()).or_default();
        if slot.value.as_ref() == Some(&criterion) {
            return false;
        }
        slot.value = Some(criterion);
        true
    }

    /// Enable or disable a slot without touching its value
    ///
    /// Returns `true` if the flag changed.
    pub fn set_enabled(&mut self, kind: CriterionKind, enabled: bool) -> bool {
        let slot = self.slots.entry(kind).or_default();
        let changed = slot.enabled != enabled;
        slot.enabled = enabled;
        changed
    }

    pub fn is_enabled(&self, kind: CriterionKind) -> bool {
        self.slots.get(&kind).is_some_and(|slot| slot.enabled)
    }

    pub fn value(&self, kind: CriterionKind) -> Option<&Criterion> {
        self.slots.get(&kind).and_then(|slot| slot.value.as_ref())
    }

    pub fn slot(&self, kind: CriterionKind) -> Option<&FilterSlot> {
        self.slots.get(&kind)
    }

    /// Criteria that constrain the query: enabled and holding a usable value
    pub fn active_criteria(&self) -> Vec<Criterion> {
        self.slots
            .values()
            .filter_map(FilterSlot::active)
            .cloned()
            .collect()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.slots.values().all(|slot| slot.active().is_none())
    }
}
