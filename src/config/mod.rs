//! Configuration loading and management

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::filter::{CriterionKind, PriceRange};

/// Resting position and granularity of the price slider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSliderConfig {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl Default for PriceSliderConfig {
    fn default() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::from(5000),
            step: Decimal::from(10),
        }
    }
}

impl PriceSliderConfig {
    /// Reject a range whose bounds fall between slider notches
    ///
    /// Notches sit at `min + k * step`.
    pub fn check_notches(&self, range: &PriceRange) -> CatalogResult<()> {
        for bound in [range.min(), range.max()] {
            let on_notch = bound
                .checked_sub(self.min)
                .and_then(|offset| offset.checked_rem(self.step))
                .is_some_and(|rest| rest.is_zero());
            if !on_notch {
                return Err(CatalogError::invalid_input(
                    "price",
                    format!("{} is not on a slider step of {}", bound, self.step),
                ));
            }
        }
        Ok(())
    }
}

/// Configuration of a browsing session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Quiescent window applied to text criteria, in milliseconds
    pub debounce_ms: u64,

    /// Default price bounds
    pub price_range: PriceSliderConfig,

    /// Currency label used when formatting prices
    pub currency: String,

    /// Criteria enabled when a session starts
    pub enabled_by_default: Vec<CriterionKind>,

    /// Buffer size of the catalog event channel
    pub event_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            price_range: PriceSliderConfig::default(),
            currency: "TND".to_string(),
            // The search box has no toggle
            enabled_by_default: vec![CriterionKind::Name],
            event_capacity: 64,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the slider: positive step, valid bounds, bounds on a notch
    pub fn validate(&self) -> CatalogResult<()> {
        if self.price_range.step <= Decimal::ZERO {
            return Err(CatalogError::invalid_input(
                "price_range.step",
                format!("step must be > 0, got {}", self.price_range.step),
            ));
        }
        let range = self.default_price_range()?;
        self.price_range.check_notches(&range)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Price range a freshly enabled price criterion filters on
    pub fn default_price_range(&self) -> CatalogResult<PriceRange> {
        PriceRange::new(self.price_range.min, self.price_range.max)
    }
}
