//! Shared test harness for catalog integration tests
//!
//! Provides a fixed sample catalog and store wrappers that count calls,
//! simulate outages, or hold responses until the test releases them.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod catalog_harness;
//! use catalog_harness::*;
//! ```

#![allow(dead_code)]

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Notify, mpsc};
use uuid::Uuid;

use catalog::prelude::*;

// ---------------------------------------------------------------------------
// Sample catalog
// ---------------------------------------------------------------------------

/// Eight products spread over every category, state and availability
pub fn sample_products() -> Vec<Product> {
    let day = |d: u32| Utc.with_ymd_and_hms(2024, 6, d, 12, 0, 0).unwrap();
    vec![
        Product::new("MacBook Pro 14", "Apple", Category::Laptop, ProductState::New, dec!(2400))
            .with_stock(3)
            .created_at(day(1)),
        Product::new("ThinkPad T14", "Lenovo", Category::Laptop, ProductState::Used, dec!(650))
            .with_stock(1)
            .with_promo(dec!(20))
            .negotiable()
            .created_at(day(3)),
        Product::new("iPhone 13", "Apple", Category::Phone, ProductState::Used, dec!(420))
            .with_stock(2)
            .negotiable()
            .created_at(day(5)),
        Product::new("Galaxy S24", "Samsung", Category::Phone, ProductState::New, dec!(980))
            .with_stock(5)
            .created_at(day(7)),
        Product::new("Bravia 55", "Sony", Category::Tv, ProductState::New, dec!(1800))
            .with_stock(0)
            .with_available(false)
            .created_at(day(9)),
        Product::new("Samsung Frame", "Samsung", Category::Tv, ProductState::Used, dec!(700))
            .with_stock(1)
            .negotiable()
            .created_at(day(11)),
        Product::new("MagSafe charger", "Apple", Category::Accessories, ProductState::New, dec!(45))
            .with_stock(20)
            .with_promo(dec!(10))
            .created_at(day(13)),
        Product::new("Drone mini", "DJI", Category::Others, ProductState::Used, dec!(300))
            .with_stock(1)
            .with_available(false)
            .created_at(day(15)),
    ]
}

pub fn sample_store() -> InMemoryCatalogStore {
    InMemoryCatalogStore::with_products(sample_products())
}

pub async fn product_named(store: &dyn CatalogStore, name: &str) -> Product {
    store
        .fetch_all()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.name == name)
        .unwrap()
}

pub fn names(products: &[Product]) -> Vec<String> {
    let mut names: Vec<String> = products.iter().map(|p| p.name.clone()).collect();
    names.sort();
    names
}

pub fn client() -> Caller {
    Caller::client(Uuid::new_v4())
}

// ---------------------------------------------------------------------------
// CountingStore: counts every read that reaches the store
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: InMemoryCatalogStore,
    pub fetch_all_calls: Arc<AtomicUsize>,
    pub query_calls: Arc<AtomicUsize>,
    pub last_query: Arc<Mutex<Option<ProductQuery>>>,
}

impl CountingStore {
    pub fn new(inner: InMemoryCatalogStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst) + self.query_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<ProductQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogStore for CountingStore {
    async fn fetch_all(&self) -> Result<Vec<Product>> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_all().await
    }

    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.inner.query(query).await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Product>> {
        self.inner.get(id).await
    }

    async fn patch_offer(&self, id: &Uuid, amount: Decimal) -> Result<()> {
        self.inner.patch_offer(id, amount).await
    }
}

// ---------------------------------------------------------------------------
// FlakyStore: fails every call while `down` is set
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: InMemoryCatalogStore,
    pub down: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new(inner: InMemoryCatalogStore) -> Self {
        Self {
            inner,
            down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for FlakyStore {
    async fn fetch_all(&self) -> Result<Vec<Product>> {
        self.check()?;
        self.inner.fetch_all().await
    }

    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        self.check()?;
        self.inner.query(query).await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Product>> {
        self.check()?;
        self.inner.get(id).await
    }

    async fn patch_offer(&self, id: &Uuid, amount: Decimal) -> Result<()> {
        self.check()?;
        self.inner.patch_offer(id, amount).await
    }
}

// ---------------------------------------------------------------------------
// GatedStore: holds each category query until the test opens its gate
// ---------------------------------------------------------------------------

/// Queries filtered on a category announce themselves on `received` and then
/// wait for that category's gate. Unfiltered reads pass straight through.
pub struct GatedStore {
    pub inner: InMemoryCatalogStore,
    gates: HashMap<Category, Arc<Notify>>,
    received: mpsc::UnboundedSender<Category>,
}

impl GatedStore {
    pub fn new(inner: InMemoryCatalogStore) -> (Self, mpsc::UnboundedReceiver<Category>) {
        let (received, rx) = mpsc::unbounded_channel();
        let gates = Category::ALL
            .into_iter()
            .map(|category| (category, Arc::new(Notify::new())))
            .collect();
        (
            Self {
                inner,
                gates,
                received,
            },
            rx,
        )
    }

    pub fn open(&self, category: Category) {
        self.gates[&category].notify_one();
    }
}

#[async_trait]
impl CatalogStore for GatedStore {
    async fn fetch_all(&self) -> Result<Vec<Product>> {
        self.inner.fetch_all().await
    }

    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        if let Some(category) = query.category {
            let _ = self.received.send(category);
            self.gates[&category].notified().await;
        }
        self.inner.query(query).await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Product>> {
        self.inner.get(id).await
    }

    async fn patch_offer(&self, id: &Uuid, amount: Decimal) -> Result<()> {
        self.inner.patch_offer(id, amount).await
    }
}
