//! Catalog events published by the Query Composer
//!
//! Debounced refreshes run in the background, so their outcome cannot be
//! returned to whoever typed the keystroke. Instead every refresh publishes a
//! [`CatalogEvent`] on a `tokio::sync::broadcast` channel:
//!
//! ```text
//! set_criterion ──▶ debounce timer ──▶ refresh ──▶ EventBus::publish() ──▶ UI subscribers
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut rx = session.subscribe();
//! session.set_criterion(Criterion::NameContains("mac".into())).await;
//! while let Ok(event) = rx.recv().await {
//!     if let CatalogEvent::ResultsUpdated { count, .. } = event {
//!         println!("{count} products");
//!     }
//! }
//! ```

use serde::Serialize;
use tokio::sync::broadcast;

use crate::core::error::ErrorNotice;

/// Outcome of one catalog query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// The query's response replaced the current results
    ResultsUpdated { seq: u64, count: usize },

    /// The response arrived after a later query had already been applied
    StaleDiscarded { seq: u64, current: u64 },

    /// The store failed; the previous results are still shown
    Degraded { seq: u64, notice: ErrorNotice },
}

/// Broadcast bus for [`CatalogEvent`]s
///
/// Cheap to clone. Publishing never fails: without subscribers the event is
/// dropped, and lagging subscribers get `Lagged` on their next `recv()`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: CatalogEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }
}
