//! Query Composer: turns the enabled criteria into one result set
//!
//! Every change to the [`FilterSet`] re-queries the Catalog Store with the
//! conjunction of all active criteria (no active criteria means fetch-all).
//!
//! # Ordering
//!
//! Each query gets a sequence number when it is issued. A response is only
//! applied if no later-issued query has been answered yet, so a slow early
//! response can never overwrite a fresher one. Failed queries count as
//! answered: the previous good results stay visible and older in-flight
//! responses are discarded.
//!
//! # Debounce
//!
//! Text criteria are applied after the configured quiet period. A new
//! keystroke aborts the pending timer and starts a fresh one. All other
//! changes query immediately and also cancel a pending timer, since they
//! already pick up the latest text.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::core::error::{CatalogError, CatalogResult};
use crate::core::events::{CatalogEvent, EventBus};
use crate::core::filter::{Criterion, CriterionKind, FilterSet};
use crate::core::product::Product;
use crate::core::query::ProductQuery;
use crate::core::store::CatalogStore;

/// What a filter change or refresh did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// The response became the current result set
    Applied { seq: u64, count: usize },
    /// A later query had already been answered; the response was dropped
    Stale { seq: u64, current: u64 },
    /// The store failed; the previous result set is kept
    Degraded { seq: u64, error: CatalogError },
    /// A text change was queued behind the debounce timer
    Scheduled,
    /// The active criteria did not change, so nothing was queried
    Unchanged,
}

impl Refresh {
    pub fn is_applied(&self) -> bool {
        matches!(self, Refresh::Applied { .. })
    }

    /// Event published for an answered query
    fn to_event(&self) -> Option<CatalogEvent> {
        match self {
            Refresh::Applied { seq, count } => Some(CatalogEvent::ResultsUpdated {
                seq: *seq,
                count: *count,
            }),
            Refresh::Stale { seq, current } => Some(CatalogEvent::StaleDiscarded {
                seq: *seq,
                current: *current,
            }),
            Refresh::Degraded { seq, error } => Some(CatalogEvent::Degraded {
                seq: *seq,
                notice: error.to_notice(),
            }),
            Refresh::Scheduled | Refresh::Unchanged => None,
        }
    }
}

#[derive(Debug, Default)]
struct ComposerState {
    filters: FilterSet,
    /// Sequence number of the latest issued query
    issued: u64,
    /// Sequence number of the latest answered query
    answered: u64,
    results: Vec<Product>,
    last_error: Option<CatalogError>,
}

struct ComposerInner {
    store: Arc<dyn CatalogStore>,
    events: EventBus,
    debounce: Duration,
    state: Mutex<ComposerState>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

/// Session-scoped query composer
///
/// Cheap to clone; clones share filters, results and the pending timer.
#[derive(Clone)]
pub struct QueryComposer {
    inner: Arc<ComposerInner>,
}

impl QueryComposer {
    pub fn new(store: Arc<dyn CatalogStore>, config: &CatalogConfig) -> CatalogResult<Self> {
        let filters =
            FilterSet::with_defaults(&config.enabled_by_default, config.default_price_range()?);
        Ok(Self::with_filters(
            store,
            filters,
            config.debounce(),
            EventBus::new(config.event_capacity),
        ))
    }

    pub fn with_filters(
        store: Arc<dyn CatalogStore>,
        filters: FilterSet,
        debounce: Duration,
        events: EventBus,
    ) -> Self {
        Self {
            inner: Arc::new(ComposerInner {
                store,
                events,
                debounce,
                state: Mutex::new(ComposerState {
                    filters,
                    ..Default::default()
                }),
                pending: Mutex::new(None),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ComposerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a criterion value and re-query if the active set changed
    ///
    /// Text criteria are debounced; everything else queries immediately.
    pub async fn set_criterion(&self, criterion: Criterion) -> Refresh {
        let kind = criterion.kind();
        let changed = self.mutate(|filters| {
            filters.set_criterion(criterion);
        });
        if !changed {
            return Refresh::Unchanged;
        }
        if kind.is_text() {
            self.schedule();
            Refresh::Scheduled
        } else {
            self.refresh().await
        }
    }

    /// Toggle a criterion and re-query immediately if the active set changed
    pub async fn set_enabled(&self, kind: CriterionKind, enabled: bool) -> Refresh {
        let changed = self.mutate(|filters| {
            filters.set_enabled(kind, enabled);
        });
        if changed {
            self.refresh().await
        } else {
            Refresh::Unchanged
        }
    }

    /// Apply `f` to the filters, reporting whether the resulting query differs
    fn mutate(&self, f: impl FnOnce(&mut FilterSet)) -> bool {
        let mut state = self.state();
        let before = ProductQuery::from_criteria(&state.filters.active_criteria());
        f(&mut state.filters);
        let after = ProductQuery::from_criteria(&state.filters.active_criteria());
        before != after
    }

    /// Cancel any pending debounced query and query now
    pub async fn refresh(&self) -> Refresh {
        self.cancel_pending();
        self.issue().await
    }

    /// Abort the pending debounce timer. Returns `true` if one was pending.
    pub fn cancel_pending(&self) -> bool {
        match self.pending().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn schedule(&self) {
        let composer = self.clone();
        let delay = self.inner.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            composer.issue().await;
        });
        if let Some(previous) = self.pending().replace(handle) {
            previous.abort();
        }
    }

    async fn issue(&self) -> Refresh {
        let (seq, query) = {
            let mut state = self.state();
            state.issued += 1;
            let query = ProductQuery::from_criteria(&state.filters.active_criteria());
            (state.issued, query)
        };

        tracing::debug!(seq, unfiltered = query.is_empty(), "issuing catalog query");
        let response = if query.is_empty() {
            self.inner.store.fetch_all().await
        } else {
            self.inner.store.query(&query).await
        };

        let outcome = {
            let mut state = self.state();
            if seq < state.answered {
                tracing::debug!(seq, current = state.answered, "discarding stale response");
                Refresh::Stale {
                    seq,
                    current: state.answered,
                }
            } else {
                state.answered = seq;
                match response {
                    Ok(products) => {
                        let count = products.len();
                        state.results = products;
                        state.last_error = None;
                        tracing::debug!(seq, count, "catalog results updated");
                        Refresh::Applied { seq, count }
                    }
                    Err(err) => {
                        let error = CatalogError::upstream(&err);
                        tracing::warn!(seq, error = %error, "catalog query failed, keeping previous results");
                        state.last_error = Some(error.clone());
                        Refresh::Degraded { seq, error }
                    }
                }
            }
        };

        if let Some(event) = outcome.to_event() {
            self.inner.events.publish(event);
        }
        outcome
    }

    /// Replace the cached copy of `product` in the current results
    pub(crate) fn update_cached(&self, product: &Product) {
        let mut state = self.state();
        if let Some(cached) = state.results.iter_mut().find(|p| p.id == product.id) {
            *cached = product.clone();
        }
    }

    pub fn current_results(&self) -> Vec<Product> {
        self.state().results.clone()
    }

    pub fn cached_product(&self, id: &Uuid) -> Option<Product> {
        self.state().results.iter().find(|p| &p.id == id).cloned()
    }

    pub fn active_criteria(&self) -> Vec<Criterion> {
        self.state().filters.active_criteria()
    }

    pub fn filters(&self) -> FilterSet {
        self.state().filters.clone()
    }

    /// Most recent non-fatal failure, cleared by the next successful query
    pub fn last_notice(&self) -> Option<CatalogError> {
        self.state().last_error.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.inner.events.subscribe()
    }
}

impl std::fmt::Debug for QueryComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("QueryComposer")
            .field("active_criteria", &state.filters.active_criteria())
            .field("issued", &state.issued)
            .field("answered", &state.answered)
            .field("results", &state.results.len())
            .finish()
    }
}
