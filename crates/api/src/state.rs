//! Application state shared across handlers.

use std::sync::Arc;

use crate::services::{ClockInService, ItemService};
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the document store and the services built on it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: DocumentStore,
}

impl AppState {
    /// Create a new application state around the store opened at startup.
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    /// Item operations over the shared store.
    #[must_use]
    pub fn items(&self) -> ItemService<'_> {
        ItemService::new(self.store())
    }

    /// Clock-in operations over the shared store.
    #[must_use]
    pub fn clock_in(&self) -> ClockInService<'_> {
        ClockInService::new(self.store())
    }
}
