//! Integration tests for Pantry.
//!
//! # Running Tests
//!
//! ```bash
//! # HTTP tests against an in-process server on the in-memory store
//! cargo test -p pantry-integration-tests
//!
//! # Include the PostgreSQL store tests
//! PANTRY_TEST_DATABASE_URL=postgres://localhost/pantry_test \
//!     cargo test -p pantry-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `items_api` - Item endpoints
//! - `clock_in_api` - Clock-in endpoints
//! - `postgres_store` - Document store against a real database

use pantry_api::config::ApiConfig;
use pantry_api::state::AppState;
use pantry_api::store::{DocumentStore, MemoryDocumentStore};
use reqwest::Client;
use serde_json::Value;

/// A running API server plus a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub store: DocumentStore,
}

impl TestContext {
    /// Serve the API on an ephemeral local port over a fresh in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(MemoryDocumentStore::new().into()).await
    }

    /// Serve the API on an ephemeral local port over the given store.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn_with_store(store: DocumentStore) -> Self {
        let config = ApiConfig::in_memory();
        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = pantry_api::app(AppState::new(store.clone()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            store,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Extract the `detail` message of an error body.
#[must_use]
pub fn detail(body: &Value) -> &str {
    body.get("detail").and_then(Value::as_str).unwrap_or_default()
}
