//! In-memory document store.
//!
//! Documents are kept per collection in insertion order behind a single
//! `RwLock`. Nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, Document, Filter, GroupCount, StoredDocument};

/// Process-local document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<StoredDocument>>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) async fn insert_one(&self, collection: Collection, doc: Document) -> Uuid {
        let id = Uuid::new_v4();
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(StoredDocument { id, body: doc });
        id
    }

    pub(super) async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Option<StoredDocument> {
        let collections = self.collections.read().await;
        collections
            .get(&collection)?
            .iter()
            .find(|stored| filter.matches(stored.id, &stored.body))
            .cloned()
    }

    pub(super) async fn find(&self, collection: Collection, filter: &Filter) -> Vec<StoredDocument> {
        let collections = self.collections.read().await;
        collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|stored| filter.matches(stored.id, &stored.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> u64 {
        let mut collections = self.collections.write().await;
        let target = collections.get_mut(&collection).and_then(|docs| {
            docs.iter_mut()
                .find(|stored| filter.matches(stored.id, &stored.body))
        });

        match target {
            Some(stored) => {
                stored.body.extend(set);
                1
            }
            None => 0,
        }
    }

    pub(super) async fn delete_one(&self, collection: Collection, filter: &Filter) -> u64 {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return 0;
        };

        match docs
            .iter()
            .position(|stored| filter.matches(stored.id, &stored.body))
        {
            Some(index) => {
                docs.remove(index);
                1
            }
            None => 0,
        }
    }

    pub(super) async fn group_count(
        &self,
        collection: Collection,
        field: &'static str,
    ) -> Vec<GroupCount> {
        let collections = self.collections.read().await;
        let mut groups: Vec<GroupCount> = Vec::new();

        for stored in collections.get(&collection).into_iter().flatten() {
            let key = stored.body.get(field).and_then(group_key);
            match groups.iter_mut().find(|group| group.key == key) {
                Some(group) => group.count += 1,
                None => groups.push(GroupCount { key, count: 1 }),
            }
        }

        groups
    }
}

/// Text form of a grouped value, matching `doc->>field` in `PostgreSQL`.
fn group_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
