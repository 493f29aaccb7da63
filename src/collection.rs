use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap as _, Serializer};
use tokio::sync::Mutex;

use crate::schema::{BookRecord, FieldErrors, validate_collection};
use crate::store::KeyValueStore;

pub const BOOKS_KEY: &str = "books";
pub const SUMMARY_KEY_PREFIX: &str = "summary-";

pub fn summary_key(id: &str) -> String {
    format!("{SUMMARY_KEY_PREFIX}{id}")
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("stored books are not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("Books validation error: {0}")]
    Validation(FieldErrors),

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl CollectionError {
    fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            message: format!("{err:#}"),
        }
    }
}

/// Saved books keyed by id, in first-insertion order.
///
/// Serializes as a JSON object so the stored blob stays a plain
/// `{ "<id>": { ...record } }` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    entries: Vec<(String, BookRecord)>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under `book.id`, replacing an existing entry in place.
    pub fn insert(&mut self, book: BookRecord) {
        let key = book.id.clone();
        self.insert_keyed(key, book);
    }

    pub(crate) fn insert_keyed(&mut self, key: String, book: BookRecord) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = book,
            None => self.entries.push((key, book)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&BookRecord> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, book)| book)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn books(&self) -> impl Iterator<Item = &BookRecord> {
        self.entries.iter().map(|(_, book)| book)
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, book) in &self.entries {
            map.serialize_entry(key, book)?;
        }
        map.end()
    }
}

/// Records in collection order, skipping any whose id equals `exclude_id`.
pub fn list_excluding(collection: &Collection, exclude_id: Option<&str>) -> Vec<BookRecord> {
    collection
        .books()
        .filter(|book| Some(book.id.as_str()) != exclude_id)
        .cloned()
        .collect()
}

/// The recently viewed list plus per-book summary cache, over an
/// injectable store.
pub struct CollectionManager {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl CollectionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn load_all(&self) -> Result<Collection, CollectionError> {
        let Some(raw) = self
            .store
            .get(BOOKS_KEY)
            .await
            .map_err(CollectionError::storage)?
        else {
            return Ok(Collection::new());
        };

        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(CollectionError::Corrupt)?;
        validate_collection(&value).map_err(CollectionError::Validation)
    }

    /// Read-modify-write of the whole blob. Serialized within this manager;
    /// concurrent writers in other processes still race and the later write
    /// wins.
    pub async fn upsert(&self, book: BookRecord) -> Result<Collection, CollectionError> {
        let _guard = self.write_lock.lock().await;

        let mut collection = self.load_all().await?;
        let id = book.id.clone();
        let replaced = collection.get(&id).is_some();
        collection.insert(book);

        let raw = serde_json::to_string(&collection).map_err(|err| CollectionError::Storage {
            message: format!("serialize books: {err}"),
        })?;
        self.store
            .set(BOOKS_KEY, &raw)
            .await
            .map_err(CollectionError::storage)?;

        tracing::debug!(id = %id, replaced, total = collection.len(), "saved book");
        Ok(collection)
    }

    pub async fn load_summary(&self, id: &str) -> Result<Option<String>, CollectionError> {
        self.store
            .get(&summary_key(id))
            .await
            .map_err(CollectionError::storage)
    }

    pub async fn save_summary(&self, id: &str, summary: &str) -> Result<(), CollectionError> {
        self.store
            .set(&summary_key(id), summary)
            .await
            .map_err(CollectionError::storage)
    }
}
