//! Storage
//!
//! A key/value seam shaped like browser local storage. Containers mirror their contents into it
//! as JSON arrays; it is a best-effort copy, never the source of truth.

use std::{collections::HashMap, io, sync::Mutex};

use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage key holding the cart line items.
pub const CART_KEY: &str = "rootcraft_cart";

/// Storage key holding the wishlist entries.
pub const WISHLIST_KEY: &str = "rootcraft_wishlist";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write because it is full.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// A stored value could not be encoded or decoded.
    #[error("invalid stored value")]
    Serialization(#[from] serde_json::Error),

    /// Underlying IO failure.
    #[error("storage io error")]
    Io(#[from] io::Error),
}

/// String key/value store.
#[automock]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used for tests and sessions without a persistent backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|error| StorageError::Unavailable(error.to_string()))
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);

        Ok(())
    }
}

/// Read a JSON array from storage.
///
/// Missing, unreadable or malformed entries yield an empty collection.
pub(crate) fn load_collection<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Vec<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            warn!(key, %error, "failed to read stored collection");

            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            debug!(key, count = items.len(), "restored stored collection");

            items
        }
        Err(error) => {
            warn!(key, %error, "discarding malformed stored collection");

            Vec::new()
        }
    }
}

/// Write a JSON array to storage, logging and swallowing any failure.
pub(crate) fn persist_collection<T: Serialize>(storage: &dyn Storage, key: &str, items: &[T]) {
    let result = serde_json::to_string(items)
        .map_err(StorageError::from)
        .and_then(|json| storage.set_item(key, &json));

    if let Err(error) = result {
        warn!(key, %error, "failed to persist collection");
    }
}
