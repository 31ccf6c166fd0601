//! Persistence gateway: a document store keyed by user id.
//!
//! The game core only ever talks to [`DrawingStore`]; every operation is
//! asynchronous and fallible, and callers never assume synchronous
//! completion. [`MemoryStore`] implements the exact document semantics
//! in-process and backs the host test suite; the browser layer provides an
//! HTTP implementation against a remote document store.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("remote rejected request: http status {0}")]
    Status(u16),
    #[error("malformed store document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Wire form of one user document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserDoc {
    pub username: String,
    /// Unordered set of drawing encodings; duplicates never stored.
    #[serde(default)]
    pub drawings: Vec<String>,
}

/// The five operations the game depends on. `save_drawing` is an idempotent
/// add to an unordered set; `delete_drawing` removes at most one matching
/// element; `drawings` returns the set in unspecified order.
#[allow(async_fn_in_trait)]
pub trait DrawingStore {
    async fn save_identity(&self, id: &str, display_name: &str) -> Result<(), StoreError>;
    async fn identity(&self, id: &str) -> Result<Option<String>, StoreError>;
    async fn save_drawing(&self, id: &str, encoding: &str) -> Result<(), StoreError>;
    async fn drawings(&self, id: &str) -> Result<Vec<String>, StoreError>;
    async fn delete_drawing(&self, id: &str, encoding: &str) -> Result<(), StoreError>;
}

// --- In-memory store ---------------------------------------------------------

/// Document map with the same add/remove semantics as the remote store.
/// Single-threaded by design, like everything else in the game.
#[derive(Default)]
pub struct MemoryStore {
    docs: RefCell<HashMap<String, UserDoc>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingStore for MemoryStore {
    async fn save_identity(&self, id: &str, display_name: &str) -> Result<(), StoreError> {
        let mut docs = self.docs.borrow_mut();
        docs.entry(id.to_owned()).or_default().username = display_name.to_owned();
        Ok(())
    }

    async fn identity(&self, id: &str) -> Result<Option<String>, StoreError> {
        let docs = self.docs.borrow();
        Ok(docs
            .get(id)
            .map(|doc| doc.username.clone())
            .filter(|name| !name.is_empty()))
    }

    async fn save_drawing(&self, id: &str, encoding: &str) -> Result<(), StoreError> {
        let mut docs = self.docs.borrow_mut();
        let doc = docs.entry(id.to_owned()).or_default();
        if !doc.drawings.iter().any(|d| d == encoding) {
            doc.drawings.push(encoding.to_owned());
        }
        Ok(())
    }

    async fn drawings(&self, id: &str) -> Result<Vec<String>, StoreError> {
        let docs = self.docs.borrow();
        Ok(docs.get(id).map(|doc| doc.drawings.clone()).unwrap_or_default())
    }

    async fn delete_drawing(&self, id: &str, encoding: &str) -> Result<(), StoreError> {
        let mut docs = self.docs.borrow_mut();
        if let Some(doc) = docs.get_mut(id) {
            if let Some(pos) = doc.drawings.iter().position(|d| d == encoding) {
                doc.drawings.remove(pos);
            }
        }
        Ok(())
    }
}
