//! In-memory document store.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;

use super::DocumentStore;

/// A [`DocumentStore`] that lives only as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<String>> {
        Ok(self.documents.borrow().get(id).cloned())
    }

    fn put(&self, id: &str, body: &str) -> Result<()> {
        self.documents
            .borrow_mut()
            .insert(id.to_string(), body.to_string());
        Ok(())
    }
}
