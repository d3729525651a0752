//! Load/save access to the shared store document.
//!
//! Every mutation goes through [`Gateway::update`], which re-reads the stored
//! document right before applying the change. This narrows the window for
//! lost updates between sessions but does not close it: two writers racing
//! between read and write still resolve as last write wins.

use tracing::{debug, info};

use crate::document::StoreDocument;
use crate::error::Result;
use crate::storage::DocumentStore;

/// Record id used when none is configured.
pub const DEFAULT_DOCUMENT_ID: &str = "main_database";

/// Reads and writes the whole team document under one record id.
#[derive(Debug)]
pub struct Gateway<S> {
    store: S,
    document_id: String,
}

impl<S: DocumentStore> Gateway<S> {
    /// Wrap `store`, addressing the document stored under `document_id`.
    pub fn new(store: S, document_id: impl Into<String>) -> Self {
        Self {
            store,
            document_id: document_id.into(),
        }
    }

    /// The record id this gateway reads and writes.
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the document, creating and persisting the default one on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written, or the stored
    /// document is malformed.
    pub fn load(&self) -> Result<StoreDocument> {
        if let Some(body) = self.store.get(&self.document_id)? {
            let document = StoreDocument::from_json(&body)?;
            debug!(
                "Loaded document '{}' with {} team(s)",
                self.document_id,
                document.len()
            );
            return Ok(document);
        }

        info!(
            "No document '{}' found, creating the default team",
            self.document_id
        );
        let document = StoreDocument::bootstrap();
        self.save(&document)?;
        Ok(document)
    }

    /// Replace the stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, document: &StoreDocument) -> Result<()> {
        self.store.put(&self.document_id, &document.to_json()?)
    }

    /// Reload, apply `change`, and save.
    ///
    /// Returns the document as written together with the closure's result.
    /// When `change` fails nothing is written.
    ///
    /// # Errors
    ///
    /// Returns the closure's error or any load/save failure.
    pub fn update<T>(
        &self,
        change: impl FnOnce(&mut StoreDocument) -> Result<T>,
    ) -> Result<(StoreDocument, T)> {
        let mut latest = self.load()?;
        let outcome = change(&mut latest)?;
        self.save(&latest)?;
        Ok((latest, outcome))
    }
}
