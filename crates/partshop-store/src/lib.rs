#![warn(missing_docs)]

//! Whole-document JSON persistence for partshop products.
//!
//! One product = one JSON document on disk. Every save rewrites the whole
//! document (temp file + rename, so readers never see a torn write) and
//! bumps a revision counter. Callers that pass the revision they loaded
//! get optimistic concurrency — a concurrent edit turns into a
//! [`StoreError::RevisionConflict`] instead of a silent overwrite; passing
//! `None` keeps the legacy last-write-wins behavior.
//!
//! # Example
//!
//! ```ignore
//! use partshop_store::ProductStore;
//!
//! let store = ProductStore::open("./store")?;
//! let stored = store.load(&"gearbox-kit".to_string())?;
//! // ... edit stored.product ...
//! store.save(&"gearbox-kit".to_string(), &stored.product, Some(stored.revision))?;
//! ```

pub mod error;
pub mod images;

pub use error::{Result, StoreError};
pub use images::data_url;

use partshop_catalog::{Product, ProductId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A product document together with its on-disk revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProduct {
    /// Monotonic save counter, starting at 1 for the first save.
    pub revision: u64,
    /// The product document itself.
    pub product: Product,
}

/// File-backed product store: one JSON document per product id.
#[derive(Debug, Clone)]
pub struct ProductStore {
    root: PathBuf,
}

impl ProductStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a product document.
    pub fn load(&self, id: &ProductId) -> Result<StoredProduct> {
        let path = self.path_for(id)?;
        self.read_document(id, &path)
    }

    /// Save a product document, returning the new revision.
    ///
    /// With `expected: Some(rev)`, the save is refused unless the on-disk
    /// revision still matches (0 = no document yet). With `None`, the save
    /// overwrites unconditionally — last write wins.
    pub fn save(
        &self,
        id: &ProductId,
        product: &Product,
        expected: Option<u64>,
    ) -> Result<u64> {
        let path = self.path_for(id)?;
        let actual = match self.read_document(id, &path) {
            Ok(document) => document.revision,
            Err(StoreError::NotFound(_)) => 0,
            Err(err) => return Err(err),
        };
        if let Some(expected) = expected {
            if expected != actual {
                return Err(StoreError::RevisionConflict {
                    id: id.clone(),
                    expected,
                    actual,
                });
            }
        }
        let document = StoredProduct {
            revision: actual + 1,
            product: product.clone(),
        };
        let json = serde_json::to_string_pretty(&document)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        debug!(%id, revision = document.revision, "saved product document");
        Ok(document.revision)
    }

    /// All product ids with a document in the store, sorted.
    pub fn list(&self) -> Result<Vec<ProductId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Delete a product document.
    pub fn remove(&self, id: &ProductId) -> Result<()> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(%id, "removed product document");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn read_document(&self, id: &ProductId, path: &Path) -> Result<StoredProduct> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    fn path_for(&self, id: &ProductId) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.clone()));
        }
        Ok(self.root.join(format!("{id}.json")))
    }
}
