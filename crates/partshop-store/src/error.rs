//! Error types for the product store.

use partshop_catalog::ProductId;
use thiserror::Error;

/// Errors from product persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be (de)serialized.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// No document exists for this product.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The document changed since it was loaded.
    #[error("revision conflict on {id}: expected {expected}, found {actual}")]
    RevisionConflict {
        /// The product whose save was refused.
        id: ProductId,
        /// Revision the caller loaded.
        expected: u64,
        /// Revision currently on disk.
        actual: u64,
    },

    /// Product ids become file names; path separators and dots are out.
    #[error("invalid product id \"{0}\"")]
    InvalidId(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
