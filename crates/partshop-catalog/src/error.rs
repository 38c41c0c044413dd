//! Error types for the catalog.

use crate::path::PartPath;
use crate::tree::PartId;
use thiserror::Error;

/// Errors from catalog documents and part-tree operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A path did not resolve (index out of bounds, or a leaf mid-walk).
    #[error("no part at path {0}")]
    PathNotFound(PartPath),

    /// An id did not resolve (stale reference after a delete).
    #[error("no part with id {0}")]
    UnknownPart(PartId),

    /// Tried to add a subpart under a part that is not an assembly.
    #[error("part {0} is not an assembly")]
    NotAnAssembly(PartId),

    /// Removing an image would orphan the assembly's subparts.
    #[error("part {0} still has {1} subpart(s)")]
    WouldOrphanChildren(PartId, usize),

    /// A wire node declared subparts without an image of its own.
    #[error("part \"{0}\" has subparts but no image")]
    ImagelessAssembly(String),

    /// A field failed validation.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// JSON (de)serialization failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
