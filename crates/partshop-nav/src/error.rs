//! Error types for navigation.

use thiserror::Error;

/// Errors from drill-down navigation.
#[derive(Error, Debug)]
pub enum NavError {
    /// The index does not exist on the current level.
    #[error("no part at index {0} on this level")]
    IndexOutOfRange(usize),

    /// The selected part is a leaf and cannot be entered.
    #[error("part \"{0}\" cannot be entered")]
    NotEnterable(String),
}

/// Result type for navigation operations.
pub type Result<T> = std::result::Result<T, NavError>;
