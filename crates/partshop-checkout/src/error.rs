//! Error types for checkout.

use partshop_catalog::{PartPath, ProductId};
use thiserror::Error;

/// Errors from cart and order operations.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// The selected path no longer resolves in the product's tree.
    #[error("no part at path {0}")]
    PartNotFound(PartPath),

    /// The selected part is informational (price 0) and not sold on its
    /// own.
    #[error("\"{0}\" is not sold separately")]
    NotPurchasable(String),

    /// Quantity must be at least 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// An order cannot be created from an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A line references a product that is not available.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
