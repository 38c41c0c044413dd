#![warn(missing_docs)]

//! Cart and order line resolution for partshop.
//!
//! A cart line is a snapshot of whatever it targeted — the whole product
//! or one part at any depth of the part tree — taken at add-to-cart time
//! and stored verbatim. Line identity is the stable part id, so merging
//! and stock application are exact. Stock decrements at order time clamp
//! at zero and are applied best-effort, line by line.
//!
//! # Example
//!
//! ```ignore
//! use partshop_checkout::{Cart, Order, apply_order};
//!
//! let mut cart = Cart::new();
//! cart.add(&product_id, &product, &"0,0".parse().unwrap(), 2)?;
//! let order = Order::from_cart("o-1001", &cart)?;
//! apply_order(&order, &mut products);
//! ```

pub mod cart;
pub mod error;
pub mod order;
pub mod snapshot;

pub use cart::{Cart, CartLine};
pub use error::{CheckoutError, Result};
pub use order::{apply_line, apply_order, Order, OrderLine};
pub use snapshot::LineSnapshot;
