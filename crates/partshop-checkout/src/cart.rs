//! The shopping cart.

use crate::error::{CheckoutError, Result};
use crate::snapshot::LineSnapshot;
use partshop_catalog::{PartPath, Product, ProductId};
use serde::{Deserialize, Serialize};

/// One cart row: a product (or a part of it) at a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line belongs to.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: u32,
    /// The resolved target, frozen at add time.
    pub snapshot: LineSnapshot,
}

impl CartLine {
    /// Line total (unit price × quantity).
    pub fn total(&self) -> f64 {
        self.snapshot.price * self.quantity as f64
    }
}

/// An ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cart's lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Is the cart empty?
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line totals.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Resolve a target in `product` and add it to the cart.
    ///
    /// The root path selects the whole product; any other path selects
    /// the part it resolves to. A line matching an existing row — same
    /// product, same part identity — merges into it (quantities sum)
    /// instead of appending. Two different parts that happen to share a
    /// label never merge; identity is the part id alone.
    pub fn add(
        &mut self,
        product_id: &ProductId,
        product: &Product,
        selection: &PartPath,
        quantity: u32,
    ) -> Result<&CartLine> {
        if quantity == 0 {
            return Err(CheckoutError::InvalidQuantity);
        }
        let snapshot = if selection.is_root() {
            LineSnapshot::of_product(product)
        } else {
            let node = product
                .tree
                .resolve(selection)
                .ok_or_else(|| CheckoutError::PartNotFound(selection.clone()))?;
            if !node.is_sellable() {
                return Err(CheckoutError::NotPurchasable(node.name.clone()));
            }
            LineSnapshot::of_part(node)
        };

        let position = self.lines.iter().position(|line| {
            line.product_id == *product_id && line.snapshot.same_target(&snapshot)
        });
        let index = match position {
            Some(index) => {
                self.lines[index].quantity += quantity;
                index
            }
            None => {
                self.lines.push(CartLine {
                    product_id: product_id.clone(),
                    quantity,
                    snapshot,
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[index])
    }

    /// Set a line's quantity; zero removes the line.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) {
        if index >= self.lines.len() {
            return;
        }
        if quantity == 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = quantity;
        }
    }

    /// Remove a line.
    pub fn remove(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
