//! Orders and stock application.

use crate::cart::Cart;
use crate::error::{CheckoutError, Result};
use crate::snapshot::LineSnapshot;
use partshop_catalog::{Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// One order row, copied verbatim from the cart at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The product this line belongs to.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: u32,
    /// The target as it looked when it went into the cart.
    pub snapshot: LineSnapshot,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// External order identifier.
    pub id: String,
    /// The order's rows.
    pub lines: Vec<OrderLine>,
    /// Sum of line totals at checkout time.
    pub total: f64,
}

impl Order {
    /// Create an order from a cart, copying every snapshot verbatim.
    pub fn from_cart(id: impl Into<String>, cart: &Cart) -> Result<Self> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(Self {
            id: id.into(),
            lines: cart
                .lines()
                .iter()
                .map(|line| OrderLine {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    snapshot: line.snapshot.clone(),
                })
                .collect(),
            total: cart.total(),
        })
    }
}

/// Apply one line's stock decrement to its product.
///
/// Part lines decrement that part's own stock, located by the id carried
/// in the snapshot; whole-product lines decrement `total_stock`. Both
/// clamp at zero — an underflow ships short rather than failing the order.
pub fn apply_line(product: &mut Product, line: &OrderLine) -> Result<()> {
    match line.snapshot.part_id {
        Some(part_id) => {
            let path = product.tree.path_of(part_id).unwrap_or_default();
            let node = product
                .tree
                .get_mut(part_id)
                .ok_or(CheckoutError::PartNotFound(path))?;
            node.stock = node.stock.saturating_sub(line.quantity);
        }
        None => {
            product.total_stock = product.total_stock.saturating_sub(line.quantity);
        }
    }
    Ok(())
}

/// Apply a whole order's decrements across a set of products.
///
/// Lines are walked sequentially and best-effort: a line whose product or
/// part has disappeared is logged and skipped, and earlier lines stay
/// applied — there is no compensating rollback. Returns the number of
/// lines applied.
pub fn apply_order(order: &Order, products: &mut HashMap<ProductId, Product>) -> usize {
    let mut applied = 0;
    for line in &order.lines {
        let Some(product) = products.get_mut(&line.product_id) else {
            warn!(order = %order.id, product = %line.product_id, "skipping line: unknown product");
            continue;
        };
        match apply_line(product, line) {
            Ok(()) => applied += 1,
            Err(err) => {
                warn!(order = %order.id, product = %line.product_id, %err, "skipping line");
            }
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use partshop_catalog::{PartDraft, PartPath, PartTree};

    fn kit() -> (ProductId, Product) {
        let mut tree = PartTree::new();
        let gearbox = tree
            .insert_root(PartDraft {
                image: Some("gearbox.png".to_string()),
                price: 80.0,
                stock: 5,
                ..PartDraft::named("Gearbox")
            })
            .unwrap();
        tree.insert_child(
            gearbox,
            PartDraft {
                price: 12.0,
                stock: 3,
                ..PartDraft::named("Bearing")
            },
        )
        .unwrap();
        let product = Product {
            title: "Gearbox Kit".to_string(),
            description: "Complete gearbox with spares".to_string(),
            category: "drivetrain".to_string(),
            brand: "Acme".to_string(),
            image: "kit.png".to_string(),
            price: 250.0,
            sale_price: 0.0,
            total_stock: 10,
            red_threshold: None,
            yellow_threshold: None,
            tree,
        };
        ("gearbox-kit".to_string(), product)
    }

    fn cart_with(product_id: &ProductId, product: &Product, path: PartPath, qty: u32) -> Cart {
        let mut cart = Cart::new();
        cart.add(product_id, product, &path, qty).unwrap();
        cart
    }

    #[test]
    fn empty_cart_cannot_become_an_order() {
        assert!(matches!(
            Order::from_cart("o-1", &Cart::new()),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn order_copies_snapshots_and_total() {
        let (id, product) = kit();
        let mut cart = cart_with(&id, &product, PartPath::root(), 2);
        cart.add(&id, &product, &[0, 0].into(), 1).unwrap();
        let order = Order::from_cart("o-1", &cart).unwrap();
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.total, 2.0 * 250.0 + 12.0);
    }

    #[test]
    fn part_line_decrements_that_parts_stock() {
        let (id, mut product) = kit();
        let cart = cart_with(&id, &product, [0, 0].into(), 2);
        let order = Order::from_cart("o-1", &cart).unwrap();
        apply_line(&mut product, &order.lines[0]).unwrap();

        let bearing = product.tree.resolve(&[0, 0].into()).unwrap();
        assert_eq!(bearing.stock, 1);
        // The product's own counter is untouched by part lines.
        assert_eq!(product.total_stock, 10);
    }

    #[test]
    fn whole_product_line_decrements_total_stock() {
        let (id, mut product) = kit();
        let cart = cart_with(&id, &product, PartPath::root(), 3);
        let order = Order::from_cart("o-1", &cart).unwrap();
        apply_line(&mut product, &order.lines[0]).unwrap();
        assert_eq!(product.total_stock, 7);
    }

    #[test]
    fn decrements_clamp_at_zero() {
        let (id, mut product) = kit();
        let cart = cart_with(&id, &product, [0, 0].into(), 50);
        let order = Order::from_cart("o-1", &cart).unwrap();
        apply_line(&mut product, &order.lines[0]).unwrap();
        assert_eq!(product.tree.resolve(&[0, 0].into()).unwrap().stock, 0);
    }

    #[test]
    fn apply_order_is_best_effort() {
        let (id, product) = kit();
        let mut cart = cart_with(&id, &product, PartPath::root(), 1);
        cart.add(&id, &product, &[0, 0].into(), 1).unwrap();
        let order = Order::from_cart("o-1", &cart).unwrap();

        // Delete the bearing between checkout and stock application.
        let mut products: HashMap<ProductId, Product> = HashMap::new();
        let mut mutated = product;
        let bearing = mutated.tree.resolve_id(&[0, 0].into()).unwrap();
        mutated.tree.delete(bearing).unwrap();
        products.insert(id.clone(), mutated);

        let applied = apply_order(&order, &mut products);
        assert_eq!(applied, 1);
        // The surviving line still took effect.
        assert_eq!(products[&id].total_stock, 9);
    }

    #[test]
    fn apply_order_skips_unknown_products() {
        let (id, product) = kit();
        let cart = cart_with(&id, &product, PartPath::root(), 1);
        let order = Order::from_cart("o-1", &cart).unwrap();
        let mut products: HashMap<ProductId, Product> = HashMap::new();
        assert_eq!(apply_order(&order, &mut products), 0);
    }
}
