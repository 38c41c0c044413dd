//! Line-item snapshots.

use partshop_catalog::{Hotspot, PartId, PartNode, Product};
use serde::{Deserialize, Serialize};

/// Immutable field subset captured from the resolved line target at
/// add-to-cart time.
///
/// The snapshot is stored verbatim on cart and order rows. It does NOT
/// reference the live tree: later edits to the product's parts never
/// rewrite historical cart or order data. The `part_id` is carried along
/// as the exact line identity for merging and stock application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    /// Stable id of the selected part; `None` for whole-product lines.
    pub part_id: Option<PartId>,
    /// Display name at capture time.
    pub name: String,
    /// Human-assigned code at capture time.
    pub label: Option<String>,
    /// Description at capture time.
    pub description: Option<String>,
    /// Unit price charged for this line.
    pub price: f64,
    /// List-view image at capture time.
    pub thumbnail: Option<String>,
    /// Marker position at capture time (kept for order detail views).
    pub hotspot: Option<Hotspot>,
}

impl LineSnapshot {
    /// Snapshot the product itself (no part selected).
    pub fn of_product(product: &Product) -> Self {
        Self {
            part_id: None,
            name: product.title.clone(),
            label: None,
            description: Some(product.description.clone()),
            price: product.effective_price(),
            thumbnail: Some(product.image.clone()),
            hotspot: None,
        }
    }

    /// Snapshot one part node.
    pub fn of_part(node: &PartNode) -> Self {
        Self {
            part_id: Some(node.id),
            name: node.name.clone(),
            label: node.label.clone(),
            description: node.description.clone(),
            price: node.price,
            thumbnail: node.thumbnail.clone(),
            hotspot: node.hotspot,
        }
    }

    /// Do two snapshots address the same purchasable target?
    ///
    /// Exact part-id comparison: both whole-product, or both the same
    /// part id. Names and labels play no role in identity.
    pub fn same_target(&self, other: &Self) -> bool {
        self.part_id == other.part_id
    }
}
