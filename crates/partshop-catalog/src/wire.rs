//! Legacy nested interchange format for product documents.
//!
//! Admin tooling exchanges whole part trees as one recursive JSON array:
//! camelCase fields, `subparts` nested inside each part, the entire tree
//! resent on every edit. This module parses that shape, normalizes it
//! (absent `subparts` become `[]`), and converts it to and from the arena
//! representation.
//!
//! Arena part ids travel through the format as `partId` so a document can
//! round-trip through an external editor without losing node identity;
//! parts submitted without one (fresh form entries) get a fresh id on
//! intake.

use crate::error::{CatalogError, Result};
use crate::model::{Hotspot, PartDraft, Product};
use crate::tree::{PartId, PartTree};
use serde::{Deserialize, Serialize};

/// A product document in the nested interchange shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    /// Main product image URL.
    pub image: String,
    /// Product title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Category name.
    pub category: String,
    /// Brand name.
    pub brand: String,
    /// List price.
    pub price: f64,
    /// Discounted price; 0 means no sale.
    #[serde(default)]
    pub sale_price: f64,
    /// Whole-product stock counter.
    pub total_stock: u32,
    /// Red stock-alert threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_threshold: Option<u32>,
    /// Yellow stock-alert threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yellow_threshold: Option<u32>,
    /// The nested part forest.
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

/// One part in the nested interchange shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    /// Arena id, when the part came from an existing document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<PartId>,
    /// Display name.
    pub name: String,
    /// Optional human-assigned code (legacy `nodeName`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price (0 = informational).
    #[serde(default)]
    pub price: f64,
    /// Part-level stock counter.
    #[serde(default)]
    pub quantity: u32,
    /// Small image for list views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// The part's own image; its presence is what makes subparts legal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_image: Option<String>,
    /// Hotspot X on the parent's image, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_percent: Option<f64>,
    /// Hotspot Y on the parent's image, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_percent: Option<f64>,
    /// Nested subparts; absent normalizes to empty.
    #[serde(default)]
    pub subparts: Vec<WirePart>,
}

impl WireProduct {
    /// Convert to the arena representation, validating on the way in.
    ///
    /// A part carrying `subparts` without a `partImage` is rejected: the
    /// legacy rule "has an image ⟺ may have subparts" is enforced here so
    /// it can be assumed everywhere else.
    pub fn into_product(self) -> Result<Product> {
        let mut tree = PartTree::new();
        for part in self.parts {
            attach(&mut tree, None, part)?;
        }
        let product = Product {
            title: self.title,
            description: self.description,
            category: self.category,
            brand: self.brand,
            image: self.image,
            price: self.price,
            sale_price: self.sale_price,
            total_stock: self.total_stock,
            red_threshold: self.red_threshold,
            yellow_threshold: self.yellow_threshold,
            tree,
        };
        product.validate()?;
        Ok(product)
    }
}

fn attach(tree: &mut PartTree, parent: Option<PartId>, part: WirePart) -> Result<()> {
    if !part.subparts.is_empty() && part.part_image.is_none() {
        return Err(CatalogError::ImagelessAssembly(part.name));
    }
    let hotspot = match (part.x_percent, part.y_percent) {
        (None, None) => None,
        (x, y) => Some(Hotspot::new(x.unwrap_or(0.0), y.unwrap_or(0.0))),
    };
    let draft = PartDraft {
        name: part.name,
        label: part.node_name,
        description: part.description,
        price: part.price,
        stock: part.quantity,
        thumbnail: part.thumbnail,
        hotspot,
        image: part.part_image,
    };
    let id = tree.insert_raw(parent, part.part_id, draft)?;
    for subpart in part.subparts {
        attach(tree, Some(id), subpart)?;
    }
    Ok(())
}

impl From<&Product> for WireProduct {
    fn from(product: &Product) -> Self {
        let parts = product
            .tree
            .roots()
            .iter()
            .filter_map(|&id| emit(&product.tree, id))
            .collect();
        Self {
            image: product.image.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            price: product.price,
            sale_price: product.sale_price,
            total_stock: product.total_stock,
            red_threshold: product.red_threshold,
            yellow_threshold: product.yellow_threshold,
            parts,
        }
    }
}

fn emit(tree: &PartTree, id: PartId) -> Option<WirePart> {
    let node = tree.get(id)?;
    Some(WirePart {
        part_id: Some(node.id),
        name: node.name.clone(),
        node_name: node.label.clone(),
        description: node.description.clone(),
        price: node.price,
        quantity: node.stock,
        thumbnail: node.thumbnail.clone(),
        part_image: node.kind.image().map(str::to_string),
        x_percent: node.hotspot.map(|h| h.x_percent),
        y_percent: node.hotspot.map(|h| h.y_percent),
        subparts: node
            .kind
            .children()
            .iter()
            .filter_map(|&child| emit(tree, child))
            .collect(),
    })
}

impl Product {
    /// Serialize to the nested interchange JSON.
    pub fn to_wire_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&WireProduct::from(self))?)
    }

    /// Parse a product from nested interchange JSON.
    pub fn from_wire_json(json: &str) -> Result<Product> {
        let wire: WireProduct = serde_json::from_str(json)?;
        wire.into_product()
    }
}
