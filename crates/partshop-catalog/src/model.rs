//! Product and part node types.

use crate::error::{CatalogError, Result};
use crate::tree::{PartId, PartTree};
use serde::{Deserialize, Serialize};

/// External identifier a product is stored and referenced under.
pub type ProductId = String;

/// Stock-alert classification for admin list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    /// At or below the red threshold.
    Red,
    /// At or below the yellow threshold.
    Yellow,
    /// Above both thresholds (or no thresholds configured).
    Ok,
}

/// Position of a part's marker on its PARENT's image, in percent.
///
/// For a root part the parent image is the product's own image; for a
/// nested part it is the enclosing assembly's image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    /// Horizontal position, 0..=100, left to right.
    pub x_percent: f64,
    /// Vertical position, 0..=100, top to bottom.
    pub y_percent: f64,
}

impl Hotspot {
    /// Create a new hotspot.
    pub fn new(x_percent: f64, y_percent: f64) -> Self {
        Self {
            x_percent,
            y_percent,
        }
    }

    /// Validate that both coordinates are within 0..=100.
    pub fn validate(&self) -> Result<()> {
        for (field, v) in [("x_percent", self.x_percent), ("y_percent", self.y_percent)] {
            if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                return Err(CatalogError::validation(
                    field,
                    format!("must be between 0 and 100, got {v}"),
                ));
            }
        }
        Ok(())
    }
}

/// Leaf/assembly classification of a part.
///
/// Whether a part can be drilled into is a property of this variant, not
/// something inferred from the presence of an image: only an [`Assembly`]
/// carries its own image and an ordered subpart list.
///
/// [`Assembly`]: PartKind::Assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PartKind {
    /// Terminal part with no structure of its own.
    Leaf,
    /// Decomposable part with its own image and ordered subparts.
    Assembly {
        /// Image the subparts' hotspots are placed on.
        image: String,
        /// Ordered subpart ids (insertion order = display order).
        children: Vec<PartId>,
    },
}

impl PartKind {
    /// The part's own image, if it has one.
    pub fn image(&self) -> Option<&str> {
        match self {
            PartKind::Leaf => None,
            PartKind::Assembly { image, .. } => Some(image),
        }
    }

    /// Ordered subpart ids; empty for a leaf.
    pub fn children(&self) -> &[PartId] {
        match self {
            PartKind::Leaf => &[],
            PartKind::Assembly { children, .. } => children,
        }
    }

    /// Can this part be entered by drill-down navigation?
    pub fn is_assembly(&self) -> bool {
        matches!(self, PartKind::Assembly { .. })
    }
}

/// One addressable component of a product, possibly further decomposable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartNode {
    /// Stable identifier within the owning tree.
    pub id: PartId,
    /// Display name.
    pub name: String,
    /// Optional human-assigned code. Not unique; display and grouping aid
    /// only — line identity always goes through [`PartNode::id`].
    #[serde(default)]
    pub label: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price. `0.0` marks informational parts not sold separately.
    #[serde(default)]
    pub price: f64,
    /// Part-level stock, decremented independently of the product's
    /// `total_stock`.
    #[serde(default)]
    pub stock: u32,
    /// Small image for list views.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Marker position on the parent's image.
    #[serde(default)]
    pub hotspot: Option<Hotspot>,
    /// Leaf/assembly classification.
    pub kind: PartKind,
}

impl PartNode {
    /// Is this part purchasable on its own?
    ///
    /// Parts priced at zero are informational content; they render in the
    /// drill-down UI but cannot be added to a cart.
    pub fn is_sellable(&self) -> bool {
        self.price > 0.0
    }
}

/// Editable scalar fields of a part, used by insert and update operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartDraft {
    /// Display name (required, non-empty).
    pub name: String,
    /// Optional human-assigned code.
    pub label: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Unit price (0.0 = informational).
    pub price: f64,
    /// Part-level stock.
    pub stock: u32,
    /// Small image for list views.
    pub thumbnail: Option<String>,
    /// Marker position on the parent's image.
    pub hotspot: Option<Hotspot>,
    /// Own image. `Some` makes the part an (initially empty) assembly.
    /// `None` on an update leaves the part's image and subparts untouched.
    pub image: Option<String>,
}

impl PartDraft {
    /// Create a draft with just a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validate the draft's fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CatalogError::validation(
                "price",
                format!("must be zero or positive, got {}", self.price),
            ));
        }
        if let Some(hotspot) = &self.hotspot {
            hotspot.validate()?;
        }
        Ok(())
    }
}

/// A catalog product with its part tree.
///
/// Products are whole documents: edits replace the stored document in one
/// write, and the part tree is carried inline as the `tree` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Category name.
    pub category: String,
    /// Brand name.
    pub brand: String,
    /// Main image; root parts' hotspots are placed on it.
    pub image: String,
    /// List price.
    pub price: f64,
    /// Discounted price; `0.0` means no sale.
    #[serde(default)]
    pub sale_price: f64,
    /// Whole-product stock counter.
    pub total_stock: u32,
    /// Stock count at or below which the product is flagged red.
    #[serde(default)]
    pub red_threshold: Option<u32>,
    /// Stock count at or below which the product is flagged yellow.
    #[serde(default)]
    pub yellow_threshold: Option<u32>,
    /// The hierarchical parts attached to this product.
    #[serde(default)]
    pub tree: PartTree,
}

impl Product {
    /// Validate all scalar fields and every part in the tree.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
            ("brand", &self.brand),
            ("image", &self.image),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogError::validation(field, "must not be empty"));
            }
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(CatalogError::validation(
                "price",
                format!("must be positive, got {}", self.price),
            ));
        }
        if !self.sale_price.is_finite() || self.sale_price < 0.0 {
            return Err(CatalogError::validation(
                "sale_price",
                format!("must be zero or positive, got {}", self.sale_price),
            ));
        }
        if self.total_stock == 0 {
            return Err(CatalogError::validation(
                "total_stock",
                "must be at least 1",
            ));
        }
        for node in self.tree.iter() {
            if node.name.trim().is_empty() {
                return Err(CatalogError::validation("name", "must not be empty"));
            }
            if let Some(hotspot) = &node.hotspot {
                hotspot.validate()?;
            }
        }
        Ok(())
    }

    /// Effective selling price: the sale price when one is set below the
    /// list price, else the list price.
    pub fn effective_price(&self) -> f64 {
        if self.sale_price > 0.0 && self.sale_price < self.price {
            self.sale_price
        } else {
            self.price
        }
    }

    /// Stock-alert classification against the configured thresholds.
    pub fn stock_level(&self) -> StockLevel {
        if let Some(red) = self.red_threshold {
            if self.total_stock <= red {
                return StockLevel::Red;
            }
        }
        if let Some(yellow) = self.yellow_threshold {
            if self.total_stock <= yellow {
                return StockLevel::Yellow;
            }
        }
        StockLevel::Ok
    }
}
