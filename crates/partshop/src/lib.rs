#![warn(missing_docs)]

//! partshop — hierarchical product-parts catalog.
//!
//! Products carry a drill-down tree of parts, subparts and nested
//! subparts; shop UIs walk it by index path, carts snapshot whichever
//! node was bought. This crate is the ergonomic front door: fluent
//! builders over the arena plus re-exports of the member crates.
//!
//! # Example
//!
//! ```
//! use partshop::{Cart, PartBuilder, PartPath, ProductBuilder};
//!
//! let product = ProductBuilder::new("Gearbox Kit")
//!     .description("Complete gearbox with spares")
//!     .category("drivetrain")
//!     .brand("Acme")
//!     .image("kit.png")
//!     .price(250.0)
//!     .total_stock(10)
//!     .part(
//!         PartBuilder::new("Gearbox")
//!             .image("gearbox.png")
//!             .hotspot(40.0, 60.0)
//!             .subpart(PartBuilder::new("Bearing").price(12.0).stock(30)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let bearing = product.tree.resolve(&PartPath::parse("0,0")).unwrap();
//! assert_eq!(bearing.name, "Bearing");
//!
//! let mut cart = Cart::new();
//! let id = "gearbox-kit".to_string();
//! cart.add(&id, &product, &PartPath::parse("0,0"), 2).unwrap();
//! assert_eq!(cart.total(), 24.0);
//! ```

pub use partshop_catalog::{
    shop_link, CatalogError, Crumb, Hotspot, PartDraft, PartId, PartKind, PartNode, PartPath,
    PartTree, Product, ProductId, StockLevel, WirePart, WireProduct,
};
pub use partshop_checkout::{
    apply_line, apply_order, Cart, CartLine, CheckoutError, LineSnapshot, Order, OrderLine,
};
pub use partshop_nav::{hit_test, markers, Explorer, Marker, NavError, Viewport};

use partshop_catalog::Result;

/// Fluent builder for one part and its nested subparts.
///
/// Subparts imply an image: a builder with subparts but no
/// [`PartBuilder::image`] fails at build time with
/// [`CatalogError::ImagelessAssembly`].
#[derive(Debug, Clone, Default)]
pub struct PartBuilder {
    draft: PartDraft,
    subparts: Vec<PartBuilder>,
}

impl PartBuilder {
    /// Start a part with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            draft: PartDraft::named(name),
            subparts: Vec::new(),
        }
    }

    /// Human-assigned code (display and grouping aid).
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.draft.label = Some(label.into());
        self
    }

    /// Free-form description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.draft.description = Some(description.into());
        self
    }

    /// Unit price; leave at 0 for informational parts.
    pub fn price(mut self, price: f64) -> Self {
        self.draft.price = price;
        self
    }

    /// Part-level stock counter.
    pub fn stock(mut self, stock: u32) -> Self {
        self.draft.stock = stock;
        self
    }

    /// Small image for list views.
    pub fn thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.draft.thumbnail = Some(thumbnail.into());
        self
    }

    /// Marker position on the parent's image, in percent.
    pub fn hotspot(mut self, x_percent: f64, y_percent: f64) -> Self {
        self.draft.hotspot = Some(Hotspot::new(x_percent, y_percent));
        self
    }

    /// The part's own image, making it drillable.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.draft.image = Some(image.into());
        self
    }

    /// Nest a subpart under this part.
    pub fn subpart(mut self, subpart: PartBuilder) -> Self {
        self.subparts.push(subpart);
        self
    }

    fn attach(self, tree: &mut PartTree, parent: Option<PartId>) -> Result<PartId> {
        if !self.subparts.is_empty() && self.draft.image.is_none() {
            return Err(CatalogError::ImagelessAssembly(self.draft.name));
        }
        let id = match parent {
            Some(parent) => tree.insert_child(parent, self.draft)?,
            None => tree.insert_root(self.draft)?,
        };
        for subpart in self.subparts {
            subpart.attach(tree, Some(id))?;
        }
        Ok(id)
    }
}

/// Fluent builder for a product and its part tree.
#[derive(Debug, Clone, Default)]
pub struct ProductBuilder {
    title: String,
    description: String,
    category: String,
    brand: String,
    image: String,
    price: f64,
    sale_price: f64,
    total_stock: u32,
    red_threshold: Option<u32>,
    yellow_threshold: Option<u32>,
    parts: Vec<PartBuilder>,
}

impl ProductBuilder {
    /// Start a product with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Long description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Category name.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Brand name.
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Main product image.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// List price.
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Discounted price.
    pub fn sale_price(mut self, sale_price: f64) -> Self {
        self.sale_price = sale_price;
        self
    }

    /// Whole-product stock counter.
    pub fn total_stock(mut self, total_stock: u32) -> Self {
        self.total_stock = total_stock;
        self
    }

    /// Red/yellow stock-alert thresholds.
    pub fn thresholds(mut self, red: u32, yellow: u32) -> Self {
        self.red_threshold = Some(red);
        self.yellow_threshold = Some(yellow);
        self
    }

    /// Append a top-level part.
    pub fn part(mut self, part: PartBuilder) -> Self {
        self.parts.push(part);
        self
    }

    /// Build and validate the product.
    pub fn build(self) -> Result<Product> {
        let mut tree = PartTree::new();
        for part in self.parts {
            part.attach(&mut tree, None)?;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ProductBuilder {
        ProductBuilder::new("Gearbox Kit")
            .description("Complete gearbox with spares")
            .category("drivetrain")
            .brand("Acme")
            .image("kit.png")
            .price(250.0)
            .total_stock(10)
    }

    #[test]
    fn builds_a_nested_tree() {
        let product = base()
            .part(
                PartBuilder::new("Gearbox")
                    .image("gearbox.png")
                    .hotspot(40.0, 60.0)
                    .subpart(
                        PartBuilder::new("Output shaft")
                            .image("shaft.png")
                            .subpart(PartBuilder::new("Circlip").price(1.5)),
                    )
                    .subpart(PartBuilder::new("Bearing").price(12.0).label("p1")),
            )
            .part(PartBuilder::new("Manual"))
            .build()
            .unwrap();

        assert_eq!(product.tree.len(), 5);
        assert_eq!(
            product
                .tree
                .resolve(&PartPath::parse("0,0,0"))
                .map(|n| n.name.as_str()),
            Some("Circlip")
        );
        assert_eq!(
            product
                .tree
                .resolve(&PartPath::parse("0,1"))
                .and_then(|n| n.label.as_deref()),
            Some("p1")
        );
    }

    #[test]
    fn subparts_require_an_image() {
        let err = base()
            .part(PartBuilder::new("Gearbox").subpart(PartBuilder::new("Bearing")))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::ImagelessAssembly(name) if name == "Gearbox"));
    }

    #[test]
    fn build_validates_the_product() {
        let err = base().price(0.0).build().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation { field: "price", .. }
        ));
    }

    #[test]
    fn built_products_serialize_to_the_wire_shape() {
        let product = base()
            .part(
                PartBuilder::new("Gearbox")
                    .image("gearbox.png")
                    .subpart(PartBuilder::new("Bearing").price(12.0)),
            )
            .build()
            .unwrap();
        let json = product.to_wire_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parts"][0]["partImage"], "gearbox.png");
        assert_eq!(value["parts"][0]["subparts"][0]["name"], "Bearing");
        let restored = Product::from_wire_json(&json).unwrap();
        assert_eq!(restored, product);
    }
}
