#![warn(missing_docs)]

//! Product catalog document model for the partshop ecosystem.
//!
//! A [`Product`] carries an ordered forest of parts — parts, subparts,
//! nested subparts to any depth — as a [`PartTree`]: an arena of nodes
//! keyed by stable [`PartId`]s with ordered root and child lists. Shop
//! deep links and drill-down UIs address nodes by index path
//! ([`PartPath`], `"0,2,1"`); paths are derived views that renumber when
//! siblings are deleted, while ids stay put for the lifetime of the tree.
//!
//! # Example
//!
//! ```
//! use partshop_catalog::{PartDraft, PartPath, PartTree};
//!
//! let mut tree = PartTree::new();
//! let gearbox = tree.insert_root(PartDraft {
//!     image: Some("gearbox.png".to_string()),
//!     ..PartDraft::named("Gearbox")
//! }).unwrap();
//! tree.insert_child(gearbox, PartDraft {
//!     price: 12.0,
//!     ..PartDraft::named("Bearing")
//! }).unwrap();
//!
//! let bearing = tree.resolve(&PartPath::parse("0,0")).unwrap();
//! assert_eq!(bearing.name, "Bearing");
//! ```

pub mod error;
pub mod model;
pub mod path;
pub mod tree;
pub mod wire;

pub use error::{CatalogError, Result};
pub use model::{Hotspot, PartDraft, PartKind, PartNode, Product, ProductId, StockLevel};
pub use path::{shop_link, Crumb, PartPath};
pub use tree::{PartId, PartTree, Walk};
pub use wire::{WirePart, WireProduct};
