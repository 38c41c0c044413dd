#![warn(missing_docs)]

//! Shop-facing drill-down navigation over partshop part trees.
//!
//! This crate turns a product's part tree into the interaction model the
//! shop UI needs: a navigation stack that descends level by level, image
//! inheritance from the nearest ancestor, breadcrumb trails, and hotspot
//! marker placement with proximity hit-testing.
//!
//! # Example
//!
//! ```ignore
//! use partshop_nav::{Explorer, Viewport};
//!
//! let mut explorer = Explorer::new(&product);
//! explorer.drill_down(0)?;
//! for marker in explorer.markers(&Viewport::new(0.0, 0.0, 800.0, 600.0)) {
//!     println!("part {} at {:?}", marker.part_id, marker.position);
//! }
//! ```

pub mod error;
pub mod explorer;
pub mod hotspot;

pub use error::{NavError, Result};
pub use explorer::Explorer;
pub use hotspot::{hit_test, markers, Marker, Viewport};
