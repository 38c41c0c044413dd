//! Hotspot marker placement and proximity hit-testing.
//!
//! Markers are placed in the rendered bounding box of the current level's
//! image from each part's percent coordinates. Hit-testing is
//! proximity-based (nearest marker within a Euclidean radius) because
//! canvas renderers draw every marker onto one overlay and get a single
//! click position back, with no per-marker hit-testing of their own.

use nalgebra::Point2;
use partshop_catalog::{PartId, PartNode};

/// Rendered bounding box of the current image, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top-left corner of the rendered image.
    pub origin: Point2<f64>,
    /// Rendered width in pixels.
    pub width: f64,
    /// Rendered height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point2::new(x, y),
            width,
            height,
        }
    }

    /// Map percent coordinates into this viewport.
    pub fn place(&self, x_percent: f64, y_percent: f64) -> Point2<f64> {
        Point2::new(
            self.origin.x + self.width * x_percent / 100.0,
            self.origin.y + self.height * y_percent / 100.0,
        )
    }
}

/// A positioned, clickable marker for one part on the current level.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Sibling index of the part on its level (drill-down argument).
    pub index: usize,
    /// Stable id of the part.
    pub part_id: PartId,
    /// Pixel position within the viewport.
    pub position: Point2<f64>,
}

/// Lay out markers for every part on a level that has a hotspot.
///
/// Parts without a hotspot are simply not marked; they remain reachable
/// through the list view.
pub fn markers(parts: &[&PartNode], viewport: &Viewport) -> Vec<Marker> {
    parts
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let hotspot = node.hotspot?;
            Some(Marker {
                index,
                part_id: node.id,
                position: viewport.place(hotspot.x_percent, hotspot.y_percent),
            })
        })
        .collect()
}

/// The nearest marker within `radius` of `point`, if any.
pub fn hit_test<'a>(
    markers: &'a [Marker],
    point: Point2<f64>,
    radius: f64,
) -> Option<&'a Marker> {
    let mut best: Option<(&Marker, f64)> = None;
    for marker in markers {
        let distance = nalgebra::distance(&marker.position, &point);
        if distance <= radius && best.map_or(true, |(_, d)| distance < d) {
            best = Some((marker, distance));
        }
    }
    best.map(|(marker, _)| marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use partshop_catalog::{Hotspot, PartKind};

    fn node(id: PartId, hotspot: Option<Hotspot>) -> PartNode {
        PartNode {
            id,
            name: format!("part-{id}"),
            label: None,
            description: None,
            price: 1.0,
            stock: 0,
            thumbnail: None,
            hotspot,
            kind: PartKind::Leaf,
        }
    }

    #[test]
    fn placement_maps_percent_into_the_viewport() {
        let viewport = Viewport::new(10.0, 20.0, 400.0, 200.0);
        let center = viewport.place(50.0, 50.0);
        assert_eq!(center, Point2::new(210.0, 120.0));
        assert_eq!(viewport.place(0.0, 0.0), Point2::new(10.0, 20.0));
        assert_eq!(viewport.place(100.0, 100.0), Point2::new(410.0, 220.0));
    }

    #[test]
    fn parts_without_hotspots_are_skipped() {
        let a = node(1, Some(Hotspot::new(25.0, 75.0)));
        let b = node(2, None);
        let parts = vec![&a, &b];
        let placed = markers(&parts, &Viewport::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].part_id, 1);
        assert_eq!(placed[0].index, 0);
        assert_eq!(placed[0].position, Point2::new(25.0, 75.0));
    }

    #[test]
    fn hit_test_picks_the_nearest_within_radius() {
        let a = node(1, Some(Hotspot::new(10.0, 10.0)));
        let b = node(2, Some(Hotspot::new(20.0, 10.0)));
        let parts = vec![&a, &b];
        let placed = markers(&parts, &Viewport::new(0.0, 0.0, 100.0, 100.0));

        // Click between the two, slightly closer to b.
        let hit = hit_test(&placed, Point2::new(16.0, 10.0), 8.0).unwrap();
        assert_eq!(hit.part_id, 2);

        // Outside every radius: no hit.
        assert!(hit_test(&placed, Point2::new(60.0, 60.0), 8.0).is_none());
    }

    #[test]
    fn hit_test_on_empty_overlay() {
        assert!(hit_test(&[], Point2::new(0.0, 0.0), 10.0).is_none());
    }
}
