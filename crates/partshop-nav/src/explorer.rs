//! Drill-down traversal over a product's part tree.

use crate::error::{NavError, Result};
use crate::hotspot::{markers, Marker, Viewport};
use partshop_catalog::{Crumb, PartNode, PartPath, Product};

/// A drill-down cursor over one product.
///
/// The explorer holds a navigation stack of sibling indices — a growing
/// [`PartPath`] — and answers "what is on this level" and "which image are
/// these markers placed on". Entering a part pushes its index; going back
/// pops; breadcrumbs truncate.
///
/// The product is borrowed for the explorer's lifetime, so the tree cannot
/// change underneath the stack; a stale deep link used to seed the stack
/// still degrades to an empty level rather than a panic.
pub struct Explorer<'a> {
    product: &'a Product,
    stack: Vec<usize>,
}

impl<'a> Explorer<'a> {
    /// Start at the product root.
    pub fn new(product: &'a Product) -> Self {
        Self {
            product,
            stack: Vec::new(),
        }
    }

    /// Start at the level addressed by a deep-link path.
    ///
    /// Indices that do not resolve are dropped from the end, so an
    /// outdated link lands on the deepest still-valid ancestor.
    pub fn at_path(product: &'a Product, path: &PartPath) -> Self {
        let mut explorer = Self::new(product);
        for &index in path.indices() {
            if explorer.drill_down(index).is_err() {
                break;
            }
        }
        explorer
    }

    /// The product this explorer walks.
    pub fn product(&self) -> &'a Product {
        self.product
    }

    /// Current depth (0 = product root level).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The navigation stack as a path.
    pub fn path(&self) -> PartPath {
        self.stack.iter().copied().collect()
    }

    /// The parts displayed on the current level.
    ///
    /// Top-level parts when the stack is empty; a stale stack yields an
    /// empty level, never a panic.
    pub fn current_parts(&self) -> Vec<&'a PartNode> {
        let tree = &self.product.tree;
        let level = if self.stack.is_empty() {
            tree.roots()
        } else {
            match tree.resolve_id(&self.path()) {
                Some(id) => tree.children_of(id),
                None => &[],
            }
        };
        level.iter().filter_map(|&id| tree.get(id)).collect()
    }

    /// The image the current level's hotspots are placed on.
    ///
    /// The image of the deepest visited part that has one, falling back to
    /// the product's own image — image inherits from the nearest ancestor
    /// that set one.
    pub fn current_image(&self) -> &'a str {
        let tree = &self.product.tree;
        let mut image = self.product.image.as_str();
        let mut prefix = PartPath::root();
        for &index in &self.stack {
            prefix = prefix.child(index);
            match tree.resolve(&prefix) {
                Some(node) => {
                    if let Some(own) = node.kind.image() {
                        image = own;
                    }
                }
                None => break,
            }
        }
        image
    }

    /// Name shown as the current level's heading: the entered part's name,
    /// or the product title at the root.
    pub fn current_name(&self) -> &'a str {
        if self.stack.is_empty() {
            return &self.product.title;
        }
        self.product
            .tree
            .resolve(&self.path())
            .map(|node| node.name.as_str())
            .unwrap_or(&self.product.title)
    }

    /// Enter the part at `index` on the current level.
    ///
    /// Only assemblies can be entered; leaves are not worth a level of
    /// their own and stay where they are.
    pub fn drill_down(&mut self, index: usize) -> Result<()> {
        let parts = self.current_parts();
        let node = parts.get(index).ok_or(NavError::IndexOutOfRange(index))?;
        if !node.kind.is_assembly() {
            return Err(NavError::NotEnterable(node.name.clone()));
        }
        self.stack.push(index);
        Ok(())
    }

    /// Go up one level. Returns `false` when already at the root.
    pub fn go_back(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    /// Truncate the stack to `depth` entries (breadcrumb jump).
    pub fn jump_to(&mut self, depth: usize) {
        self.stack.truncate(depth);
    }

    /// Breadcrumb trail: the product first, then one crumb per entered
    /// part. Jumping to crumb `i` is `jump_to(i)`.
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        let mut crumbs = vec![Crumb {
            name: self.product.title.clone(),
            prefix: PartPath::root(),
        }];
        if let Some(trail) = self.product.tree.breadcrumbs(&self.path()) {
            crumbs.extend(trail);
        }
        crumbs
    }

    /// Positioned markers for the current level within a rendered
    /// viewport of [`Explorer::current_image`].
    pub fn markers(&self, viewport: &Viewport) -> Vec<Marker> {
        markers(&self.current_parts(), viewport)
    }
}
