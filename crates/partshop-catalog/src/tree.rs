//! The part arena: id-keyed nodes with ordered roots and a parent index.

use crate::error::{CatalogError, Result};
use crate::model::{PartDraft, PartKind, PartNode};
use crate::path::{Crumb, PartPath};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable identifier for a part within one product's tree.
///
/// Ids are allocated from a counter persisted with the tree and are never
/// reused, so references held in carts, orders and admin UI state survive
/// sibling insertion and deletion — unlike index paths, which renumber.
pub type PartId = u64;

/// The ordered forest of parts attached to a product.
///
/// Nodes live in an arena keyed by [`PartId`]. Structure is the ordered
/// `roots` list plus each assembly's ordered child list; a parent index is
/// maintained alongside so [`PartTree::path_of`] can derive a node's index
/// path on demand. Index paths are therefore a view, not the identity.
///
/// All structural edits go through the tree's operations, which keep the
/// parent index consistent and never panic on stale input: a missing id or
/// path comes back as a typed error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TreeData", into = "TreeData")]
pub struct PartTree {
    nodes: HashMap<PartId, PartNode>,
    roots: Vec<PartId>,
    next_id: PartId,
    parent: HashMap<PartId, PartId>,
}

impl Default for PartTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
            parent: HashMap::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Total number of parts in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the tree empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ordered top-level part ids.
    pub fn roots(&self) -> &[PartId] {
        &self.roots
    }

    /// Look up a part by id.
    pub fn get(&self, id: PartId) -> Option<&PartNode> {
        self.nodes.get(&id)
    }

    /// Mutable access to a part's fields.
    ///
    /// Structural edits (subpart lists) must go through the tree's
    /// operations; callers may only mutate scalar fields here.
    pub fn get_mut(&mut self, id: PartId) -> Option<&mut PartNode> {
        self.nodes.get_mut(&id)
    }

    /// Does the tree contain this id?
    pub fn contains(&self, id: PartId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The parent of a node; `None` for roots and unknown ids.
    pub fn parent_of(&self, id: PartId) -> Option<PartId> {
        self.parent.get(&id).copied()
    }

    /// Ordered subpart ids of a node; empty for leaves and unknown ids.
    pub fn children_of(&self, id: PartId) -> &[PartId] {
        self.nodes.get(&id).map(|n| n.kind.children()).unwrap_or(&[])
    }

    // =========================================================================
    // Path resolution
    // =========================================================================

    /// Resolve a path to a part id.
    ///
    /// Returns `None` when any index is out of bounds or the walk descends
    /// through a leaf — and for the empty path, which addresses the product
    /// itself rather than any part.
    pub fn resolve_id(&self, path: &PartPath) -> Option<PartId> {
        let mut level: &[PartId] = &self.roots;
        let mut found = None;
        for &index in path.indices() {
            let id = *level.get(index)?;
            let node = self.nodes.get(&id)?;
            level = node.kind.children();
            found = Some(id);
        }
        found
    }

    /// Resolve a path to a part.
    pub fn resolve(&self, path: &PartPath) -> Option<&PartNode> {
        self.resolve_id(path).and_then(|id| self.nodes.get(&id))
    }

    /// Derive the current index path of a node from the parent index.
    ///
    /// The result is only valid until the next structural edit of any
    /// earlier sibling.
    pub fn path_of(&self, id: PartId) -> Option<PartPath> {
        if !self.nodes.contains_key(&id) {
            return None;
        }
        let mut indices = Vec::new();
        let mut current = id;
        loop {
            match self.parent.get(&current).copied() {
                Some(parent_id) => {
                    let position = self
                        .children_of(parent_id)
                        .iter()
                        .position(|&c| c == current)?;
                    indices.push(position);
                    current = parent_id;
                }
                None => {
                    let position = self.roots.iter().position(|&c| c == current)?;
                    indices.push(position);
                    break;
                }
            }
        }
        indices.reverse();
        Some(PartPath::new(indices))
    }

    /// Breadcrumb trail for a path: one crumb per prefix, top-down.
    ///
    /// `None` when the path does not resolve. The product-level crumb is
    /// the caller's to prepend (the tree does not know the product title).
    pub fn breadcrumbs(&self, path: &PartPath) -> Option<Vec<Crumb>> {
        let mut crumbs = Vec::with_capacity(path.len());
        let mut level: &[PartId] = &self.roots;
        let mut prefix = PartPath::root();
        for &index in path.indices() {
            let id = *level.get(index)?;
            let node = self.nodes.get(&id)?;
            prefix = prefix.child(index);
            crumbs.push(Crumb {
                name: node.name.clone(),
                prefix: prefix.clone(),
            });
            level = node.kind.children();
        }
        Some(crumbs)
    }

    // =========================================================================
    // Mutation operations
    // =========================================================================

    /// Append a new top-level part. Returns its id.
    pub fn insert_root(&mut self, draft: PartDraft) -> Result<PartId> {
        self.insert_raw(None, None, draft)
    }

    /// Append a new subpart under an assembly. Returns its id.
    pub fn insert_child(&mut self, parent: PartId, draft: PartDraft) -> Result<PartId> {
        self.insert_raw(Some(parent), None, draft)
    }

    /// Append a new part at a path: under the assembly the path resolves
    /// to, or at top level for the root path.
    pub fn insert_at(&mut self, path: &PartPath, draft: PartDraft) -> Result<PartId> {
        if path.is_root() {
            return self.insert_root(draft);
        }
        let parent = self
            .resolve_id(path)
            .ok_or_else(|| CatalogError::PathNotFound(path.clone()))?;
        self.insert_child(parent, draft)
    }

    /// Replace a part's scalar fields. Subparts are ALWAYS preserved; a
    /// draft image of `Some` replaces the part's own image (promoting a
    /// leaf to an empty assembly), `None` leaves image and subparts
    /// untouched. Use [`PartTree::clear_image`] to demote explicitly.
    pub fn update(&mut self, id: PartId, draft: PartDraft) -> Result<()> {
        draft.validate()?;
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(CatalogError::UnknownPart(id))?;
        node.name = draft.name;
        node.label = draft.label;
        node.description = draft.description;
        node.price = draft.price;
        node.stock = draft.stock;
        node.thumbnail = draft.thumbnail;
        node.hotspot = draft.hotspot;
        if let Some(image) = draft.image {
            match &mut node.kind {
                PartKind::Assembly { image: current, .. } => *current = image,
                kind @ PartKind::Leaf => {
                    *kind = PartKind::Assembly {
                        image,
                        children: Vec::new(),
                    };
                }
            }
        }
        Ok(())
    }

    /// Replace the part at a path. See [`PartTree::update`].
    pub fn update_at(&mut self, path: &PartPath, draft: PartDraft) -> Result<()> {
        let id = self
            .resolve_id(path)
            .ok_or_else(|| CatalogError::PathNotFound(path.clone()))?;
        self.update(id, draft)
    }

    /// Set a part's own image, promoting a leaf to an empty assembly.
    pub fn set_image(&mut self, id: PartId, image: impl Into<String>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(CatalogError::UnknownPart(id))?;
        let image = image.into();
        match &mut node.kind {
            PartKind::Assembly { image: current, .. } => *current = image,
            kind @ PartKind::Leaf => {
                *kind = PartKind::Assembly {
                    image,
                    children: Vec::new(),
                };
            }
        }
        Ok(())
    }

    /// Remove a part's own image, demoting it back to a leaf.
    ///
    /// Refused while subparts exist: dropping the image would orphan the
    /// markers placed on it. Delete or move the subparts first.
    pub fn clear_image(&mut self, id: PartId) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(CatalogError::UnknownPart(id))?;
        match &node.kind {
            PartKind::Leaf => Ok(()),
            PartKind::Assembly { children, .. } if !children.is_empty() => {
                Err(CatalogError::WouldOrphanChildren(id, children.len()))
            }
            PartKind::Assembly { .. } => {
                node.kind = PartKind::Leaf;
                Ok(())
            }
        }
    }

    /// Delete a part and its whole subtree.
    ///
    /// Later siblings' index paths renumber; their ids do not change.
    pub fn delete(&mut self, id: PartId) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(CatalogError::UnknownPart(id));
        }
        match self.parent.get(&id).copied() {
            Some(parent_id) => {
                if let Some(PartKind::Assembly { children, .. }) =
                    self.nodes.get_mut(&parent_id).map(|n| &mut n.kind)
                {
                    children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                pending.extend(node.kind.children().iter().copied());
            }
            self.parent.remove(&current);
        }
        Ok(())
    }

    /// Delete the part at a path. See [`PartTree::delete`].
    pub fn delete_at(&mut self, path: &PartPath) -> Result<()> {
        let id = self
            .resolve_id(path)
            .ok_or_else(|| CatalogError::PathNotFound(path.clone()))?;
        self.delete(id)
    }

    pub(crate) fn insert_raw(
        &mut self,
        parent: Option<PartId>,
        declared: Option<PartId>,
        draft: PartDraft,
    ) -> Result<PartId> {
        draft.validate()?;
        if let Some(parent_id) = parent {
            match self.nodes.get(&parent_id) {
                None => return Err(CatalogError::UnknownPart(parent_id)),
                Some(node) if !node.kind.is_assembly() => {
                    return Err(CatalogError::NotAnAssembly(parent_id));
                }
                Some(_) => {}
            }
        }
        // Declared ids (wire round-trips) are kept when free; collisions
        // and fresh submissions get the next counter value.
        let id = match declared {
            Some(declared_id) if !self.nodes.contains_key(&declared_id) => {
                self.next_id = self.next_id.max(declared_id + 1);
                declared_id
            }
            _ => self.alloc_id(),
        };
        let kind = match draft.image {
            Some(image) => PartKind::Assembly {
                image,
                children: Vec::new(),
            },
            None => PartKind::Leaf,
        };
        self.nodes.insert(
            id,
            PartNode {
                id,
                name: draft.name,
                label: draft.label,
                description: draft.description,
                price: draft.price,
                stock: draft.stock,
                thumbnail: draft.thumbnail,
                hotspot: draft.hotspot,
                kind,
            },
        );
        match parent {
            Some(parent_id) => {
                if let Some(PartKind::Assembly { children, .. }) =
                    self.nodes.get_mut(&parent_id).map(|n| &mut n.kind)
                {
                    children.push(id);
                }
                self.parent.insert(id, parent_id);
            }
            None => self.roots.push(id),
        }
        Ok(id)
    }

    fn alloc_id(&mut self) -> PartId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Depth-first pre-order walk yielding `(depth, node)`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: self.roots.iter().rev().map(|&id| (id, 0)).collect(),
        }
    }

    /// All parts in depth-first pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &PartNode> {
        self.walk().map(|(_, node)| node)
    }
}

/// Iterator over a tree in depth-first pre-order. See [`PartTree::walk`].
pub struct Walk<'a> {
    tree: &'a PartTree,
    stack: Vec<(PartId, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a PartNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, depth) = self.stack.pop()?;
            let Some(node) = self.tree.nodes.get(&id) else {
                continue;
            };
            for &child in node.kind.children().iter().rev() {
                self.stack.push((child, depth + 1));
            }
            return Some((depth, node));
        }
    }
}

/// Plain serialized shape of a tree; the parent index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct TreeData {
    nodes: HashMap<PartId, PartNode>,
    roots: Vec<PartId>,
    next_id: PartId,
}

impl From<TreeData> for PartTree {
    fn from(data: TreeData) -> Self {
        let mut parent = HashMap::new();
        for node in data.nodes.values() {
            for &child in node.kind.children() {
                parent.insert(child, node.id);
            }
        }
        Self {
            nodes: data.nodes,
            roots: data.roots,
            next_id: data.next_id,
            parent,
        }
    }
}

impl From<PartTree> for TreeData {
    fn from(tree: PartTree) -> Self {
        Self {
            nodes: tree.nodes,
            roots: tree.roots,
            next_id: tree.next_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hotspot;
    use proptest::prelude::*;

    /// `[{Gearbox, subparts: [{Bearing, price 12}]}]` plus a second root.
    fn gearbox_tree() -> (PartTree, PartId, PartId, PartId) {
        let mut tree = PartTree::new();
        let gearbox = tree
            .insert_root(PartDraft {
                image: Some("gearbox.png".to_string()),
                hotspot: Some(Hotspot::new(40.0, 60.0)),
                ..PartDraft::named("Gearbox")
            })
            .unwrap();
        let bearing = tree
            .insert_child(
                gearbox,
                PartDraft {
                    price: 12.0,
                    ..PartDraft::named("Bearing")
                },
            )
            .unwrap();
        let housing = tree.insert_root(PartDraft::named("Housing")).unwrap();
        (tree, gearbox, bearing, housing)
    }

    #[test]
    fn resolve_spec_scenarios() {
        let (tree, gearbox, bearing, _) = gearbox_tree();
        assert_eq!(tree.resolve(&[0].into()).map(|n| n.id), Some(gearbox));
        assert_eq!(tree.resolve(&[0, 0].into()).map(|n| n.id), Some(bearing));
        assert_eq!(tree.resolve(&[0, 1].into()), None);
        assert_eq!(tree.resolve(&[9].into()), None);
        // The empty path addresses the product, not any part.
        assert_eq!(tree.resolve(&PartPath::root()), None);
    }

    #[test]
    fn resolve_does_not_descend_through_leaves() {
        let (tree, _, _, _) = gearbox_tree();
        // Bearing is a leaf; [0, 0, 0] must fail gracefully.
        assert_eq!(tree.resolve(&[0, 0, 0].into()), None);
    }

    #[test]
    fn resolution_is_stable_within_an_unmutated_tree() {
        let (tree, _, _, _) = gearbox_tree();
        for path in [
            PartPath::from([0]),
            PartPath::from([0, 0]),
            PartPath::from([1]),
        ] {
            let first = tree.resolve_id(&path).unwrap();
            let reparsed = PartPath::parse(&path.to_string());
            assert_eq!(tree.resolve_id(&reparsed), Some(first));
        }
    }

    #[test]
    fn insert_under_leaf_is_refused() {
        let (mut tree, _, bearing, _) = gearbox_tree();
        let err = tree
            .insert_child(bearing, PartDraft::named("Ball"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotAnAssembly(id) if id == bearing));
    }

    #[test]
    fn update_preserves_children() {
        let (mut tree, gearbox, bearing, _) = gearbox_tree();
        tree.update(
            gearbox,
            PartDraft {
                price: 99.0,
                ..PartDraft::named("Gearbox v2")
            },
        )
        .unwrap();
        let node = tree.get(gearbox).unwrap();
        assert_eq!(node.name, "Gearbox v2");
        assert_eq!(node.price, 99.0);
        // No image in the draft: the assembly keeps its image and subparts.
        assert_eq!(node.kind.image(), Some("gearbox.png"));
        assert_eq!(node.kind.children(), &[bearing]);
    }

    #[test]
    fn update_at_stale_path_is_a_typed_error() {
        let (mut tree, _, _, _) = gearbox_tree();
        let err = tree
            .update_at(&[5].into(), PartDraft::named("Ghost"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::PathNotFound(_)));
    }

    #[test]
    fn delete_renumbers_later_siblings() {
        let (mut tree, gearbox, _, housing) = gearbox_tree();
        assert_eq!(tree.path_of(housing), Some(PartPath::from([1])));
        tree.delete(gearbox).unwrap();
        // The former next sibling now occupies the deleted index...
        assert_eq!(tree.resolve_id(&[0].into()), Some(housing));
        // ...and its derived path followed suit, while its id did not move.
        assert_eq!(tree.path_of(housing), Some(PartPath::from([0])));
        assert!(!tree.contains(gearbox));
    }

    #[test]
    fn delete_drops_the_whole_subtree() {
        let (mut tree, gearbox, bearing, _) = gearbox_tree();
        tree.delete(gearbox).unwrap();
        assert!(!tree.contains(bearing));
        assert_eq!(tree.len(), 1);
        assert!(matches!(
            tree.delete(bearing),
            Err(CatalogError::UnknownPart(_))
        ));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (mut tree, gearbox, bearing, housing) = gearbox_tree();
        tree.delete(gearbox).unwrap();
        let replacement = tree.insert_root(PartDraft::named("Gearbox mk2")).unwrap();
        assert!(replacement > housing);
        assert_ne!(replacement, gearbox);
        assert_ne!(replacement, bearing);
    }

    #[test]
    fn clear_image_refuses_to_orphan_subparts() {
        let (mut tree, gearbox, bearing, housing) = gearbox_tree();
        let err = tree.clear_image(gearbox).unwrap_err();
        assert!(matches!(err, CatalogError::WouldOrphanChildren(_, 1)));
        tree.delete(bearing).unwrap();
        tree.clear_image(gearbox).unwrap();
        assert!(!tree.get(gearbox).unwrap().kind.is_assembly());
        // Clearing a leaf is a no-op.
        tree.clear_image(housing).unwrap();
    }

    #[test]
    fn set_image_promotes_a_leaf() {
        let (mut tree, _, _, housing) = gearbox_tree();
        tree.set_image(housing, "housing.png").unwrap();
        assert!(tree.get(housing).unwrap().kind.is_assembly());
        tree.insert_child(housing, PartDraft::named("Bolt")).unwrap();
        assert_eq!(tree.children_of(housing).len(), 1);
    }

    #[test]
    fn breadcrumbs_walk_every_prefix() {
        let (tree, _, _, _) = gearbox_tree();
        let crumbs = tree.breadcrumbs(&[0, 0].into()).unwrap();
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[0].name, "Gearbox");
        assert_eq!(crumbs[0].prefix, PartPath::from([0]));
        assert_eq!(crumbs[1].name, "Bearing");
        assert_eq!(crumbs[1].prefix, PartPath::from([0, 0]));
        assert!(tree.breadcrumbs(&[0, 7].into()).is_none());
    }

    #[test]
    fn walk_is_preorder_with_depths() {
        let (tree, _, _, _) = gearbox_tree();
        let seen: Vec<(usize, &str)> = tree
            .walk()
            .map(|(depth, node)| (depth, node.name.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![(0, "Gearbox"), (1, "Bearing"), (0, "Housing")]
        );
    }

    #[test]
    fn serde_round_trip_rebuilds_parent_index() {
        let (tree, gearbox, bearing, _) = gearbox_tree();
        let json = serde_json::to_string(&tree).unwrap();
        let restored: PartTree = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tree);
        assert_eq!(restored.parent_of(bearing), Some(gearbox));
        assert_eq!(restored.path_of(bearing), Some(PartPath::from([0, 0])));
    }

    #[test]
    fn loaded_tree_keeps_allocating_fresh_ids() {
        let (tree, _, _, _) = gearbox_tree();
        let max_id = tree.iter().map(|n| n.id).max().unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let mut restored: PartTree = serde_json::from_str(&json).unwrap();
        let new_id = restored.insert_root(PartDraft::named("Manual")).unwrap();
        assert!(new_id > max_id);
    }

    #[test]
    fn every_path_of_a_depth_three_fixture_survives_the_string_form() {
        let mut tree = PartTree::new();
        let engine = tree
            .insert_root(PartDraft {
                image: Some("engine.png".to_string()),
                ..PartDraft::named("Engine")
            })
            .unwrap();
        let gearbox = tree
            .insert_child(
                engine,
                PartDraft {
                    image: Some("gearbox.png".to_string()),
                    ..PartDraft::named("Gearbox")
                },
            )
            .unwrap();
        tree.insert_child(gearbox, PartDraft::named("Bearing")).unwrap();
        tree.insert_child(gearbox, PartDraft::named("Seal")).unwrap();
        tree.insert_child(engine, PartDraft::named("Piston")).unwrap();
        tree.insert_root(PartDraft::named("Manual")).unwrap();

        let ids: Vec<PartId> = tree.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 6);
        for id in ids {
            let path = tree.path_of(id).unwrap();
            let reparsed = PartPath::parse(&path.to_string());
            assert_eq!(reparsed.indices(), path.indices());
            assert_eq!(tree.resolve_id(&reparsed), Some(id));
        }
    }

    proptest! {
        /// Every node's derived path resolves back to that node, whatever
        /// shape the tree grew into.
        #[test]
        fn derived_paths_resolve_to_their_node(choices in proptest::collection::vec((0usize..5, any::<bool>()), 1..40)) {
            let mut tree = PartTree::new();
            let mut assemblies: Vec<PartId> = Vec::new();
            for (i, (pick, make_assembly)) in choices.into_iter().enumerate() {
                let draft = PartDraft {
                    image: make_assembly.then(|| format!("img-{i}.png")),
                    ..PartDraft::named(format!("part-{i}"))
                };
                let id = if assemblies.is_empty() {
                    tree.insert_root(draft).unwrap()
                } else {
                    let parent = assemblies[pick % assemblies.len()];
                    tree.insert_child(parent, draft).unwrap()
                };
                if make_assembly {
                    assemblies.push(id);
                }
            }
            let ids: Vec<PartId> = tree.iter().map(|n| n.id).collect();
            for id in ids {
                let path = tree.path_of(id).expect("path derivable");
                prop_assert_eq!(tree.resolve_id(&path), Some(id));
            }
        }
    }
}
