//! Index-path addressing into a part tree.
//!
//! A path names a node by the sequence of sibling indices walked from the
//! product root, e.g. `[0, 2, 1]` = third subpart of the first root part's
//! second... and so on. Paths serialize as comma-joined integers (`"0,2,1"`)
//! for URL routing. The empty path addresses the product itself.
//!
//! Index paths are display addresses, not identities: deleting a sibling
//! renumbers every later sibling's path. The stable identity of a node is
//! its [`PartId`](crate::PartId); [`PartTree::path_of`](crate::PartTree::path_of)
//! derives the current path of an id on demand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered sequence of sibling indices from the product root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartPath(Vec<usize>);

impl PartPath {
    /// The empty path, addressing the product root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from sibling indices.
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Parse a comma-joined path string.
    ///
    /// Tokens that are not non-negative integers are dropped defensively,
    /// so `"0,x,2,"` parses as `[0, 2]` and garbage input degrades to a
    /// shorter (or empty) path rather than an error.
    pub fn parse(s: &str) -> Self {
        Self(
            s.split(',')
                .filter_map(|token| token.trim().parse::<usize>().ok())
                .collect(),
        )
    }

    /// Does this path address the product root?
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of indices (= depth of the addressed node).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the path empty? Same as [`PartPath::is_root`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sibling indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Extend the path by one child index.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Drop the last index; `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// The last index; `None` at the root.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Keep only the first `depth` indices (jump-to-ancestor).
    pub fn truncate(&self, depth: usize) -> Self {
        Self(self.0.iter().take(depth).copied().collect())
    }
}

impl fmt::Display for PartPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in &self.0 {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{index}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for PartPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Vec<usize>> for PartPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for PartPath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl FromIterator<usize> for PartPath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One entry of a breadcrumb trail: the node's name plus the path prefix
/// that jumps back to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crumb {
    /// Display name of the node at this prefix.
    pub name: String,
    /// Path addressing the node (truncate the navigation stack to this to
    /// jump back).
    pub prefix: PartPath,
}

/// Shop-facing deep link for a product, optionally into a part.
///
/// `/shop/product/<id>` for the root path, else
/// `/shop/product/<id>/part/<comma-joined path>`.
pub fn shop_link(product_id: &str, path: &PartPath) -> String {
    if path.is_root() {
        format!("/shop/product/{product_id}")
    } else {
        format!("/shop/product/{product_id}/part/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_round_trip() {
        let path = PartPath::from([0, 2, 1]);
        assert_eq!(path.to_string(), "0,2,1");
        assert_eq!(PartPath::parse("0,2,1"), path);
    }

    #[test]
    fn parse_filters_garbage_tokens() {
        assert_eq!(PartPath::parse("0,x,2,"), PartPath::from([0, 2]));
        assert_eq!(PartPath::parse(""), PartPath::root());
        assert_eq!(PartPath::parse("-1,3"), PartPath::from([3]));
        assert_eq!(PartPath::parse(" 1 , 2 "), PartPath::from([1, 2]));
    }

    #[test]
    fn root_path_is_empty_string() {
        assert_eq!(PartPath::root().to_string(), "");
        assert!(PartPath::parse("").is_root());
    }

    #[test]
    fn child_and_parent() {
        let path = PartPath::root().child(0).child(2);
        assert_eq!(path, PartPath::from([0, 2]));
        assert_eq!(path.parent(), Some(PartPath::from([0])));
        assert_eq!(PartPath::root().parent(), None);
        assert_eq!(path.last(), Some(2));
    }

    #[test]
    fn truncate_jumps_to_ancestor() {
        let path = PartPath::from([3, 1, 4, 1]);
        assert_eq!(path.truncate(2), PartPath::from([3, 1]));
        assert_eq!(path.truncate(0), PartPath::root());
        assert_eq!(path.truncate(9), path);
    }

    #[test]
    fn deep_links() {
        assert_eq!(
            shop_link("64f0a1", &PartPath::from([0, 2, 1])),
            "/shop/product/64f0a1/part/0,2,1"
        );
        assert_eq!(shop_link("64f0a1", &PartPath::root()), "/shop/product/64f0a1");
    }

    proptest! {
        #[test]
        fn string_round_trip_preserves_indices(indices in proptest::collection::vec(0usize..1000, 0..8)) {
            let path = PartPath::new(indices.clone());
            let reparsed = PartPath::parse(&path.to_string());
            prop_assert_eq!(reparsed.indices(), indices.as_slice());
        }
    }
}
