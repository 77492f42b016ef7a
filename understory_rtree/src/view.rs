// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only access to tree structure, for printers, debuggers, and tests.

use core::fmt::Debug;

use crate::error::{Error, Result};
use crate::node::{Entries, Node, NodeIdx};
use crate::tree::RTree;
use crate::types::Aabb;

/// A borrowed handle to one node of an [`RTree`].
///
/// Obtained from [`RTree::root`] and navigated with [`NodeRef::child`] and
/// [`NodeRef::parent`]. It cannot outlive the tree or observe a mutation.
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    tree: &'a RTree,
    pub(crate) idx: NodeIdx,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a RTree, idx: NodeIdx) -> Self {
        Self { tree, idx }
    }

    fn node(self) -> &'a Node {
        self.tree.node(self.idx)
    }

    /// Whether this node stores data boxes rather than children.
    pub fn is_leaf(self) -> bool {
        self.node().is_leaf()
    }

    /// Whether this is the tree's root.
    pub fn is_root(self) -> bool {
        self.node().parent.is_none()
    }

    /// Height above the leaves: 0 for leaves.
    pub fn level(self) -> usize {
        self.node().level
    }

    /// Number of entries (data boxes or children).
    pub fn len(self) -> usize {
        self.node().len()
    }

    /// Whether the node has no entries. Only an empty root leaf does.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Union of the node's entries, `None` when empty.
    pub fn bbox(self) -> Option<Aabb> {
        self.node().bbox()
    }

    /// Box of entry `i`: a data box in a leaf, a child summary otherwise.
    pub fn entry(self, i: usize) -> Result<Aabb> {
        self.node()
            .entry_bbox(i)
            .cloned()
            .ok_or(Error::IndexOutOfRange {
                index: i,
                len: self.len(),
            })
    }

    /// Every entry box, in slot order.
    pub fn entries(self) -> impl Iterator<Item = &'a Aabb> + 'a {
        let node = self.node();
        (0..node.len()).filter_map(move |i| node.entry_bbox(i))
    }

    /// Number of children; 0 for leaves.
    pub fn child_count(self) -> usize {
        match &self.node().entries {
            Entries::Leaf(_) => 0,
            Entries::Index(children) => children.len(),
        }
    }

    /// Child `i` of an index node.
    pub fn child(self, i: usize) -> Result<Self> {
        match &self.node().entries {
            Entries::Index(children) if i < children.len() => {
                Ok(Self::new(self.tree, children[i].node))
            }
            _ => Err(Error::IndexOutOfRange {
                index: i,
                len: self.child_count(),
            }),
        }
    }

    /// Children in slot order; empty for leaves.
    pub fn children(self) -> impl Iterator<Item = Self> + 'a {
        let tree = self.tree;
        let children = match &self.node().entries {
            Entries::Leaf(_) => &[][..],
            Entries::Index(children) => children.as_slice(),
        };
        children.iter().map(move |c| Self::new(tree, c.node))
    }

    /// The enclosing index node, `None` at the root.
    pub fn parent(self) -> Option<Self> {
        self.node().parent.map(|p| Self::new(self.tree, p))
    }
}

impl Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("level", &self.level())
            .field("leaf", &self.is_leaf())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
