// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-allocated tree nodes.

use alloc::vec::Vec;

use crate::types::{Aabb, union_aabb};

/// Stable handle to a node slot in the tree arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

/// An index-node entry: a child's summary box paired with the child itself.
#[derive(Clone, Debug)]
pub(crate) struct Child {
    pub(crate) bbox: Aabb,
    pub(crate) node: NodeIdx,
}

/// Node payload, by kind.
#[derive(Clone, Debug)]
pub(crate) enum Entries {
    /// Data boxes stored directly.
    Leaf(Vec<Aabb>),
    /// Children, in slot order.
    Index(Vec<Child>),
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// 0 for leaves, increasing toward the root.
    pub(crate) level: usize,
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) entries: Entries,
}

impl Node {
    pub(crate) fn leaf(parent: Option<NodeIdx>, boxes: Vec<Aabb>) -> Self {
        Self {
            level: 0,
            parent,
            entries: Entries::Leaf(boxes),
        }
    }

    pub(crate) fn index(level: usize, parent: Option<NodeIdx>, children: Vec<Child>) -> Self {
        debug_assert!(level > 0, "index nodes live above the leaves");
        Self {
            level,
            parent,
            entries: Entries::Index(children),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.entries, Entries::Leaf(_))
    }

    /// Number of entries.
    pub(crate) fn len(&self) -> usize {
        match &self.entries {
            Entries::Leaf(boxes) => boxes.len(),
            Entries::Index(children) => children.len(),
        }
    }

    /// Box of entry `slot`: a data box or a child summary box.
    pub(crate) fn entry_bbox(&self, slot: usize) -> Option<&Aabb> {
        match &self.entries {
            Entries::Leaf(boxes) => boxes.get(slot),
            Entries::Index(children) => children.get(slot).map(|c| &c.bbox),
        }
    }

    /// Union of all entry boxes, `None` when the node is empty.
    pub(crate) fn bbox(&self) -> Option<Aabb> {
        match &self.entries {
            Entries::Leaf(boxes) => fold_union(boxes.iter()),
            Entries::Index(children) => fold_union(children.iter().map(|c| &c.bbox)),
        }
    }
}

fn fold_union<'a>(mut boxes: impl Iterator<Item = &'a Aabb>) -> Option<Aabb> {
    let first = boxes.next()?.clone();
    Some(boxes.fold(first, |acc, b| union_aabb(&acc, b)))
}
