// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The R-tree: insertion with quadratic splits and upward adjustment, exact-match
//! removal with condensation and reinsertion.
//!
//! Nodes live in an arena and refer to their parent by index. Descent records
//! the slot taken at every index node in an explicit path, and every structural
//! change below is propagated back through that path, so each index entry's box
//! equals the union of its child's entries once an operation returns.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::config::{RTreeConfig, SplitPolicy};
use crate::error::{Error, Result};
use crate::node::{Child, Entries, Node, NodeIdx};
use crate::split::split_overflow;
use crate::types::{Aabb, area_increment, encloses, overlap_area};
use crate::view::NodeRef;

/// One descent step: the index node visited and the slot taken there.
#[derive(Copy, Clone, Debug)]
struct PathStep {
    node: NodeIdx,
    slot: usize,
}

/// Rule for picking the child an insertion descends into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ChooseSubtree {
    /// Least area enlargement, then smallest area.
    LeastEnlargement,
    /// Least summed overlap with the child's entries, then least enlargement,
    /// then smallest area.
    LeastOverlap,
}

impl ChooseSubtree {
    fn for_level(policy: SplitPolicy, level: usize) -> Self {
        match policy {
            SplitPolicy::RStar if level == 1 => Self::LeastOverlap,
            _ => Self::LeastEnlargement,
        }
    }
}

/// An n-dimensional R-tree over [`Aabb`]s.
///
/// Every non-root node holds between [`RTree::min_entries`] and the configured
/// capacity entries. Duplicate boxes are allowed; each insertion stores one
/// entry and each removal deletes one.
pub struct RTree {
    config: RTreeConfig,
    min_entries: usize,
    root: NodeIdx,
    arena: Vec<Option<Node>>,
    free_list: Vec<usize>,
    len: usize,
}

impl Default for RTree {
    fn default() -> Self {
        Self::from_valid_config(RTreeConfig::default())
    }
}

impl RTree {
    /// Create an empty tree.
    ///
    /// Fails with [`Error::InvalidArgument`] if the configuration does not
    /// validate, and with [`Error::UnsupportedPolicy`] for any split policy but
    /// [`SplitPolicy::Quadratic`].
    pub fn new(config: RTreeConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            log::debug!("rejected R-tree config {config:?}: {err}");
            return Err(err);
        }
        if !config.split_policy.is_supported() {
            log::debug!("rejected R-tree split policy {:?}", config.split_policy);
            return Err(Error::UnsupportedPolicy(config.split_policy));
        }
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: RTreeConfig) -> Self {
        let min_entries = config.min_entries();
        Self {
            config,
            min_entries,
            root: NodeIdx::new(0),
            arena: vec![Some(Node::leaf(None, Vec::new()))],
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// The configuration this tree was built with.
    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// Minimum entries per non-root node.
    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    /// Number of stored boxes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores no boxes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; a lone root leaf has height 1.
    pub fn height(&self) -> usize {
        self.node(self.root).level + 1
    }

    /// Read-only view of the root node.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, self.root)
    }

    /// Iterate over every stored box, leaf by leaf.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: vec![self.root],
            current: [].iter(),
        }
    }

    /// Remove every box, leaving a single empty root leaf.
    pub fn clear(&mut self) {
        self.root = NodeIdx::new(0);
        self.arena.clear();
        self.arena.push(Some(Node::leaf(None, Vec::new())));
        self.free_list.clear();
        self.len = 0;
    }

    /// Insert a box.
    ///
    /// Fails with [`Error::DimensionMismatch`] if the box does not have the
    /// tree's dimension; the tree is left untouched in that case.
    pub fn insert(&mut self, aabb: Aabb) -> Result<()> {
        self.check_dimension(&aabb)?;
        self.insert_entry(aabb);
        self.len += 1;
        Ok(())
    }

    /// Remove one box exactly equal to `aabb`.
    ///
    /// Returns the slot the box occupied in its leaf, or `Ok(None)` if no equal
    /// box is stored.
    pub fn remove(&mut self, aabb: &Aabb) -> Result<Option<usize>> {
        self.check_dimension(aabb)?;
        let mut path = Vec::with_capacity(self.height());
        let Some((leaf, slot)) = self.find_leaf(self.root, aabb, &mut path) else {
            return Ok(None);
        };
        match &mut self.node_mut(leaf).entries {
            Entries::Leaf(boxes) => {
                boxes.remove(slot);
            }
            Entries::Index(_) => unreachable!("find_leaf ends at a leaf"),
        }
        self.len -= 1;
        let orphans = self.condense_tree(leaf, &path);
        self.reinsert(orphans);
        Ok(Some(slot))
    }

    /// Whether a box exactly equal to `aabb` is stored.
    pub fn contains(&self, aabb: &Aabb) -> Result<bool> {
        self.check_dimension(aabb)?;
        Ok(self.find_leaf(self.root, aabb, &mut Vec::new()).is_some())
    }

    fn check_dimension(&self, aabb: &Aabb) -> Result<()> {
        if aabb.dimension() == self.config.dimension {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.config.dimension,
                actual: aabb.dimension(),
            })
        }
    }

    pub(crate) fn node(&self, idx: NodeIdx) -> &Node {
        self.arena[idx.get()].as_ref().expect("dangling node index")
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node {
        self.arena[idx.get()].as_mut().expect("dangling node index")
    }

    fn alloc(&mut self, node: Node) -> NodeIdx {
        if let Some(i) = self.free_list.pop() {
            self.arena[i] = Some(node);
            NodeIdx::new(i)
        } else {
            self.arena.push(Some(node));
            NodeIdx::new(self.arena.len() - 1)
        }
    }

    fn free(&mut self, idx: NodeIdx) -> Node {
        let node = self.arena[idx.get()].take().expect("dangling node index");
        self.free_list.push(idx.get());
        node
    }

    /// Summary box of a node that is known to be non-empty.
    fn summary(&self, idx: NodeIdx) -> Aabb {
        self.node(idx)
            .bbox()
            .expect("only an empty root leaf has no summary box")
    }

    fn insert_entry(&mut self, aabb: Aabb) {
        let (leaf, path) = self.choose_leaf(&aabb);
        let sibling = self.insert_into_leaf(leaf, aabb);
        self.adjust_tree(&path, leaf, sibling);
    }

    /// Descend from the root to the leaf that should receive `aabb`.
    fn choose_leaf(&self, aabb: &Aabb) -> (NodeIdx, Vec<PathStep>) {
        let mut path = Vec::with_capacity(self.height());
        let mut idx = self.root;
        loop {
            let node = self.node(idx);
            let Entries::Index(children) = &node.entries else {
                return (idx, path);
            };
            let slot = match ChooseSubtree::for_level(self.config.split_policy, node.level) {
                ChooseSubtree::LeastEnlargement => least_enlargement(children, aabb),
                ChooseSubtree::LeastOverlap => self.least_overlap(children, aabb),
            };
            path.push(PathStep { node: idx, slot });
            idx = children[slot].node;
        }
    }

    fn least_overlap(&self, children: &[Child], aabb: &Aabb) -> usize {
        let mut best = 0;
        let mut best_key = (f64::INFINITY, f64::INFINITY, f64::INFINITY);
        for (i, child) in children.iter().enumerate() {
            let node = self.node(child.node);
            let overlap: f64 = (0..node.len())
                .filter_map(|slot| node.entry_bbox(slot))
                .map(|entry| overlap_area(entry, aabb))
                .sum();
            let key = (
                overlap,
                area_increment(&child.bbox, aabb),
                child.bbox.area(),
            );
            if key < best_key {
                best_key = key;
                best = i;
            }
        }
        best
    }

    /// Append `aabb` to `leaf`, splitting it if full. Returns the new sibling.
    fn insert_into_leaf(&mut self, leaf: NodeIdx, aabb: Aabb) -> Option<NodeIdx> {
        let capacity = self.config.capacity;
        let min_entries = self.min_entries;
        let node = self.node_mut(leaf);
        let parent = node.parent;
        let Entries::Leaf(boxes) = &mut node.entries else {
            unreachable!("choose_leaf ends at a leaf");
        };
        if boxes.len() < capacity {
            boxes.push(aabb);
            return None;
        }
        let full = core::mem::take(boxes);
        let (a, b) = split_overflow(full, aabb, min_entries, |b| b);
        log::trace!("split leaf into {} + {} entries", a.len(), b.len());
        *boxes = a;
        Some(self.alloc(Node::leaf(parent, b)))
    }

    /// Add `child` to the index node `parent`, splitting it if full. Returns the
    /// new sibling of `parent`.
    fn insert_into_index(&mut self, parent: NodeIdx, child: NodeIdx) -> Option<NodeIdx> {
        let capacity = self.config.capacity;
        let min_entries = self.min_entries;
        let entry = Child {
            bbox: self.summary(child),
            node: child,
        };
        self.node_mut(child).parent = Some(parent);

        let node = self.node_mut(parent);
        let (level, grandparent) = (node.level, node.parent);
        let Entries::Index(children) = &mut node.entries else {
            unreachable!("siblings are only added to index nodes");
        };
        if children.len() < capacity {
            children.push(entry);
            return None;
        }
        let full = core::mem::take(children);
        let (a, b) = split_overflow(full, entry, min_entries, |c| &c.bbox);
        log::trace!(
            "split index node at level {level} into {} + {} children",
            a.len(),
            b.len()
        );
        let moved: Vec<NodeIdx> = b.iter().map(|c| c.node).collect();
        *children = a;
        let sibling = self.alloc(Node::index(level, grandparent, b));
        for idx in moved {
            self.node_mut(idx).parent = Some(sibling);
        }
        Some(sibling)
    }

    /// Propagate a change at `node` (and an optional split `sibling`) up the
    /// descent `path`, growing a new root if the old one split.
    fn adjust_tree(&mut self, path: &[PathStep], mut node: NodeIdx, mut sibling: Option<NodeIdx>) {
        for step in path.iter().rev() {
            let parent = step.node;
            let entry = Child {
                bbox: self.summary(node),
                node,
            };
            match &mut self.node_mut(parent).entries {
                Entries::Index(children) => children[step.slot] = entry,
                Entries::Leaf(_) => unreachable!("descent paths hold index nodes"),
            }
            self.node_mut(node).parent = Some(parent);
            sibling = sibling.and_then(|s| self.insert_into_index(parent, s));
            node = parent;
        }
        if let Some(sibling) = sibling {
            self.grow_root(node, sibling);
        }
    }

    fn grow_root(&mut self, left: NodeIdx, right: NodeIdx) {
        debug_assert_eq!(left, self.root, "only the root grows a new parent");
        let level = self.node(left).level + 1;
        let children = vec![
            Child {
                bbox: self.summary(left),
                node: left,
            },
            Child {
                bbox: self.summary(right),
                node: right,
            },
        ];
        let root = self.alloc(Node::index(level, None, children));
        self.node_mut(left).parent = Some(root);
        self.node_mut(right).parent = Some(root);
        self.root = root;
        log::debug!("root split; height is now {}", level + 1);
    }

    /// Depth-first search for the leaf holding a box equal to `target`.
    ///
    /// Only subtrees whose summary encloses `target` are explored; on success
    /// `path` holds the slots taken from the root down to the leaf.
    fn find_leaf(
        &self,
        idx: NodeIdx,
        target: &Aabb,
        path: &mut Vec<PathStep>,
    ) -> Option<(NodeIdx, usize)> {
        match &self.node(idx).entries {
            Entries::Leaf(boxes) => boxes
                .iter()
                .position(|b| b == target)
                .map(|slot| (idx, slot)),
            Entries::Index(children) => {
                for (slot, child) in children.iter().enumerate() {
                    if !encloses(&child.bbox, target) {
                        continue;
                    }
                    path.push(PathStep { node: idx, slot });
                    if let Some(found) = self.find_leaf(child.node, target, path) {
                        return Some(found);
                    }
                    path.pop();
                }
                None
            }
        }
    }

    /// Walk from `leaf` to the root along `path`, detaching under-filled nodes
    /// and refreshing the summaries of the rest. Returns the detached nodes.
    fn condense_tree(&mut self, leaf: NodeIdx, path: &[PathStep]) -> Vec<NodeIdx> {
        let mut orphans = Vec::new();
        let mut node = leaf;
        for step in path.iter().rev() {
            let parent = step.node;
            debug_assert_eq!(self.node(node).parent, Some(parent), "stale parent link");
            if self.node(node).len() < self.min_entries {
                match &mut self.node_mut(parent).entries {
                    Entries::Index(children) => {
                        children.remove(step.slot);
                    }
                    Entries::Leaf(_) => unreachable!("descent paths hold index nodes"),
                }
                self.node_mut(node).parent = None;
                orphans.push(node);
            } else {
                let bbox = self.summary(node);
                match &mut self.node_mut(parent).entries {
                    Entries::Index(children) => children[step.slot].bbox = bbox,
                    Entries::Leaf(_) => unreachable!("descent paths hold index nodes"),
                }
            }
            node = parent;
        }
        self.collapse_root();
        orphans
    }

    /// Replace an index root that has a single child with that child.
    fn collapse_root(&mut self) {
        loop {
            let child = match &self.node(self.root).entries {
                Entries::Index(children) if children.len() == 1 => children[0].node,
                _ => break,
            };
            self.free(self.root);
            self.node_mut(child).parent = None;
            self.root = child;
            log::debug!("root collapsed; height is now {}", self.height());
        }
    }

    /// Tear down detached subtrees and insert their leaf entries one by one.
    fn reinsert(&mut self, orphans: Vec<NodeIdx>) {
        if orphans.is_empty() {
            return;
        }
        let detached = orphans.len();
        let mut boxes = Vec::new();
        for orphan in orphans {
            self.drain_subtree(orphan, &mut boxes);
        }
        log::trace!(
            "condensed {detached} node(s); reinserting {} entries",
            boxes.len()
        );
        for aabb in boxes {
            self.insert_entry(aabb);
        }
    }

    /// Free every node under `root` (inclusive), collecting leaf entries in
    /// left-to-right order.
    fn drain_subtree(&mut self, root: NodeIdx, out: &mut Vec<Aabb>) {
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            match self.free(idx).entries {
                Entries::Leaf(boxes) => out.extend(boxes),
                Entries::Index(children) => {
                    stack.extend(children.into_iter().rev().map(|c| c.node));
                }
            }
        }
    }
}

fn least_enlargement(children: &[Child], aabb: &Aabb) -> usize {
    let mut best = 0;
    let mut best_key = (f64::INFINITY, f64::INFINITY);
    for (i, child) in children.iter().enumerate() {
        let key = (area_increment(&child.bbox, aabb), child.bbox.area());
        if key < best_key {
            best_key = key;
            best = i;
        }
    }
    best
}

impl Debug for RTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.arena.iter().filter(|n| n.is_some()).count();
        f.debug_struct("RTree")
            .field("capacity", &self.config.capacity)
            .field("min_entries", &self.min_entries)
            .field("dimension", &self.config.dimension)
            .field("len", &self.len)
            .field("height", &self.height())
            .field("arena_nodes", &alive)
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a RTree {
    type Item = &'a Aabb;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the boxes of an [`RTree`], created by [`RTree::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    tree: &'a RTree,
    stack: Vec<NodeIdx>,
    current: core::slice::Iter<'a, Aabb>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Aabb;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(aabb) = self.current.next() {
                return Some(aabb);
            }
            let idx = self.stack.pop()?;
            match &self.tree.node(idx).entries {
                Entries::Leaf(boxes) => self.current = boxes.iter(),
                Entries::Index(children) => {
                    self.stack.extend(children.iter().rev().map(|c| c.node));
                }
            }
        }
    }
}
