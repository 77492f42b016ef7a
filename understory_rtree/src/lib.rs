// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory R-tree: an n-dimensional R-tree over axis-aligned boxes.
//!
//! - Insert boxes of a fixed dimension; overflowing nodes split with Guttman's
//!   quadratic algorithm and the tree grows at the root.
//! - Remove a box by exact equality; under-filled nodes are detached and their
//!   entries reinserted, and a root left with one child is collapsed.
//! - Inspect the structure read-only through [`NodeRef`].
//!
//! Every non-root node holds between [`RTree::min_entries`] and the configured
//! capacity entries, all leaves sit at the same depth, and each index entry's box
//! is exactly the union of the child it points to.
//!
//! # Example
//!
//! ```rust
//! use understory_rtree::{Aabb, RTree, RTreeConfig};
//!
//! let config = RTreeConfig::default().with_capacity(3);
//! let mut tree = RTree::new(config).unwrap();
//! for x in 0..10_u8 {
//!     let x = f64::from(x) * 10.0;
//!     tree.insert(Aabb::from_corners(&[x, 0.0], &[x + 5.0, 5.0]).unwrap())
//!         .unwrap();
//! }
//! assert_eq!(tree.len(), 10);
//! assert!(tree.height() > 1);
//!
//! let target = Aabb::from_corners(&[30.0, 0.0], &[35.0, 5.0]).unwrap();
//! assert!(tree.remove(&target).unwrap().is_some());
//! assert!(!tree.contains(&target).unwrap());
//!
//! // Removing a box that is not stored is not an error.
//! assert_eq!(tree.remove(&target).unwrap(), None);
//! ```
//!
//! Walking the structure:
//!
//! ```rust
//! use understory_rtree::{Aabb, RTree};
//!
//! let mut tree = RTree::default();
//! tree.insert(Aabb::from_corners(&[0.0, 0.0], &[1.0, 1.0]).unwrap()).unwrap();
//! let root = tree.root();
//! assert!(root.is_leaf());
//! assert_eq!(root.len(), 1);
//! assert_eq!(root.entry(0).unwrap().area(), 1.0);
//! ```
//!
//! ## Split policies
//!
//! [`SplitPolicy`] names the linear, quadratic, exponential, and R* strategies,
//! but only [`SplitPolicy::Quadratic`] is implemented. [`RTree::new`] rejects the
//! others with [`Error::UnsupportedPolicy`].
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs in coordinates. Boxes are expected to satisfy
//! `min <= max` on every axis; see [`Aabb::is_well_formed`].
//!
//! ## Features
//!
//! - `kurbo`: conversions between Kurbo's `Point`/`Rect` and [`Point`]/[`Aabb`].
//!   Enable `std` or `libm` alongside it.

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
mod node;
mod split;
pub mod tree;
pub mod types;
pub mod view;

pub use config::{RTreeConfig, SplitPolicy};
pub use error::{Error, Result};
pub use tree::{Iter, RTree};
pub use types::{Aabb, Point};
pub use view::NodeRef;
