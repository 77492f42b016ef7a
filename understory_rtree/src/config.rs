// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree configuration: node capacity, fill factor, dimension, and split policy.

use crate::error::{Error, Result};

/// Strategy used to split an overflowing node and to pick a descent path.
///
/// Only [`SplitPolicy::Quadratic`] is implemented. The others are declared so
/// callers can name them, and [`RTree::new`](crate::RTree::new) rejects them
/// with [`Error::UnsupportedPolicy`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SplitPolicy {
    /// Guttman's linear-cost split.
    Linear,
    /// Guttman's quadratic-cost split.
    #[default]
    Quadratic,
    /// Exhaustive split over every partition.
    Exponential,
    /// R*-tree style: overlap-minimizing descent directly above the leaves.
    RStar,
}

impl SplitPolicy {
    /// Whether this policy has a working split implementation.
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Quadratic)
    }
}

/// Fixed parameters of an [`RTree`](crate::RTree).
#[derive(Clone, Debug, PartialEq)]
pub struct RTreeConfig {
    /// Maximum entries per node (`C`).
    ///
    /// The effective lower bound is 3: a split of `C + 1` entries must give two
    /// groups of at least [`min_entries`](Self::min_entries), which is never
    /// below 2, so [`validate`](Self::validate) rejects a capacity of 2.
    pub capacity: usize,
    /// Fraction of `capacity` that every non-root node must hold, in `(0, 0.5]`.
    pub fill_factor: f64,
    /// Number of axes of every stored box.
    pub dimension: usize,
    /// Split and descent strategy.
    pub split_policy: SplitPolicy,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            fill_factor: 0.4,
            dimension: 2,
            split_policy: SplitPolicy::Quadratic,
        }
    }
}

impl RTreeConfig {
    /// Set the node capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the fill factor.
    pub fn with_fill_factor(mut self, fill_factor: f64) -> Self {
        self.fill_factor = fill_factor;
        self
    }

    /// Set the dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the split policy.
    pub fn with_split_policy(mut self, split_policy: SplitPolicy) -> Self {
        self.split_policy = split_policy;
        self
    }

    /// Minimum entries per non-root node: `max(2, round(capacity * fill_factor))`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The product is a small positive entry count; rounding half up is intended."
    )]
    pub fn min_entries(&self) -> usize {
        let scaled = (self.capacity as f64 * self.fill_factor + 0.5) as usize;
        scaled.max(2)
    }

    /// Check that the parameters describe a tree whose fill invariant can hold.
    ///
    /// The split policy is not checked here; see [`RTree::new`](crate::RTree::new).
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 2 {
            return Err(Error::InvalidArgument("capacity must be at least 2"));
        }
        if !(self.fill_factor > 0.0 && self.fill_factor <= 0.5) {
            return Err(Error::InvalidArgument("fill factor must be in (0, 0.5]"));
        }
        if self.dimension < 2 {
            return Err(Error::InvalidArgument("dimension must be at least 2"));
        }
        // Splitting `capacity + 1` entries must leave both halves at the minimum.
        if self.min_entries() > self.capacity.div_ceil(2) {
            return Err(Error::InvalidArgument(
                "capacity too small for the minimum fill of two split halves",
            ));
        }
        Ok(())
    }
}
