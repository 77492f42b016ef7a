// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

use crate::config::SplitPolicy;

/// Result type alias using the crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by geometry and tree operations.
///
/// All of these are reported before any mutation happens, so a rejected call
/// leaves the tree untouched. A box that is absent from the tree on removal is
/// not an error; see [`RTree::remove`](crate::RTree::remove).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument or configuration value is outside its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Two boxes, or a box and the tree, disagree on dimension.
    ///
    /// This is the dimension case of an invalid argument; it gets its own
    /// variant so callers can read both dimensions.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the receiver (tree or left-hand box).
        expected: usize,
        /// Dimension of the offending argument.
        actual: usize,
    },

    /// The configured split policy is declared but not implemented.
    #[error("split policy {0:?} is not supported")]
    UnsupportedPolicy(SplitPolicy),

    /// An accessor was given a position past the node's entry count.
    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of entries available.
        len: usize,
    },
}
