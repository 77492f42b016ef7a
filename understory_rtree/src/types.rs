// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.
//!
//! Boxes are axis-aligned and n-dimensional. Every operation that combines two
//! boxes requires them to share a dimension; the public methods check this and
//! return [`Error::DimensionMismatch`], while the crate-internal helpers assume
//! the tree has already validated its inputs.

use core::cmp::Ordering;
use core::fmt;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Inline storage for coordinates; 2D and 3D points never touch the heap.
pub(crate) type Coords = SmallVec<[f64; 3]>;

/// An immutable point in n-dimensional space (`n >= 2`).
///
/// Equality is component-wise.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    coords: Coords,
}

impl Point {
    /// Create a point from its coordinates.
    ///
    /// Fails with [`Error::InvalidArgument`] if fewer than two coordinates are given.
    pub fn new(coords: &[f64]) -> Result<Self> {
        if coords.len() < 2 {
            return Err(Error::InvalidArgument("a point needs at least two coordinates"));
        }
        Ok(Self {
            coords: Coords::from_slice(coords),
        })
    }

    /// Number of coordinates.
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// Coordinate on axis `axis` (zero-based).
    pub fn coord(&self, axis: usize) -> Result<f64> {
        self.coords
            .get(axis)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index: axis,
                len: self.coords.len(),
            })
    }

    /// All coordinates, in axis order.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str(")")
    }
}

/// Axis-aligned bounding box in n dimensions.
///
/// Callers are expected to pass `min[i] <= max[i]` on every axis; construction
/// does not enforce it (see [`Aabb::is_well_formed`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    min: Point,
    max: Point,
}

impl Aabb {
    /// Create a box from its low and high corners.
    pub fn new(min: Point, max: Point) -> Result<Self> {
        if min.dimension() != max.dimension() {
            return Err(Error::DimensionMismatch {
                expected: min.dimension(),
                actual: max.dimension(),
            });
        }
        Ok(Self { min, max })
    }

    /// Create a box from raw corner coordinates.
    pub fn from_corners(min: &[f64], max: &[f64]) -> Result<Self> {
        Self::new(Point::new(min)?, Point::new(max)?)
    }

    /// The low corner.
    pub fn min(&self) -> &Point {
        &self.min
    }

    /// The high corner.
    pub fn max(&self) -> &Point {
        &self.max
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        self.min.dimension()
    }

    /// Whether `min <= max` holds on every axis. Assumes no NaN.
    pub fn is_well_formed(&self) -> bool {
        self.axes().all(|(lo, hi)| le(lo, hi))
    }

    /// Product of the per-axis extents. Zero-extent boxes have zero area.
    pub fn area(&self) -> f64 {
        self.axes().map(|(lo, hi)| hi - lo).product()
    }

    /// The smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.check_dimension(other)?;
        Ok(union_aabb(self, other))
    }

    /// Whether the two boxes overlap (touching boundaries count).
    pub fn intersects(&self, other: &Self) -> Result<bool> {
        self.check_dimension(other)?;
        Ok(intersects(self, other))
    }

    /// Area (volume) of the overlapping region, `0.0` when disjoint.
    pub fn intersection_area(&self, other: &Self) -> Result<f64> {
        self.check_dimension(other)?;
        Ok(overlap_area(self, other))
    }

    /// Whether `other` fits entirely inside `self` (boundaries inclusive).
    pub fn encloses(&self, other: &Self) -> Result<bool> {
        self.check_dimension(other)?;
        Ok(encloses(self, other))
    }

    fn check_dimension(&self, other: &Self) -> Result<()> {
        if self.dimension() == other.dimension() {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            })
        }
    }

    fn axes(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.min
            .coords
            .iter()
            .copied()
            .zip(self.max.coords.iter().copied())
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.min, self.max)
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

// The helpers below assume equal dimensions; the tree checks this at its boundary.

pub(crate) fn union_aabb(a: &Aabb, b: &Aabb) -> Aabb {
    debug_assert_eq!(a.dimension(), b.dimension(), "union of mismatched boxes");
    let min = a
        .min
        .coords
        .iter()
        .zip(&b.min.coords)
        .map(|(&x, &y)| min_t(x, y))
        .collect();
    let max = a
        .max
        .coords
        .iter()
        .zip(&b.max.coords)
        .map(|(&x, &y)| max_t(x, y))
        .collect();
    Aabb {
        min: Point { coords: min },
        max: Point { coords: max },
    }
}

pub(crate) fn intersects(a: &Aabb, b: &Aabb) -> bool {
    a.axes()
        .zip(b.axes())
        .all(|((alo, ahi), (blo, bhi))| !(lt(ahi, blo) || lt(bhi, alo)))
}

pub(crate) fn overlap_area(a: &Aabb, b: &Aabb) -> f64 {
    if !intersects(a, b) {
        return 0.0;
    }
    a.axes()
        .zip(b.axes())
        .map(|((alo, ahi), (blo, bhi))| max_t(min_t(ahi, bhi) - max_t(alo, blo), 0.0))
        .product()
}

pub(crate) fn encloses(outer: &Aabb, inner: &Aabb) -> bool {
    outer
        .axes()
        .zip(inner.axes())
        .all(|((olo, ohi), (ilo, ihi))| le(olo, ilo) && le(ihi, ohi))
}

/// Growth in area when `added` is merged into `origin`.
pub(crate) fn area_increment(origin: &Aabb, added: &Aabb) -> f64 {
    union_aabb(origin, added).area() - origin.area()
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self {
            coords: Coords::from_slice(&[p.x, p.y]),
        }
    }
}

/// Corners are normalized, so a rect with negative width still yields a well-formed box.
#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Aabb {
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        Self {
            min: Point::from(kurbo::Point::new(r.x0, r.y0)),
            max: Point::from(kurbo::Point::new(r.x1, r.y1)),
        }
    }
}

#[cfg(feature = "kurbo")]
impl TryFrom<&Aabb> for kurbo::Rect {
    type Error = Error;

    fn try_from(b: &Aabb) -> Result<Self> {
        match (b.min.coords(), b.max.coords()) {
            (&[x0, y0], &[x1, y1]) => Ok(Self::new(x0, y0, x1, y1)),
            _ => Err(Error::DimensionMismatch {
                expected: 2,
                actual: b.dimension(),
            }),
        }
    }
}
