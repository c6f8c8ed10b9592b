// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction and axis-aligned rectangle arithmetic.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Numeric scalar abstraction for rectangle coordinates.
///
/// Only the operations needed by the tree are required: constants used to
/// build the degenerate rectangle, and a widening conversion to `f64` used by
/// the cost heuristic. Coordinates are assumed to be NaN-free.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// One value for the scalar type.
    fn one() -> Self;

    /// Convert a scalar to `f64` for cost computations.
    fn widen(v: Self) -> f64;
}

impl Scalar for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        f64::from(v)
    }
}

impl Scalar for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        v
    }
}

impl Scalar for i32 {
    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        1
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        f64::from(v)
    }
}

impl Scalar for i64 {
    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        1
    }

    #[inline]
    #[allow(
        clippy::cast_precision_loss,
        reason = "The cost heuristic only ranks candidates; rounding very large coordinates is harmless."
    )]
    fn widen(v: Self) -> f64 {
        v as f64
    }
}

/// Axis-aligned rectangle (box) in `D` dimensions.
///
/// A rectangle whose first axis is inverted (`min[0] > max[0]`) is
/// *degenerate*: it represents "nothing". Rectangles stored as keys are always
/// valid (`min[i] <= max[i]` on every axis).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect<T, const D: usize> {
    /// Minimum corner.
    pub min: [T; D],
    /// Maximum corner.
    pub max: [T; D],
}

impl<T, const D: usize> Rect<T, D> {
    /// Create a new rectangle from min/max corners.
    pub const fn new(min: [T; D], max: [T; D]) -> Self {
        const { assert!(D > 0, "rectangles need at least one dimension") };
        Self { min, max }
    }
}

impl<T: Scalar, const D: usize> Rect<T, D> {
    /// Volume of the unit ball in `D` dimensions, used by [`Rect::cost`].
    const UNIT_BALL_VOLUME: f64 = unit_ball_volume(D);

    /// A zero-extent rectangle at `p`.
    pub fn point(p: [T; D]) -> Self {
        Self::new(p, p)
    }

    /// The degenerate ("undefined") rectangle: the identity for [`Rect::union`].
    pub fn degenerate() -> Self {
        Self::new([T::one(); D], [T::zero(); D])
    }

    /// True if this rectangle represents nothing (`min[0] > max[0]`).
    pub fn is_degenerate(&self) -> bool {
        lt(self.max[0], self.min[0])
    }

    /// True if `min[i] <= max[i]` on every axis.
    pub fn is_valid(&self) -> bool {
        (0..D).all(|i| le(self.min[i], self.max[i]))
    }

    /// Smallest rectangle covering both. A degenerate operand yields the other unchanged.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_degenerate() {
            return *other;
        }
        if other.is_degenerate() {
            return *self;
        }
        let mut out = *self;
        for i in 0..D {
            out.min[i] = min_t(self.min[i], other.min[i]);
            out.max[i] = max_t(self.max[i], other.max[i]);
        }
        out
    }

    /// True if the rectangles intersect or touch on every axis.
    ///
    /// A degenerate rectangle overlaps nothing.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        (0..D).all(|i| le(self.min[i], other.max[i]) && le(other.min[i], self.max[i]))
    }

    /// Whether this rectangle contains the point (boundaries included).
    ///
    /// Agrees with `overlaps(&Rect::point(p))`, which is what tree point queries use.
    pub fn contains_point(&self, p: &[T; D]) -> bool {
        !self.is_degenerate() && (0..D).all(|i| le(self.min[i], p[i]) && le(p[i], self.max[i]))
    }

    /// Volume of the ball whose diameter is this rectangle's diagonal.
    ///
    /// Degenerate rectangles cost 0. The value grows monotonically with the
    /// rectangle and is only used to rank insertion and split candidates.
    pub fn cost(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let mut sum_sq = 0.0;
        for i in 0..D {
            let half = 0.5 * (T::widen(self.max[i]) - T::widen(self.min[i]));
            sum_sq += half * half;
        }
        let radius = sqrt(sum_sq);
        let mut pow = 1.0;
        for _ in 0..D {
            pow *= radius;
        }
        Self::UNIT_BALL_VOLUME * pow
    }
}

/// `V_0 = 1`, `V_1 = 2`, `V_n = V_{n-2} * 2π / n`.
#[allow(clippy::cast_precision_loss, reason = "Dimension counts are tiny.")]
const fn unit_ball_volume(dim: usize) -> f64 {
    let mut even = 1.0;
    let mut odd = 2.0;
    let mut n = 2;
    while n <= dim {
        let v = 2.0 * core::f64::consts::PI / n as f64;
        if n % 2 == 0 {
            even *= v;
        } else {
            odd *= v;
        }
        n += 1;
    }
    if dim % 2 == 0 { even } else { odd }
}

#[inline]
fn sqrt(v: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        v.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrt(v)
    }
}

fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
