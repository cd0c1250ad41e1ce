//! Tolerance-based comparisons and safe normalization.
//!
//! Colors and points are the product of long chains of float operations,
//! so exact equality is useless for them. Everything here compares with a
//! fixed absolute tolerance instead.

use crate::{Vec2, Vec3};

/// Absolute per-component tolerance used by [`ApproxEq`].
pub const VEC_TOLERANCE: f32 = 1e-2;

/// Approximate equality within [`VEC_TOLERANCE`].
pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f32 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() <= VEC_TOLERANCE
    }
}

impl ApproxEq for Vec2 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(*other, VEC_TOLERANCE)
    }
}

impl ApproxEq for Vec3 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(*other, VEC_TOLERANCE)
    }
}

/// Normalize `v`, or `None` if it has zero (or non-finite) length.
#[inline]
pub fn unit_vector(v: Vec3) -> Option<Vec3> {
    v.try_normalize()
}

/// True if every component is close enough to zero to make `v` useless as a direction.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const S: f32 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}
