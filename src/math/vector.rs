//! Free-function vector arithmetic over [`Vec3`].
//!
//! These mirror the handful of operations the pose solver needs and pin down
//! the one edge case that matters: normalizing a zero vector yields zero.

use glam::Vec3;

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    a + b
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    a - b
}

#[inline]
pub fn scale(v: Vec3, s: f32) -> Vec3 {
    v * s
}

#[inline]
pub fn length(v: Vec3) -> f32 {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}

#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    length(sub(a, b))
}

/// Unit vector in the direction of `v`, or [`Vec3::ZERO`] when `v` has no
/// length.
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    if len == 0.0 {
        Vec3::ZERO
    } else {
        scale(v, 1.0 / len)
    }
}

/// Places a point `length` away from `anchor`, along the direction from
/// `anchor` towards `toward`.
///
/// If `toward` coincides with `anchor` the direction is zero and the result
/// collapses onto `anchor`.
#[inline]
pub fn reach(anchor: Vec3, toward: Vec3, length: f32) -> Vec3 {
    add(anchor, scale(normalize(sub(toward, anchor)), length))
}
