//! Scalar helpers with shader semantics.
//!
//! These match the WGSL built-ins of the same name so the CPU evaluator and
//! `sky.wgsl` agree: `fract` is floor-based (not `f32::fract`, which
//! truncates toward zero) and `smoothstep` clamps before easing.

use glam::{Vec2, Vec3};

/// `x - floor(x)`, in `[0, 1)` for finite `x >= 0`.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
pub fn fract2(v: Vec2) -> Vec2 {
    v - v.floor()
}

#[inline]
pub fn fract3(v: Vec3) -> Vec3 {
    v - v.floor()
}

/// Hermite ease between `edge0` and `edge1`. Requires `edge0 < edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Rec. 709 luma.
#[inline]
pub fn luminance(c: Vec3) -> f32 {
    c.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}
