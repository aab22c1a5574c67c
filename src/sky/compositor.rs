//! Final grade: clamp, contrast curve, vignette.

use glam::{Vec2, Vec3, Vec4};

use super::math::smoothstep;

/// Upper bound of any linear channel before grading.
pub const HDR_CEILING: f32 = 3.0;
/// Darkening per unit distance from the frame centre.
pub const VIGNETTE_STRENGTH: f32 = 0.35;

/// Per-channel `smoothstep(0, 1, c)` contrast curve.
#[inline]
pub fn tone_curve(c: Vec3) -> Vec3 {
    Vec3::new(
        smoothstep(0.0, 1.0, c.x),
        smoothstep(0.0, 1.0, c.y),
        smoothstep(0.0, 1.0, c.z),
    )
}

/// `1 - distance_from_centre * k`, floored at 0. `uv` spans `[0, 1]^2`.
#[inline]
pub fn vignette(uv: Vec2) -> f32 {
    (1.0 - (uv - Vec2::splat(0.5)).length() * VIGNETTE_STRENGTH).max(0.0)
}

/// Grade a linear color into an opaque output pixel.
pub fn finish(linear: Vec3, uv: Vec2) -> Vec4 {
    let c = linear.clamp(Vec3::ZERO, Vec3::splat(HDR_CEILING));
    (tone_curve(c) * vignette(uv)).extend(1.0)
}
