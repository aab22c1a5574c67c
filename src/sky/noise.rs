//! Hash-based value noise and fractal sums.
//!
//! Everything here is a pure function of its arguments: no tables, no seeds,
//! no state. The same point always yields the same value.

use glam::{Mat2, Vec2, Vec3};

use super::math::{fract, fract3};

/// Lattice coordinates are wrapped to this period before hashing. Keeps the
/// fractional multiply inside the range where `f32` still has fraction bits.
pub const HASH_PERIOD: f32 = 4096.0;

/// Octaves summed by [`fbm`].
pub const FBM_OCTAVES: usize = 4;

/// Frequency multiplier between octaves.
pub const FBM_LACUNARITY: f32 = 2.02;

/// Per-octave rotation (about 36.87 degrees) that breaks axis-aligned
/// repetition between octaves.
const FBM_ROTATION: Mat2 = Mat2::from_cols_array(&[0.8, 0.6, -0.6, 0.8]);

/// Per-octave offset so octaves do not share an origin.
const FBM_SHIFT: Vec2 = Vec2::new(37.1, 17.3);

/// Pseudo-random scalar in `[0, 1)` for a 2D point.
///
/// Multiply-fract-dot hash: integer-adjacent inputs give uncorrelated outputs.
pub fn hash2(p: Vec2) -> f32 {
    let p = p - (p / HASH_PERIOD).floor() * HASH_PERIOD;
    let mut p3 = fract3(Vec3::new(p.x, p.y, p.x) * 0.1031);
    p3 += Vec3::splat(p3.dot(Vec3::new(p3.y, p3.z, p3.x) + Vec3::splat(33.33)));
    fract((p3.x + p3.y) * p3.z)
}

/// Smoothly interpolated lattice noise in `[0, 1)`.
///
/// Corners are blended with the quintic fade `6t^5 - 15t^4 + 10t^3`, whose
/// first and second derivatives vanish on cell borders.
pub fn value_noise2(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * f * (f * (f * 6.0 - Vec2::splat(15.0)) + Vec2::splat(10.0));

    let a = hash2(i);
    let b = hash2(i + Vec2::new(1.0, 0.0));
    let c = hash2(i + Vec2::new(0.0, 1.0));
    let d = hash2(i + Vec2::new(1.0, 1.0));

    let bottom = a + (b - a) * u.x;
    let top = c + (d - c) * u.x;
    bottom + (top - bottom) * u.y
}

/// Four-octave fractal sum with weights 0.5, 0.25, 0.125, 0.0625.
///
/// Output is in `[0, 0.9375)`.
pub fn fbm(p: Vec2) -> f32 {
    let mut p = p;
    let mut amplitude = 0.5;
    let mut sum = 0.0;
    for _ in 0..FBM_OCTAVES {
        sum += amplitude * value_noise2(p);
        p = FBM_ROTATION * p * FBM_LACUNARITY + FBM_SHIFT;
        amplitude *= 0.5;
    }
    sum
}
