//! Transient effects: lightning flicker and heat-haze UV warp.

use glam::{Vec2, Vec3};

use super::math::smoothstep;
use super::noise::fbm;

/// Flicker values above this start to flash. Lower values flash more often.
pub const LIGHTNING_THRESHOLD: f32 = 0.85;
/// Flat color added over the whole frame at full flash.
pub const LIGHTNING_COLOR: Vec3 = Vec3::new(0.50, 0.53, 0.65);

/// Warp amplitude in uv units.
pub const HAZE_AMPLITUDE: f32 = 0.006;
const HAZE_SCALE: f32 = 8.0;
const HAZE_RATE: f32 = 0.5;

/// Raw flicker product in `[-1, 1]`.
#[inline]
pub fn lightning_flicker(time: f32) -> f32 {
    let x = 2.0 * time;
    x.sin() * (3.7 * x).sin() * (11.3 * x).sin()
}

/// Flash intensity in `[0, 1]`; zero most of the time.
#[inline]
pub fn lightning_flash(time: f32) -> f32 {
    smoothstep(LIGHTNING_THRESHOLD, 1.0, lightning_flicker(time))
}

/// Perturbed sampling uv for the shimmer above a hot sun.
pub fn heat_haze(uv: Vec2, time: f32) -> Vec2 {
    let q = uv * HAZE_SCALE + Vec2::splat(time * HAZE_RATE);
    let offset = Vec2::new(fbm(q), fbm(q + Vec2::new(5.2, 1.3))) - Vec2::splat(0.5);
    uv + offset * HAZE_AMPLITUDE
}
