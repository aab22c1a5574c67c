//! Sun and moon: disk, glow, god-rays and lens flare.
//!
//! All terms are additive and non-negative. Positions are in the centred,
//! aspect-corrected frame space produced by `FrameUniforms::centered`.

use glam::{Vec2, Vec3};

use super::math::smoothstep;
use super::noise::value_noise2;

/// Sun position for ordinary daytime skies.
pub const DAY_SUN_POSITION: Vec2 = Vec2::new(0.22, 0.30);
/// Low sun near the bottom edge.
pub const SUNSET_SUN_POSITION: Vec2 = Vec2::new(0.25, -0.30);
/// Moon position at night.
pub const MOON_POSITION: Vec2 = Vec2::new(-0.28, 0.26);

/// Angular frequencies of the two god-ray modulations. Integers, so the
/// pattern stays continuous across the `atan2` branch cut.
const RAY_FREQ_A: f32 = 12.0;
const RAY_FREQ_B: f32 = 7.0;
/// Distance at which ray intensity has halved.
const RAY_FALLOFF: f32 = 0.08;
/// Share of glow and rays kept on top of a fully lit disk.
const DISK_GLOW_OVERLAP: f32 = 0.5;
/// Frequency of the moon surface mottling.
const MOON_MOTTLE_SCALE: f32 = 38.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CelestialBody {
    Sun,
    Moon,
}

/// Light source parameters for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub body: CelestialBody,
    pub position: Vec2,
    pub color: Vec3,
    /// Overall multiplier (weather dimming). In `[0, 1]`.
    pub intensity: f32,
    pub disk_radius: f32,
    /// Half-width of the smoothstep ring at the disk rim. Smaller is sharper.
    pub disk_edge: f32,
    pub glow_radius: f32,
    pub glow_strength: f32,
    pub ray_strength: f32,
    pub lens_flare: bool,
    pub heat_haze: bool,
    /// Multiplier on the sky gradient (color grading per mood).
    pub sky_tint: Vec3,
}

/// Disk coverage in `[0, 1]`: 1 inside, smooth ring at the radius.
#[inline]
pub fn disk(distance: f32, radius: f32, edge: f32) -> f32 {
    1.0 - smoothstep(radius - edge, radius + edge, distance)
}

/// Soft quadratic falloff reaching 0 at `radius`.
#[inline]
pub fn glow(distance: f32, radius: f32) -> f32 {
    let g = 1.0 - smoothstep(0.0, radius, distance);
    g * g
}

/// Radial light shafts around the light source, in `[0, 1]`.
///
/// `offset` is the pixel position relative to the light.
pub fn god_rays(offset: Vec2, distance: f32, time: f32) -> f32 {
    let dir = if distance > 1e-4 { offset / distance } else { Vec2::X };
    let angle = dir.y.atan2(dir.x);
    let a = 0.5 + 0.5 * (angle * RAY_FREQ_A + time * 0.15).sin();
    let b = 0.5 + 0.5 * (angle * RAY_FREQ_B - time * 0.1).sin();
    a * b * (RAY_FALLOFF / (distance + RAY_FALLOFF))
}

/// Camera-lens artifacts for a light at `light` (frame centre at origin).
///
/// Two ghosts sit on the line from the light through the frame centre, on
/// the far side; a faint ring circles the light and a thin horizontal spike
/// crosses it. Purely additive.
pub fn lens_flare(p: Vec2, light: Vec2) -> Vec3 {
    let ghost_a = light * -0.4;
    let ghost_b = light * -1.1;
    let offset = p - light;
    let d = offset.length();

    let mut flare = Vec3::ZERO;
    flare += Vec3::new(0.6, 0.8, 1.0) * glow((p - ghost_a).length(), 0.05) * 0.18;
    flare += Vec3::new(1.0, 0.7, 0.5) * glow((p - ghost_b).length(), 0.09) * 0.10;

    let ring = 1.0 - smoothstep(0.0, 0.012, (d - 0.32).abs());
    flare += Vec3::new(0.8, 0.9, 1.0) * ring * 0.05;

    let spike = (1.0 - smoothstep(0.0, 0.006, offset.y.abs()))
        * (1.0 - smoothstep(0.0, 0.45, offset.x.abs()));
    flare += Vec3::splat(spike * 0.22);
    flare
}

/// Total light contribution of the rig at `p`.
pub fn celestial_light(p: Vec2, time: f32, rig: &LightRig) -> Vec3 {
    let offset = p - rig.position;
    let d = offset.length();

    let mut body = disk(d, rig.disk_radius, rig.disk_edge);
    if rig.body == CelestialBody::Moon {
        body *= 0.82 + 0.18 * value_noise2(offset * MOON_MOTTLE_SCALE);
    }
    let halo = glow(d, rig.glow_radius) * rig.glow_strength
        + god_rays(offset, d, time) * rig.ray_strength;

    let mut light = rig.color * (body + halo * (1.0 - DISK_GLOW_OVERLAP * body));
    if rig.lens_flare {
        light += lens_flare(p, rig.position) * rig.color;
    }
    light * rig.intensity
}
