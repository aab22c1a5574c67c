//! Grid-hashed particle fields: rain streaks, snow and stars.
//!
//! Particles are not stored. The frame is scrolled, cut into cells, and a
//! cell holds a particle when its hash clears [`EXISTENCE_THRESHOLD`].

use glam::Vec2;

use super::math::smoothstep;
use super::noise::hash2;

/// Share of cells left empty.
pub const EXISTENCE_THRESHOLD: f32 = 0.9;

/// Angular rate of the horizontal sway, radians per second.
const SWAY_RATE: f32 = 1.3;
/// Angular rate of star twinkle, radians per second.
const TWINKLE_RATE: f32 = 2.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleParams {
    /// Cells per frame unit.
    pub density: f32,
    /// Downward scroll, frame units per second.
    pub speed: f32,
    /// Amplitude of the horizontal sinusoidal sway.
    pub sway: f32,
    /// Dot radius in cell units.
    pub size: f32,
    /// Vertical elongation of the dot. 1 is round.
    pub stretch: f32,
    /// Depth of the brightness modulation, 0 for none.
    pub twinkle: f32,
    pub brightness: f32,
    /// How far the dot may wander from the cell centre, in cell units.
    pub jitter: f32,
}

pub const RAIN: ParticleParams = ParticleParams {
    density: 22.0,
    speed: 2.4,
    sway: 0.01,
    size: 0.09,
    stretch: 5.0,
    twinkle: 0.0,
    brightness: 0.35,
    jitter: 0.2,
};

pub const DRIZZLE: ParticleParams = ParticleParams {
    density: 18.0,
    speed: 1.6,
    sway: 0.01,
    size: 0.07,
    stretch: 3.5,
    twinkle: 0.0,
    brightness: 0.22,
    jitter: 0.2,
};

pub const SNOW: ParticleParams = ParticleParams {
    density: 12.0,
    speed: 0.12,
    sway: 0.03,
    size: 0.16,
    stretch: 1.0,
    twinkle: 0.0,
    brightness: 0.8,
    jitter: 0.5,
};

pub const STARS: ParticleParams = ParticleParams {
    density: 40.0,
    speed: 0.002,
    sway: 0.0,
    size: 0.14,
    stretch: 1.0,
    twinkle: 0.6,
    brightness: 0.9,
    jitter: 0.5,
};

/// Particle brightness at `p`, in `[0, brightness]`.
pub fn particle_field(p: Vec2, time: f32, params: &ParticleParams) -> f32 {
    let mut q = p;
    q.y += time * params.speed;
    q.x += (time * SWAY_RATE + q.y * 3.0).sin() * params.sway;

    let scaled = q * params.density;
    let cell = scaled.floor();
    let local = scaled - cell - Vec2::splat(0.5);

    let h = hash2(cell);
    if h <= EXISTENCE_THRESHOLD {
        return 0.0;
    }

    let jitter = Vec2::new(
        hash2(cell + Vec2::new(17.0, 0.0)) - 0.5,
        hash2(cell + Vec2::new(0.0, 29.0)) - 0.5,
    ) * params.jitter;
    let d = local - jitter;
    let dd = Vec2::new(d.x, d.y / params.stretch).length();
    let dot = 1.0 - smoothstep(params.size * 0.35, params.size, dd);

    // Fade out at the cell border so a dot never gets cut by its neighbour.
    let edge = (1.0 - smoothstep(0.38, 0.5, local.x.abs()))
        * (1.0 - smoothstep(0.38, 0.5, local.y.abs()));

    let twinkle = 1.0 - params.twinkle * (0.5 + 0.5 * (time * TWINKLE_RATE + h * 628.3).sin());

    dot * edge * h * twinkle * params.brightness
}

/// Stars fade toward the horizon and behind clouds.
pub fn star_field(p: Vec2, time: f32, cover: f32) -> f32 {
    let horizon = smoothstep(-0.35, 0.1, p.y);
    particle_field(p, time, &STARS) * horizon * (1.0 - cover)
}
