//! Cloud layer: drifting fbm density, gradient normals, diffuse and rim light.

use glam::{Vec2, Vec3};

use crate::atmosphere::WeatherClass;

use super::celestial::LightRig;
use super::math::{mix3, smoothstep};
use super::noise::fbm;
use super::palette::Palette;

/// Cover ramp applied to `density + bias`.
pub const COVER_LOW: f32 = 0.45;
pub const COVER_HIGH: f32 = 0.75;

/// Advection of the density field in frame units per second.
pub const DRIFT: Vec2 = Vec2::new(0.020, 0.006);

/// Finite-difference step for the density gradient.
const NORMAL_EPS: f32 = 0.01;
/// z component of the unnormalized normal. Smaller values exaggerate relief.
const NORMAL_K: f32 = 0.02;
/// Height of the light above the cloud plane when building the light vector.
const LIGHT_ELEVATION: f32 = 0.35;
const RIM_SCALE: f32 = 1.4;
const RIM_STRENGTH: f32 = 0.3;

/// Per-weather cloud parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudLayer {
    /// Added to the raw density before the cover ramp. Negative is sparse,
    /// positive is heavy.
    pub density_bias: f32,
    /// Spatial frequency of the density field.
    pub scale: f32,
    /// Multiplier on [`DRIFT`].
    pub time_scale: f32,
    /// Maximum blend of cloud color over the sky.
    pub opacity: f32,
}

impl CloudLayer {
    pub fn for_weather(weather: WeatherClass) -> Self {
        match weather {
            WeatherClass::Clear => Self {
                density_bias: -0.15,
                scale: 2.2,
                time_scale: 1.0,
                opacity: 0.85,
            },
            WeatherClass::Cloudy => Self {
                density_bias: 0.05,
                scale: 2.6,
                time_scale: 1.0,
                opacity: 0.92,
            },
            WeatherClass::Overcast => Self {
                density_bias: 0.30,
                scale: 3.0,
                time_scale: 1.0,
                opacity: 0.97,
            },
            WeatherClass::Storm => Self {
                density_bias: 0.45,
                scale: 3.2,
                time_scale: 3.0,
                opacity: 1.0,
            },
        }
    }
}

/// Raw density of the layer at `p`, in `[0, 0.9375)`.
#[inline]
pub fn cloud_density(p: Vec2, time: f32, layer: &CloudLayer) -> f32 {
    fbm(p * layer.scale + DRIFT * (time * layer.time_scale))
}

/// Cover mask in `[0, 1]`.
#[inline]
pub fn cover_from_density(density: f32, bias: f32) -> f32 {
    smoothstep(COVER_LOW, COVER_HIGH, density + bias)
}

pub fn cloud_cover(p: Vec2, time: f32, layer: &CloudLayer) -> f32 {
    cover_from_density(cloud_density(p, time, layer), layer.density_bias)
}

/// Unit pseudo-normal of the density surface.
pub fn cloud_normal(p: Vec2, time: f32, layer: &CloudLayer) -> Vec3 {
    let d = cloud_density(p, time, layer);
    let dx = cloud_density(p + Vec2::new(NORMAL_EPS, 0.0), time, layer) - d;
    let dy = cloud_density(p + Vec2::new(0.0, NORMAL_EPS), time, layer) - d;
    Vec3::new(-dx, -dy, NORMAL_K).normalize()
}

/// Composite the cloud layer over `sky`. Returns the color and the cover mask.
pub fn shade_clouds(
    p: Vec2,
    time: f32,
    sky: Vec3,
    palette: &Palette,
    layer: &CloudLayer,
    rig: &LightRig,
) -> (Vec3, f32) {
    let density = cloud_density(p, time, layer);
    let cover = cover_from_density(density, layer.density_bias);
    if cover <= 0.0 {
        return (sky, 0.0);
    }

    let dx = cloud_density(p + Vec2::new(NORMAL_EPS, 0.0), time, layer) - density;
    let dy = cloud_density(p + Vec2::new(0.0, NORMAL_EPS), time, layer) - density;
    let normal = Vec3::new(-dx, -dy, NORMAL_K).normalize();

    let to_light = (rig.position - p).extend(LIGHT_ELEVATION).normalize();
    let diffuse = normal.dot(to_light).max(0.0);

    let edge = ((1.0 - normal.z) * RIM_SCALE).clamp(0.0, 1.0);
    let edge2 = edge * edge;
    let rim = edge2 * edge2 * diffuse * RIM_STRENGTH * rig.intensity;

    let cloud = mix3(palette.cloud_shadow, palette.cloud_base, diffuse) + rig.color * rim;
    (mix3(sky, cloud, cover * layer.opacity), cover)
}
