//! Light rig and precipitation selection per (weather, time of day, variant).
//!
//! Pure switches on the frame inputs. Nothing here is shared between
//! variants or carried across frames.

use glam::Vec3;

use crate::atmosphere::{TimeOfDay, Variant, WeatherClass};

use super::celestial::{
    CelestialBody, LightRig, DAY_SUN_POSITION, MOON_POSITION, SUNSET_SUN_POSITION,
};
use super::particles::{ParticleParams, DRIZZLE, RAIN, SNOW};

/// The four moods of a clear day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SunnyMood {
    /// Hard-edged sun, wide glow, lens flare and heat haze.
    BlindingCinematic,
    /// Soft-edged sun off to the left, no flare.
    SoftPeaceful,
    /// Low warm sun with a golden grade.
    GoldenWarmth,
    /// Small sharp sun near the zenith, cool grade.
    CrispHighNoon,
}

impl SunnyMood {
    pub fn from_variant(variant: Variant) -> Self {
        match variant.get() {
            1 => SunnyMood::SoftPeaceful,
            2 => SunnyMood::GoldenWarmth,
            3 => SunnyMood::CrispHighNoon,
            _ => SunnyMood::BlindingCinematic,
        }
    }

    pub fn rig(self) -> LightRig {
        let sun = LightRig {
            body: CelestialBody::Sun,
            position: DAY_SUN_POSITION,
            color: Vec3::new(1.0, 0.97, 0.92),
            intensity: 1.0,
            disk_radius: 0.06,
            disk_edge: 0.006,
            glow_radius: 0.75,
            glow_strength: 0.5,
            ray_strength: 0.2,
            lens_flare: true,
            heat_haze: true,
            sky_tint: Vec3::ONE,
        };
        match self {
            SunnyMood::BlindingCinematic => sun,
            SunnyMood::SoftPeaceful => LightRig {
                position: glam::Vec2::new(-0.18, 0.22),
                color: Vec3::new(1.0, 0.96, 0.90),
                intensity: 0.85,
                disk_radius: 0.07,
                disk_edge: 0.03,
                glow_radius: 0.5,
                glow_strength: 0.35,
                ray_strength: 0.06,
                lens_flare: false,
                heat_haze: false,
                sky_tint: Vec3::new(0.96, 1.0, 1.04),
                ..sun
            },
            SunnyMood::GoldenWarmth => LightRig {
                position: glam::Vec2::new(0.28, 0.12),
                color: Vec3::new(1.0, 0.82, 0.55),
                intensity: 0.95,
                disk_radius: 0.075,
                disk_edge: 0.02,
                glow_radius: 0.8,
                glow_strength: 0.5,
                ray_strength: 0.14,
                lens_flare: false,
                heat_haze: true,
                sky_tint: Vec3::new(1.08, 0.98, 0.86),
                ..sun
            },
            SunnyMood::CrispHighNoon => LightRig {
                position: glam::Vec2::new(0.0, 0.38),
                color: Vec3::ONE,
                disk_radius: 0.05,
                disk_edge: 0.004,
                glow_radius: 0.35,
                glow_strength: 0.3,
                ray_strength: 0.1,
                lens_flare: true,
                heat_haze: false,
                sky_tint: Vec3::new(0.92, 1.0, 1.06),
                ..sun
            },
        }
    }
}

/// How much of the light source survives each weather class.
pub fn weather_dimming(weather: WeatherClass) -> f32 {
    match weather {
        WeatherClass::Clear => 1.0,
        WeatherClass::Cloudy => 0.8,
        WeatherClass::Overcast => 0.35,
        WeatherClass::Storm => 0.12,
    }
}

/// Pick the light source for a frame.
pub fn light_rig(weather: WeatherClass, time_of_day: TimeOfDay, variant: Variant) -> LightRig {
    let dim = weather_dimming(weather);
    match time_of_day {
        TimeOfDay::Day if weather == WeatherClass::Clear => SunnyMood::from_variant(variant).rig(),
        TimeOfDay::Day => LightRig {
            body: CelestialBody::Sun,
            position: DAY_SUN_POSITION,
            color: Vec3::new(1.0, 0.97, 0.90),
            intensity: dim,
            disk_radius: 0.06,
            disk_edge: 0.012,
            glow_radius: 0.6,
            glow_strength: 0.45,
            ray_strength: 0.15,
            lens_flare: false,
            heat_haze: false,
            sky_tint: Vec3::ONE,
        },
        TimeOfDay::Sunset => LightRig {
            body: CelestialBody::Sun,
            position: SUNSET_SUN_POSITION,
            color: Vec3::new(1.0, 0.62, 0.32),
            intensity: dim,
            disk_radius: 0.085,
            disk_edge: 0.015,
            glow_radius: 0.9,
            glow_strength: 0.5,
            ray_strength: 0.12,
            lens_flare: false,
            heat_haze: false,
            sky_tint: Vec3::ONE,
        },
        TimeOfDay::Night => LightRig {
            body: CelestialBody::Moon,
            position: MOON_POSITION,
            color: Vec3::new(0.86, 0.90, 1.0),
            intensity: dim,
            disk_radius: 0.045,
            disk_edge: 0.006,
            glow_radius: 0.28,
            glow_strength: 0.25,
            ray_strength: 0.0,
            lens_flare: false,
            heat_haze: false,
            sky_tint: Vec3::ONE,
        },
    }
}

/// Falling particles for a frame, if any.
///
/// Storms always rain. Overcast skies use the variant: 2 drizzles, 3 snows.
pub fn precipitation(weather: WeatherClass, variant: Variant) -> Option<&'static ParticleParams> {
    match (weather, variant.get()) {
        (WeatherClass::Storm, _) => Some(&RAIN),
        (WeatherClass::Overcast, 2) => Some(&DRIZZLE),
        (WeatherClass::Overcast, 3) => Some(&SNOW),
        _ => None,
    }
}
