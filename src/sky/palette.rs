//! Sky and cloud colors per (weather class, time of day).
//!
//! Night entries are lifted well above a physically plausible black so cloud
//! shapes stay readable against the sky. Sunset entries lean orange/purple,
//! day entries lean blue.

use glam::Vec3;

use crate::atmosphere::{TimeOfDay, WeatherClass};

use super::math::{mix3, smoothstep};

/// Gradient and cloud colors for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Sky color at the top edge of the frame.
    pub sky_top: Vec3,
    /// Sky color at the bottom edge of the frame.
    pub sky_bottom: Vec3,
    /// Lit cloud color.
    pub cloud_base: Vec3,
    /// Cloud color facing away from the light.
    pub cloud_shadow: Vec3,
}

const fn entry(top: [f32; 3], bottom: [f32; 3], base: [f32; 3], shadow: [f32; 3]) -> Palette {
    Palette {
        sky_top: Vec3::from_array(top),
        sky_bottom: Vec3::from_array(bottom),
        cloud_base: Vec3::from_array(base),
        cloud_shadow: Vec3::from_array(shadow),
    }
}

/// Indexed `[weather][time_of_day]`, same order as the shader's `PALETTES`.
const PALETTES: [[Palette; 3]; 4] = [
    // Clear
    [
        entry([0.16, 0.40, 0.82], [0.58, 0.78, 0.96], [0.98, 0.98, 1.00], [0.62, 0.68, 0.80]),
        entry([0.22, 0.18, 0.45], [1.00, 0.55, 0.28], [1.00, 0.78, 0.62], [0.45, 0.30, 0.45]),
        entry([0.03, 0.05, 0.14], [0.10, 0.14, 0.28], [0.42, 0.46, 0.60], [0.16, 0.18, 0.28]),
    ],
    // Cloudy
    [
        entry([0.30, 0.48, 0.74], [0.66, 0.76, 0.88], [0.95, 0.95, 0.97], [0.55, 0.58, 0.66]),
        entry([0.28, 0.22, 0.42], [0.92, 0.56, 0.40], [0.95, 0.72, 0.62], [0.42, 0.32, 0.42]),
        entry([0.05, 0.07, 0.15], [0.13, 0.16, 0.27], [0.40, 0.43, 0.54], [0.17, 0.19, 0.27]),
    ],
    // Overcast
    [
        entry([0.50, 0.55, 0.62], [0.70, 0.73, 0.77], [0.80, 0.82, 0.85], [0.48, 0.50, 0.55]),
        entry([0.35, 0.30, 0.38], [0.68, 0.52, 0.48], [0.70, 0.60, 0.60], [0.38, 0.32, 0.38]),
        entry([0.08, 0.09, 0.13], [0.16, 0.17, 0.22], [0.32, 0.34, 0.40], [0.16, 0.17, 0.22]),
    ],
    // Storm
    [
        entry([0.18, 0.20, 0.25], [0.32, 0.34, 0.38], [0.42, 0.44, 0.50], [0.14, 0.15, 0.19]),
        entry([0.18, 0.14, 0.20], [0.40, 0.28, 0.28], [0.40, 0.34, 0.38], [0.13, 0.11, 0.15]),
        entry([0.04, 0.05, 0.08], [0.10, 0.11, 0.15], [0.24, 0.26, 0.32], [0.09, 0.10, 0.14]),
    ],
];

/// Look up the palette for a weather class and time-of-day bucket.
#[inline]
pub fn palette(weather: WeatherClass, time_of_day: TimeOfDay) -> Palette {
    PALETTES[weather.index() as usize][time_of_day.index() as usize]
}

/// Vertical sky gradient. `uv_y` is 0 at the top edge, 1 at the bottom.
#[inline]
pub fn sky_gradient(palette: &Palette, uv_y: f32) -> Vec3 {
    mix3(palette.sky_top, palette.sky_bottom, smoothstep(0.0, 1.0, uv_y))
}
