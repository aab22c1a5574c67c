//! Static background used when the animated GPU path is unavailable.

use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};

use crate::atmosphere::{FallbackConfig, FallbackMode, SceneState};
use crate::sky::math::mix3;
use crate::sky::palette::palette;

/// A two-stop vertical gradient or a flat color. Never animates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticBackground {
    pub top: Vec3,
    pub bottom: Vec3,
}

impl StaticBackground {
    /// Background for `state`, honoring the configured mode and override.
    pub fn for_state(state: &SceneState, config: &FallbackConfig) -> Self {
        let pal = palette(state.weather, state.time_of_day);
        let (top, bottom) = match (config.mode, config.color) {
            (FallbackMode::Solid, Some(color)) => {
                let c = Vec3::from_array(color);
                (c, c)
            }
            (FallbackMode::Solid, None) => {
                let c = mix3(pal.sky_top, pal.sky_bottom, 0.5);
                (c, c)
            }
            (FallbackMode::Gradient, Some(color)) => {
                let c = Vec3::from_array(color);
                (c, mix3(c, Vec3::ONE, 0.25))
            }
            (FallbackMode::Gradient, None) => (pal.sky_top, pal.sky_bottom),
        };
        Self {
            top: top.clamp(Vec3::ZERO, Vec3::ONE),
            bottom: bottom.clamp(Vec3::ZERO, Vec3::ONE),
        }
    }

    /// Color at `uv` (top-left origin). Coordinates outside `[0, 1]` clamp.
    pub fn pixel(&self, uv: Vec2) -> Vec3 {
        mix3(self.top, self.bottom, uv.y.clamp(0.0, 1.0))
    }

    /// Render the background into an RGBA8 image.
    pub fn to_image(&self, width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |_, y| {
            let v = (y as f32 + 0.5) / height.max(1) as f32;
            let c = self.pixel(Vec2::new(0.5, v));
            Rgba([to_u8(c.x), to_u8(c.y), to_u8(c.z), 255])
        })
    }
}

#[inline]
pub(crate) fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::{TimeOfDay, WeatherClass};

    fn state() -> SceneState {
        SceneState {
            weather: WeatherClass::Cloudy,
            time_of_day: TimeOfDay::Sunset,
            ..Default::default()
        }
    }

    #[test]
    fn test_gradient_uses_palette() {
        let bg = StaticBackground::for_state(&state(), &FallbackConfig::default());
        let pal = palette(WeatherClass::Cloudy, TimeOfDay::Sunset);
        assert_eq!(bg.top, pal.sky_top);
        assert_eq!(bg.bottom, pal.sky_bottom);
        assert_eq!(bg.pixel(Vec2::new(0.3, 0.0)), pal.sky_top);
    }

    #[test]
    fn test_solid_override() {
        let config = FallbackConfig {
            mode: FallbackMode::Solid,
            color: Some([0.1, 0.2, 0.3]),
        };
        let bg = StaticBackground::for_state(&state(), &config);
        assert_eq!(bg.top, bg.bottom);
        assert_eq!(bg.pixel(Vec2::new(0.0, 0.7)), Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_pixel_is_total() {
        let bg = StaticBackground::for_state(&state(), &FallbackConfig::default());
        for uv in [Vec2::new(-5.0, -5.0), Vec2::new(9.0, 9.0), Vec2::splat(f32::MAX)] {
            let c = bg.pixel(uv);
            assert!(c.is_finite());
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }
    }

    #[test]
    fn test_image_is_opaque() {
        let bg = StaticBackground::for_state(&state(), &FallbackConfig::default());
        let img = bg.to_image(4, 8);
        assert_eq!(img.dimensions(), (4, 8));
        assert!(img.pixels().all(|p| p.0[3] == 255));
        assert!(bg.to_image(0, 0).is_empty());
    }
}
