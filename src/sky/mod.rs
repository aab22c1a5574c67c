//! Per-pixel sky evaluator.
//!
//! CPU reference of `shaders/sky.wgsl`. Every frame is a pure function of
//! `(uv, FrameUniforms)`: nothing is read from earlier frames, so any frame
//! can be re-rendered from its `time` alone.
//!
//! Stage order per pixel:
//! heat haze -> palette -> clouds -> sun/moon -> stars -> precipitation ->
//! lightning -> grade.

pub mod celestial;
pub mod clouds;
pub mod compositor;
pub mod effects;
pub mod math;
pub mod noise;
pub mod palette;
pub mod particles;
pub mod uniforms;
pub mod variant;

use glam::{Vec2, Vec3, Vec4};

use crate::atmosphere::{Style, TimeOfDay, WeatherClass};

use celestial::{LightRig, celestial_light, disk, glow};
use clouds::{CloudLayer, shade_clouds};
use effects::{LIGHTNING_COLOR, heat_haze, lightning_flash};
use math::mix3;
use noise::hash2;
use palette::{Palette, palette, sky_gradient};
use particles::{particle_field, star_field};
use variant::{light_rig, precipitation};

// Re-exports
pub use compositor::finish;
pub use uniforms::FrameUniforms;

/// Fraction of sun/moon light blocked by full cloud cover.
const CLOUD_OCCLUSION: f32 = 0.85;
/// Tint of rain and drizzle streaks. Snow is white.
const RAIN_TINT: Vec3 = Vec3::new(0.75, 0.80, 0.90);

/// Number of bokeh blobs in the soft style.
const SOFT_BLOBS: usize = 6;
/// Soft-style attenuation of stars, precipitation and lightning.
const SOFT_DETAIL: f32 = 0.6;

/// Linear color at `uv` before grading. `uv` has its origin at the top-left.
pub fn shade_linear(uv: Vec2, u: &FrameUniforms) -> Vec3 {
    let rig = light_rig(u.weather, u.time_of_day, u.variant);
    let uv = if u.style == Style::Realistic && rig.heat_haze {
        heat_haze(uv, u.time)
    } else {
        uv
    };
    let p = u.centered(uv);
    let pal = palette(u.weather, u.time_of_day);
    let sky = sky_gradient(&pal, uv.y) * rig.sky_tint;

    let (mut color, cover, detail) = match u.style {
        Style::Realistic => {
            let layer = CloudLayer::for_weather(u.weather);
            let (color, cover) = shade_clouds(p, u.time, sky, &pal, &layer, &rig);
            let color = color + celestial_light(p, u.time, &rig) * (1.0 - cover * CLOUD_OCCLUSION);
            (color, cover, 1.0)
        }
        Style::Soft => {
            let (color, cover) = shade_soft(p, u.time, sky, &pal, &rig, u.weather);
            (color, cover, SOFT_DETAIL)
        }
    };

    if u.time_of_day == TimeOfDay::Night
        && matches!(u.weather, WeatherClass::Clear | WeatherClass::Cloudy)
    {
        color += Vec3::splat(star_field(p, u.time, cover) * detail);
    }

    if let Some(params) = precipitation(u.weather, u.variant) {
        let tint = if params.stretch > 1.0 { RAIN_TINT } else { Vec3::ONE };
        color += tint * (particle_field(p, u.time, params) * detail);
    }

    if u.weather == WeatherClass::Storm {
        color += LIGHTNING_COLOR * (lightning_flash(u.time) * detail);
    }

    color
}

/// Graded, opaque output color at `uv`.
pub fn shade(uv: Vec2, u: &FrameUniforms) -> Vec4 {
    finish(shade_linear(uv, u), uv)
}

fn soft_cloud_amount(weather: WeatherClass) -> f32 {
    match weather {
        WeatherClass::Clear => 0.18,
        WeatherClass::Cloudy => 0.35,
        WeatherClass::Overcast => 0.5,
        WeatherClass::Storm => 0.55,
    }
}

/// Glass look: a few large drifting blurred blobs instead of the cloud
/// layer, and a diffuse sun or moon with no rays or flare.
fn shade_soft(
    p: Vec2,
    time: f32,
    sky: Vec3,
    pal: &Palette,
    rig: &LightRig,
    weather: WeatherClass,
) -> (Vec3, f32) {
    let mut blobs = 0.0;
    for i in 0..SOFT_BLOBS {
        let seed = Vec2::new(i as f32 * 7.31, 3.17);
        let hx = hash2(seed);
        let hy = hash2(seed + Vec2::new(1.0, 0.0));
        let hr = hash2(seed + Vec2::new(0.0, 1.0));
        let center = Vec2::new(
            (hx - 0.5) * 1.6 + (time * 0.05 + hx * 6.283).sin() * 0.12,
            (hy - 0.5) * 0.9 + (time * 0.04 + hy * 6.283).cos() * 0.05,
        );
        let radius = 0.22 + 0.18 * hr;
        blobs += glow((p - center).length(), radius);
    }
    let cover = blobs.min(1.0) * soft_cloud_amount(weather);
    let mut color = mix3(sky, pal.cloud_base, cover);

    let d = (p - rig.position).length();
    let body = disk(d, rig.disk_radius, rig.disk_radius * 0.6);
    let halo = glow(d, rig.glow_radius * 1.2) * 0.6;
    color += rig.color * (body * 0.8 + halo * (1.0 - 0.5 * body)) * rig.intensity * (1.0 - cover);

    (color, cover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::{SceneState, Variant};
    use super::celestial::{CelestialBody, DAY_SUN_POSITION, MOON_POSITION};
    use super::compositor::HDR_CEILING;
    use super::math::luminance;

    const GRID: usize = 24;

    fn uniforms(
        weather: WeatherClass,
        time_of_day: TimeOfDay,
        style: Style,
        variant: u8,
        time: f32,
    ) -> FrameUniforms {
        FrameUniforms::new(
            time,
            &SceneState {
                weather,
                time_of_day,
                style,
                variant: Variant::new(variant),
                viewport: [1600, 1000],
            },
        )
    }

    fn grid() -> impl Iterator<Item = Vec2> {
        (0..GRID).flat_map(|y| {
            (0..GRID).map(move |x| {
                Vec2::new((x as f32 + 0.5) / GRID as f32, (y as f32 + 0.5) / GRID as f32)
            })
        })
    }

    fn mean_luminance(u: &FrameUniforms) -> f32 {
        let sum: f32 = grid().map(|uv| luminance(shade(uv, u).truncate())).sum();
        sum / (GRID * GRID) as f32
    }

    fn all_frames(time: f32) -> Vec<FrameUniforms> {
        let mut frames = Vec::new();
        for w in WeatherClass::ALL {
            for tod in TimeOfDay::ALL {
                for style in [Style::Realistic, Style::Soft] {
                    for v in 0..4 {
                        frames.push(uniforms(w, tod, style, v, time));
                    }
                }
            }
        }
        frames
    }

    #[test]
    fn test_deterministic() {
        for u in all_frames(12.34) {
            for uv in grid().step_by(7) {
                assert_eq!(shade(uv, &u).to_array(), shade(uv, &u).to_array());
            }
        }
    }

    #[test]
    fn test_bounded_before_and_after_grading() {
        for t in [0.0, 2.28, 9.5, 600.0] {
            for u in all_frames(t) {
                for uv in grid() {
                    let linear = shade_linear(uv, &u);
                    assert!(linear.is_finite(), "{u:?} at {uv}");
                    assert!(linear.min_element() >= 0.0, "{u:?} at {uv}: {linear}");
                    assert!(linear.max_element() <= HDR_CEILING, "{u:?} at {uv}: {linear}");
                    let out = finish(linear, uv);
                    assert!(out.min_element() >= 0.0 && out.max_element() <= 1.0);
                    assert_eq!(out.w, 1.0);
                }
            }
        }
    }

    #[test]
    fn test_edges_and_degenerate_viewport_are_finite() {
        let mut u = uniforms(WeatherClass::Storm, TimeOfDay::Night, Style::Realistic, 0, 3.0);
        u.viewport = Vec2::ZERO;
        for uv in [Vec2::ZERO, Vec2::ONE, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)] {
            assert!(shade(uv, &u).is_finite());
        }
    }

    #[test]
    fn test_continuous_in_time() {
        let dt = 1e-4;
        // Lightning strikes are step changes; compare storm frames between them
        let t = (0..1000)
            .map(|i| 5.0 + i as f32 * 0.01)
            .find(|&t| lightning_flash(t) == 0.0 && lightning_flash(t + dt) == 0.0)
            .unwrap();
        for w in WeatherClass::ALL {
            for tod in TimeOfDay::ALL {
                for style in [Style::Realistic, Style::Soft] {
                    for v in 0..4 {
                        let a = uniforms(w, tod, style, v, t);
                        let b = uniforms(w, tod, style, v, t + dt);
                        for uv in grid() {
                            let delta = (shade(uv, &a) - shade(uv, &b)).abs().max_element();
                            assert!(delta < 0.03, "{a:?} jumps by {delta} at {uv}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_clear_day_sun_is_bright() {
        let u = uniforms(WeatherClass::Clear, TimeOfDay::Day, Style::Realistic, 0, 0.0);
        let uv = u.uv_for(DAY_SUN_POSITION);
        let color = shade(uv, &u);
        assert!(luminance(color.truncate()) > 0.8, "sun pixel {color}");
        let away = shade(u.uv_for(Vec2::new(-0.6, -0.3)), &u);
        assert!(luminance(color.truncate()) > luminance(away.truncate()) + 0.1);
    }

    #[test]
    fn test_storm_flashes_are_visible_and_sparse() {
        let frames: Vec<f32> = (0..300)
            .map(|i| {
                let t = i as f32 / 60.0;
                let u = uniforms(WeatherClass::Storm, TimeOfDay::Day, Style::Realistic, 0, t);
                mean_luminance(&u)
            })
            .collect();
        let mut sorted = frames.clone();
        sorted.sort_by(f32::total_cmp);
        let baseline = sorted[sorted.len() / 2];
        let flashes = frames.iter().filter(|&&l| l > baseline + 0.05).count();
        assert!(flashes >= 1, "no visible lightning in 5 s (baseline {baseline})");
        assert!(flashes <= frames.len() / 10, "{flashes} flashing frames");
    }

    fn mean_cover(u: &FrameUniforms) -> f32 {
        let layer = CloudLayer::for_weather(u.weather);
        let sum: f32 = grid()
            .map(|uv| clouds::cloud_cover(u.centered(uv), u.time, &layer))
            .sum();
        sum / (GRID * GRID) as f32
    }

    #[test]
    fn test_overcast_cover_exceeds_cloudy_and_clear() {
        for t in [0.0, 4.0, 30.0] {
            for tod in TimeOfDay::ALL {
                let cover = |w| mean_cover(&uniforms(w, tod, Style::Realistic, 0, t));
                let clear = cover(WeatherClass::Clear);
                let cloudy = cover(WeatherClass::Cloudy);
                let overcast = cover(WeatherClass::Overcast);
                assert!(overcast > cloudy, "t={t}: {overcast} <= {cloudy}");
                assert!(cloudy > clear, "t={t}: {cloudy} <= {clear}");
            }
        }
    }

    #[test]
    fn test_night_has_moon_and_stars_but_no_sun() {
        let u = uniforms(WeatherClass::Clear, TimeOfDay::Night, Style::Realistic, 0, 1.5);
        let rig = light_rig(u.weather, u.time_of_day, u.variant);
        assert_eq!(rig.body, CelestialBody::Moon);
        assert_eq!(rig.position, MOON_POSITION);
        assert_eq!(celestial_light(DAY_SUN_POSITION, u.time, &rig), Vec3::ZERO);
        assert!(celestial_light(MOON_POSITION, u.time, &rig).min_element() > 0.5);

        let layer = CloudLayer::for_weather(u.weather);
        let n = 160;
        let mut stars = 0;
        for y in 0..n {
            for x in 0..n {
                let uv = Vec2::new((x as f32 + 0.5) / n as f32, (y as f32 + 0.5) / n as f32);
                let p = u.centered(uv);
                let cover = clouds::cloud_cover(p, u.time, &layer);
                if star_field(p, u.time, cover) > 0.05 {
                    stars += 1;
                }
            }
        }
        assert!(stars > 0);
    }

    #[test]
    fn test_soft_style_differs_from_realistic() {
        let real = uniforms(WeatherClass::Cloudy, TimeOfDay::Day, Style::Realistic, 0, 2.0);
        let soft = uniforms(WeatherClass::Cloudy, TimeOfDay::Day, Style::Soft, 0, 2.0);
        let differs = grid().any(|uv| shade(uv, &real) != shade(uv, &soft));
        assert!(differs);
    }

    #[test]
    fn test_out_of_range_variant_renders_as_zero() {
        let mut bad = uniforms(WeatherClass::Clear, TimeOfDay::Day, Style::Realistic, 0, 1.0);
        bad.variant = Variant::new(9);
        let zero = uniforms(WeatherClass::Clear, TimeOfDay::Day, Style::Realistic, 0, 1.0);
        for uv in grid().step_by(5) {
            assert_eq!(shade(uv, &bad), shade(uv, &zero));
        }
    }
}
