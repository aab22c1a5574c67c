//! Per-frame inputs to the sky evaluator.

use glam::Vec2;

use crate::atmosphere::{SceneState, Style, TimeOfDay, Variant, WeatherClass};

/// Everything one frame depends on besides the pixel coordinate.
///
/// Built once per frame and never mutated while that frame is evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    /// Seconds since the renderer started (monotonic).
    pub time: f32,
    /// Viewport size in physical pixels.
    pub viewport: Vec2,
    pub weather: WeatherClass,
    pub time_of_day: TimeOfDay,
    pub style: Style,
    pub variant: Variant,
}

impl FrameUniforms {
    /// Snapshot of `state` at `time`.
    pub fn new(time: f32, state: &SceneState) -> Self {
        Self {
            time,
            viewport: Vec2::new(state.viewport[0] as f32, state.viewport[1] as f32),
            weather: state.weather,
            time_of_day: state.time_of_day,
            style: state.style,
            variant: state.variant,
        }
    }

    /// Width over height. Degenerate sizes are treated as one pixel.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.viewport.x.max(1.0) / self.viewport.y.max(1.0)
    }

    /// Aspect-corrected coordinates centred on the frame, y up.
    ///
    /// `uv` has its origin at the top-left corner. The result spans
    /// `[-aspect/2, aspect/2] x [-0.5, 0.5]`.
    #[inline]
    pub fn centered(&self, uv: Vec2) -> Vec2 {
        Vec2::new((uv.x - 0.5) * self.aspect(), 0.5 - uv.y)
    }

    /// Inverse of [`centered`](Self::centered).
    #[inline]
    pub fn uv_for(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.aspect() + 0.5, 0.5 - p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniforms(w: u32, h: u32) -> FrameUniforms {
        FrameUniforms::new(
            0.0,
            &SceneState {
                viewport: [w, h],
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_centered_corners() {
        let u = uniforms(400, 200);
        assert_eq!(u.centered(Vec2::new(0.5, 0.5)), Vec2::ZERO);
        assert_eq!(u.centered(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 0.5));
        assert_eq!(u.centered(Vec2::new(1.0, 1.0)), Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_uv_roundtrip() {
        let u = uniforms(300, 180);
        let p = Vec2::new(0.22, 0.3);
        assert!(u.centered(u.uv_for(p)).abs_diff_eq(p, 1e-6));
    }

    #[test]
    fn test_degenerate_viewport_is_finite() {
        let u = uniforms(0, 0);
        assert_eq!(u.aspect(), 1.0);
        assert!(u.centered(Vec2::new(0.3, 0.7)).is_finite());
    }
}
