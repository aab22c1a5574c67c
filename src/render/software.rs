//! CPU frame evaluation.
//!
//! Runs the same per-pixel function as the GPU pass, one row per rayon task.
//! Used by hosts without a surface and by tests that compare whole frames.

use glam::Vec2;
use image::RgbaImage;
use rayon::prelude::*;

use crate::render::fallback::to_u8;
use crate::sky::{FrameUniforms, shade};

/// Evaluate one frame at pixel centres.
pub fn render_frame(uniforms: &FrameUniforms, width: u32, height: u32) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return image;
    }

    let row_bytes = width as usize * 4;
    image
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let v = (y as f32 + 0.5) / height as f32;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let uv = Vec2::new((x as f32 + 0.5) / width as f32, v);
                let c = shade(uv, uniforms);
                px.copy_from_slice(&[to_u8(c.x), to_u8(c.y), to_u8(c.z), to_u8(c.w)]);
            }
        });
    image
}
