//! Skymood - procedural weather-animation sky renderer
//!
//! Turns four categorical inputs (weather class, time of day, style,
//! variant) and a clock into an animated sky, one full-screen pass per
//! frame. [`sky`] holds the per-pixel math (mirrored by `shaders/sky.wgsl`),
//! [`render`] the GPU driver, and [`atmosphere`] the host-facing inputs.

pub mod atmosphere;
pub mod core;
pub mod render;
pub mod sky;

pub use atmosphere::{
    RendererConfig, SceneHandle, SceneState, Style, TimeOfDay, Variant, WeatherClass,
};
pub use crate::core::error::Error;
