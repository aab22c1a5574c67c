//! Render pipelines

pub mod sky;

pub use sky::{SkyPipeline, validate_shader};
