//! Rendering: GPU context, sky pipeline, frame driver, CPU and fallback paths

pub mod buffer;
pub mod context;
pub mod driver;
pub mod fallback;
pub mod pipeline;
pub mod software;

pub use driver::{FrameOutcome, RenderDriver, RenderThread};
pub use fallback::StaticBackground;
