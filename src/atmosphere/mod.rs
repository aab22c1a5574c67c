//! Host-facing scene inputs.
//!
//! The four categorical inputs that parameterize a frame ([`WeatherClass`],
//! [`TimeOfDay`], [`Style`], [`Variant`]), the helpers hosts use to derive
//! them, the [`SceneHandle`]/[`SceneReceiver`] cell that carries them to the
//! render thread, and the [`RendererConfig`].

pub mod config;
pub mod state;
pub mod time;
pub mod weather;

// Re-exports
pub use config::{FallbackConfig, FallbackMode, PowerPreference, RendererConfig};
pub use state::{scene_channel, SceneHandle, SceneReceiver, SceneState, Style, Variant};
pub use time::TimeOfDay;
pub use weather::WeatherClass;
