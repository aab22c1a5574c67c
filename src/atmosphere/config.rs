//! Renderer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atmosphere::state::SceneState;
use crate::core::error::Error;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Full renderer configuration. Every field has a default, so a partial JSON
/// document (or `{}`) is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Target ticks per second of the render loop.
    pub frame_rate: u32,
    /// State used until the host sends its first update.
    pub initial_state: SceneState,
    /// Adapter preference.
    pub power_preference: PowerPreference,
    /// Present with vsync (`Fifo`) instead of `AutoNoVsync`.
    pub vsync: bool,
    /// What the host shows if the GPU path cannot be created.
    pub fallback: FallbackConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            initial_state: SceneState::default(),
            // A menu-bar animation should not wake the discrete GPU
            power_preference: PowerPreference::Low,
            vsync: true,
            fallback: FallbackConfig::default(),
        }
    }
}

impl RendererConfig {
    pub const MAX_FRAME_RATE: u32 = 240;

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded renderer config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.frame_rate == 0 || self.frame_rate > Self::MAX_FRAME_RATE {
            return Err(Error::Config(format!(
                "frame_rate must be in 1..={}, got {}",
                Self::MAX_FRAME_RATE,
                self.frame_rate
            )));
        }
        if let Some(color) = self.fallback.color {
            if color.iter().any(|c| !c.is_finite() || !(0.0..=1.0).contains(c)) {
                return Err(Error::Config(format!(
                    "fallback color components must be in [0, 1], got {color:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Adapter power preference, mapped onto `wgpu::PowerPreference`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerPreference {
    #[default]
    Low,
    High,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(pref: PowerPreference) -> Self {
        match pref {
            PowerPreference::Low => wgpu::PowerPreference::LowPower,
            PowerPreference::High => wgpu::PowerPreference::HighPerformance,
        }
    }
}

// ---------------------------------------------------------------------------
// Fallback config
// ---------------------------------------------------------------------------

/// Static background shown when the animated path is unavailable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub mode: FallbackMode,
    /// Overrides the palette-derived color(s) when set (linear RGB, 0-1).
    pub color: Option<[f32; 3]>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Vertical sky gradient from the current palette.
    #[default]
    Gradient,
    /// Single flat color.
    Solid,
}
