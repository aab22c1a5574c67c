//! Scene state shared between the host and the render thread.
//!
//! The host owns a [`SceneHandle`] and may call its setters from any thread at
//! any time. The render thread owns the matching [`SceneReceiver`] and reads it
//! exactly once per frame. The cell holds a single value: intermediate states
//! written between two frames are never observed (latest value wins).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::atmosphere::time::TimeOfDay;
use crate::atmosphere::weather::WeatherClass;

/// Rendering path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Full noise-driven pipeline: clouds, celestial bodies, particles.
    #[default]
    Realistic,
    /// Flat glass look built from blurred bokeh blobs.
    Soft,
}

impl Style {
    #[inline]
    pub fn index(self) -> u32 {
        match self {
            Style::Realistic => 0,
            Style::Soft => 1,
        }
    }
}

/// Per-session visual variant, always in `0..Variant::COUNT`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Variant(u8);

impl Variant {
    pub const COUNT: u8 = 4;

    /// Out-of-range indices fall back to variant 0.
    pub fn new(index: u8) -> Self {
        if index < Self::COUNT {
            Self(index)
        } else {
            log::warn!("variant {index} out of range, using 0");
            Self(0)
        }
    }

    /// Pick a variant from the wall clock. Good enough for a once-per-session
    /// random choice.
    pub fn random() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        Self((nanos % Self::COUNT as u32) as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The next variant, wrapping around.
    pub fn next(self) -> Self {
        Self((self.0 + 1) % Self::COUNT)
    }
}

impl From<u8> for Variant {
    fn from(index: u8) -> Self {
        Self::new(index)
    }
}

impl From<Variant> for u8 {
    fn from(variant: Variant) -> Self {
        variant.0
    }
}

/// Everything the host tells the renderer. Replaced wholesale between frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneState {
    #[serde(default)]
    pub weather: WeatherClass,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub variant: Variant,
    /// Surface size in physical pixels. `[0, 0]` until the host attaches.
    #[serde(default)]
    pub viewport: [u32; 2],
}

impl SceneState {
    /// Whether the viewport has no area (nothing can be drawn).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.viewport[0] == 0 || self.viewport[1] == 0
    }
}

/// Create a connected handle/receiver pair seeded with `initial`.
pub fn scene_channel(initial: SceneState) -> (SceneHandle, SceneReceiver) {
    let (tx, rx) = watch::channel(initial);
    (SceneHandle { tx: Arc::new(tx) }, SceneReceiver { rx })
}

/// Host-side writer. Cheap to clone; every clone writes the same cell.
#[derive(Clone, Debug)]
pub struct SceneHandle {
    tx: Arc<watch::Sender<SceneState>>,
}

impl SceneHandle {
    pub fn set_weather_class(&self, weather: WeatherClass) {
        self.update(|s| s.weather = weather);
    }

    pub fn set_time_of_day(&self, time_of_day: TimeOfDay) {
        self.update(|s| s.time_of_day = time_of_day);
    }

    pub fn set_style(&self, style: Style) {
        self.update(|s| s.style = style);
    }

    /// Out-of-range indices are clamped to variant 0.
    pub fn set_variant(&self, variant: u8) {
        let variant = Variant::new(variant);
        self.update(|s| s.variant = variant);
    }

    /// Viewport size in physical pixels. A 0x0 size pauses drawing until a
    /// valid size arrives.
    pub fn attach_to_surface(&self, width: u32, height: u32) {
        self.update(|s| s.viewport = [width, height]);
    }

    /// Replace the whole state at once.
    pub fn replace(&self, state: SceneState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    /// The most recently written state.
    pub fn current(&self) -> SceneState {
        *self.tx.borrow()
    }

    /// A second reader of the same cell (e.g. for a host-side fallback painter).
    pub fn subscribe(&self) -> SceneReceiver {
        SceneReceiver { rx: self.tx.subscribe() }
    }

    // Applied under the cell's lock so concurrent setters never lose a field.
    fn update(&self, apply: impl FnOnce(&mut SceneState)) {
        self.tx.send_if_modified(|current| {
            let before = *current;
            apply(current);
            *current != before
        });
    }
}

/// Render-side reader.
#[derive(Debug)]
pub struct SceneReceiver {
    rx: watch::Receiver<SceneState>,
}

impl SceneReceiver {
    /// Read the latest state and whether it changed since the previous call.
    ///
    /// Once the host has dropped every handle the last written state keeps
    /// being returned, reported as unchanged.
    pub fn latest(&mut self) -> (SceneState, bool) {
        let changed = self.rx.has_changed().unwrap_or(false);
        let state = *self.rx.borrow_and_update();
        (state, changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_clamps_out_of_range() {
        assert_eq!(Variant::new(3).get(), 3);
        assert_eq!(Variant::new(4).get(), 0);
        assert_eq!(Variant::new(255).get(), 0);
    }

    #[test]
    fn test_variant_next_wraps() {
        assert_eq!(Variant::new(3).next().get(), 0);
        assert_eq!(Variant::new(1).next().get(), 2);
    }

    #[test]
    fn test_variant_random_in_range() {
        for _ in 0..16 {
            assert!(Variant::random().get() < Variant::COUNT);
        }
    }

    #[test]
    fn test_variant_deserialize_clamps() {
        let v: Variant = serde_json::from_str("9").unwrap();
        assert_eq!(v.get(), 0);
    }

    #[test]
    fn test_latest_value_wins() {
        let (handle, mut rx) = scene_channel(SceneState::default());
        let (_, changed) = rx.latest();
        assert!(!changed);

        handle.set_weather_class(WeatherClass::Cloudy);
        handle.set_weather_class(WeatherClass::Storm);
        handle.set_time_of_day(TimeOfDay::Night);

        let (state, changed) = rx.latest();
        assert!(changed);
        assert_eq!(state.weather, WeatherClass::Storm);
        assert_eq!(state.time_of_day, TimeOfDay::Night);

        // Read exactly once: a second read without writes reports no change
        let (_, changed) = rx.latest();
        assert!(!changed);
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let (handle, mut rx) = scene_channel(SceneState::default());
        handle.set_style(Style::Realistic);
        let (_, changed) = rx.latest();
        assert!(!changed);
    }

    #[test]
    fn test_updates_from_other_threads() {
        let (handle, mut rx) = scene_channel(SceneState::default());
        let writers: Vec<_> = (0..4u32)
            .map(|i| {
                let h = handle.clone();
                std::thread::spawn(move || h.attach_to_surface(100 + i, 50))
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }
        let (state, changed) = rx.latest();
        assert!(changed);
        assert!((100..104).contains(&state.viewport[0]));
        assert_eq!(state.viewport[1], 50);
    }

    #[test]
    fn test_receiver_survives_dropped_handle() {
        let (handle, mut rx) = scene_channel(SceneState::default());
        handle.set_variant(2);
        drop(handle);
        let (state, changed) = rx.latest();
        assert!(!changed);
        assert_eq!(state.variant.get(), 2);
    }

    #[test]
    fn test_degenerate_viewport() {
        let mut s = SceneState::default();
        assert!(s.is_degenerate());
        s.viewport = [320, 0];
        assert!(s.is_degenerate());
        s.viewport = [320, 200];
        assert!(!s.is_degenerate());
    }
}
