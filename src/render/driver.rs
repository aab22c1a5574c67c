//! Render driver: per-frame uniform write, draw, present.
//!
//! The driver owns every GPU object. If the animated path cannot be built, or
//! keeps failing once running, it switches to a static background for the
//! rest of its life: cleared onto the surface when a device exists, and
//! published to the host either way. The host keeps running in every case.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use glam::Vec2;
use tokio::sync::watch;

use crate::atmosphere::{FallbackConfig, RendererConfig, SceneReceiver, SceneState};
use crate::core::error::Error;
use crate::core::time::FrameClock;
use crate::render::buffer::{FrameUniformBlock, UniformBuffer};
use crate::render::context::GpuContext;
use crate::render::fallback::StaticBackground;
use crate::render::pipeline::SkyPipeline;
use crate::sky::FrameUniforms;

/// Consecutive failed GPU frames before the driver gives up on animation.
pub const GPU_FAILURE_LIMIT: u32 = 3;

/// What one call to [`RenderDriver::render_frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was drawn and presented.
    Presented,
    /// Nothing was drawn (zero-sized viewport or a lost surface).
    Skipped,
    /// The driver is in fallback mode; the static background was cleared
    /// onto the surface if there is one, and published to the host.
    Fallback,
}

/// Latest static background, `None` while the animated path is running.
pub type BackgroundReceiver = watch::Receiver<Option<StaticBackground>>;

/// Skips frames while the viewport has no area.
#[derive(Debug, Default)]
struct ViewportGate {
    skipping: bool,
}

impl ViewportGate {
    /// Whether `state` can be drawn. Logs once per skip/resume transition.
    fn admit(&mut self, state: &SceneState) -> bool {
        let [width, height] = state.viewport;
        if state.is_degenerate() {
            if !self.skipping {
                log::debug!("Viewport is {}x{}, skipping frames", width, height);
                self.skipping = true;
            }
            return false;
        }
        if self.skipping {
            log::debug!("Viewport is {}x{}, resuming", width, height);
            self.skipping = false;
        }
        true
    }
}

/// Counts consecutive GPU errors.
#[derive(Debug, Default)]
struct GpuHealth {
    consecutive_failures: u32,
}

impl GpuHealth {
    /// Record one frame. Returns true once the failure streak hits the limit.
    fn record(&mut self, result: &Result<FrameOutcome, Error>) -> bool {
        match result {
            Err(Error::Gpu(_)) => {
                self.consecutive_failures += 1;
                self.consecutive_failures >= GPU_FAILURE_LIMIT
            }
            _ => {
                self.consecutive_failures = 0;
                false
            }
        }
    }
}

struct GpuRenderer {
    context: GpuContext,
    uniforms: UniformBuffer,
    pipeline: SkyPipeline,
}

impl GpuRenderer {
    /// Build the sky pipeline on `context`. On failure the context is handed
    /// back so the surface can still show the static background.
    fn new(context: GpuContext) -> Result<Self, (GpuContext, Error)> {
        let uniforms = UniformBuffer::new(&context.device);
        match SkyPipeline::new(&context.device, context.format(), &uniforms) {
            Ok(pipeline) => Ok(Self {
                context,
                uniforms,
                pipeline,
            }),
            Err(e) => Err((context, e)),
        }
    }

    fn draw(
        &mut self,
        uniforms: &FrameUniforms,
        state: &SceneState,
    ) -> Result<FrameOutcome, Error> {
        fit_surface(&mut self.context, state);

        self.uniforms
            .update(&self.context.queue, &FrameUniformBlock::from(uniforms));

        let output = match self.context.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                self.context.reconfigure();
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Surface timeout, skipping frame");
                return Ok(FrameOutcome::Skipped);
            }
            Err(e) => return Err(Error::Gpu(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sky_encoder"),
            });
        self.pipeline.render(&mut encoder, &view, &self.uniforms);
        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(FrameOutcome::Presented)
    }
}

fn fit_surface(context: &mut GpuContext, state: &SceneState) {
    let [width, height] = state.viewport;
    if context.size() != (width, height) {
        context.resize(width, height);
    }
}

enum DriverMode {
    Gpu(GpuRenderer),
    /// Static background, cleared onto the surface when a device exists.
    Fallback(Option<GpuContext>),
}

/// Owns the GPU pipeline and draws one frame per call.
pub struct RenderDriver {
    mode: DriverMode,
    fallback: FallbackConfig,
    background: watch::Sender<Option<StaticBackground>>,
    gate: ViewportGate,
    health: GpuHealth,
}

impl RenderDriver {
    /// Set up the GPU path for `target`, or fall back to a static background
    /// if anything on the way fails. Never returns an error.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        state: &SceneState,
        config: &RendererConfig,
    ) -> Self {
        let size = (state.viewport[0], state.viewport[1]);
        let context = match GpuContext::new(target, size, config).await {
            Ok(context) => context,
            Err(e) => {
                log::error!("GPU unavailable, using static background: {}", e);
                return Self::fallback(state, config);
            }
        };
        match GpuRenderer::new(context) {
            Ok(gpu) => Self::with_mode(DriverMode::Gpu(gpu), state, config),
            Err((context, e)) => {
                log::error!("Animated sky unavailable, clearing to static background: {}", e);
                Self::with_mode(DriverMode::Fallback(Some(context)), state, config)
            }
        }
    }

    /// A driver without a device that only ever publishes the static
    /// background for the host to paint.
    pub fn fallback(state: &SceneState, config: &RendererConfig) -> Self {
        Self::with_mode(DriverMode::Fallback(None), state, config)
    }

    fn with_mode(mode: DriverMode, state: &SceneState, config: &RendererConfig) -> Self {
        let (background, _) = watch::channel(None);
        let driver = Self {
            mode,
            fallback: config.fallback.clone(),
            background,
            gate: ViewportGate::default(),
            health: GpuHealth::default(),
        };
        if driver.is_fallback() {
            driver.publish_background(state);
        }
        driver
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.mode, DriverMode::Fallback(_))
    }

    /// The static background, when in fallback mode.
    pub fn background(&self) -> Option<StaticBackground> {
        *self.background.borrow()
    }

    /// Follow the static background from another thread. Stays `None` while
    /// the animated path runs and tracks the scene state once it falls back.
    pub fn subscribe_background(&self) -> BackgroundReceiver {
        self.background.subscribe()
    }

    fn publish_background(&self, state: &SceneState) {
        let next = Some(StaticBackground::for_state(state, &self.fallback));
        self.background.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn give_up_on_gpu(&mut self, state: &SceneState) {
        log::error!(
            "{} GPU frames failed in a row, switching to static background",
            GPU_FAILURE_LIMIT
        );
        let context = match std::mem::replace(&mut self.mode, DriverMode::Fallback(None)) {
            DriverMode::Gpu(gpu) => Some(gpu.context),
            DriverMode::Fallback(context) => context,
        };
        self.mode = DriverMode::Fallback(context);
        self.publish_background(state);
    }

    /// Draw one frame of `state` at `time` seconds.
    ///
    /// The whole uniform block is written before the draw, so a frame never
    /// mixes two states. Zero-sized viewports skip the frame in every mode.
    pub fn render_frame(&mut self, time: f32, state: &SceneState) -> Result<FrameOutcome, Error> {
        if self.is_fallback() {
            self.publish_background(state);
        }
        if !self.gate.admit(state) {
            return Ok(FrameOutcome::Skipped);
        }

        let result = match &mut self.mode {
            DriverMode::Gpu(gpu) => gpu.draw(&FrameUniforms::new(time, state), state),
            DriverMode::Fallback(Some(context)) => {
                fit_surface(context, state);
                let background = *self.background.borrow();
                let color = background.map_or([0.0; 3], |bg| bg.pixel(Vec2::splat(0.5)).to_array());
                match context.present_clear(color) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        context.reconfigure()
                    }
                    Err(e) => log::debug!("Static background not presented: {}", e),
                }
                Ok(FrameOutcome::Fallback)
            }
            DriverMode::Fallback(None) => Ok(FrameOutcome::Fallback),
        };

        if self.health.record(&result) {
            self.give_up_on_gpu(state);
        }
        result
    }
}

/// Dedicated thread running the fixed-rate frame loop.
pub struct RenderThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    background: BackgroundReceiver,
}

impl RenderThread {
    /// Start the loop. The driver moves to the new thread and is dropped
    /// there when the loop ends.
    pub fn spawn(
        mut driver: RenderDriver,
        mut receiver: SceneReceiver,
        config: &RendererConfig,
    ) -> Result<Self, Error> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let frame_rate = config.frame_rate;
        let background = driver.subscribe_background();

        let handle = std::thread::Builder::new()
            .name("skymood-render".into())
            .spawn(move || {
                let mut clock = FrameClock::new(frame_rate);
                log::info!(
                    "Render thread started at {} fps ({:?} per frame)",
                    frame_rate,
                    clock.frame_interval()
                );
                let mut attached = false;
                while !thread_stop.load(Ordering::Acquire) {
                    let (state, changed) = receiver.latest();
                    if changed {
                        log::debug!("Scene state changed: {:?}", state);
                    }
                    // Nothing is visible while detached, so the time jump is free
                    if !state.is_degenerate() && !attached && clock.frame_count() > 0 {
                        log::debug!("Surface re-attached, restarting animation clock");
                        clock.restart();
                    }
                    attached = !state.is_degenerate();

                    if let Err(e) = driver.render_frame(clock.elapsed_secs(), &state) {
                        log::warn!("Frame failed: {}", e);
                    }
                    clock.tick();
                    if clock.frame_count() % (frame_rate.max(1) as u64 * 10) == 0 {
                        log::debug!("Render loop at {:.1} fps", clock.fps());
                    }
                    clock.sleep_until_next_tick();
                }
                drop(driver);
                log::info!("Render thread stopped after {} frames", clock.frame_count());
            })
            .map_err(|e| Error::RenderThread(e.to_string()))?;

        Ok(Self {
            stop,
            handle: Some(handle),
            background,
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// The static background the host should paint, or `None` while the
    /// animated sky is on screen.
    pub fn background(&self) -> Option<StaticBackground> {
        *self.background.borrow()
    }

    /// A receiver that wakes whenever the static background changes.
    pub fn subscribe_background(&self) -> BackgroundReceiver {
        self.background.clone()
    }

    /// Stop issuing frames, release the pipeline and join the thread.
    pub fn stop(&mut self) -> Result<(), Error> {
        self.stop.store(true, Ordering::Release);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| Error::RenderThread("render thread panicked".into())),
            None => Ok(()),
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::{scene_channel, FallbackMode, TimeOfDay, WeatherClass};
    use std::time::{Duration, Instant};

    fn config() -> RendererConfig {
        RendererConfig {
            frame_rate: 120,
            ..Default::default()
        }
    }

    fn sized(width: u32, height: u32) -> SceneState {
        SceneState {
            viewport: [width, height],
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_driver_tracks_state() {
        let mut state = sized(64, 64);
        let mut driver = RenderDriver::fallback(&state, &config());
        assert!(driver.is_fallback());
        let before = driver.background().expect("background");

        state.time_of_day = TimeOfDay::Night;
        state.weather = WeatherClass::Storm;
        assert_eq!(driver.render_frame(0.5, &state).ok(), Some(FrameOutcome::Fallback));
        let after = driver.background().expect("background");
        assert_ne!(before, after);
        assert_eq!(after, StaticBackground::for_state(&state, &config().fallback));
    }

    #[test]
    fn test_fallback_solid_color() {
        let mut cfg = config();
        cfg.fallback.mode = FallbackMode::Solid;
        cfg.fallback.color = Some([0.2, 0.2, 0.2]);
        let driver = RenderDriver::fallback(&SceneState::default(), &cfg);
        let bg = driver.background().expect("background");
        assert_eq!(bg.top, bg.bottom);
    }

    #[test]
    fn test_zero_viewport_skips_then_resumes() {
        let mut driver = RenderDriver::fallback(&sized(64, 64), &config());
        assert_eq!(driver.render_frame(0.0, &sized(64, 64)).ok(), Some(FrameOutcome::Fallback));
        assert_eq!(driver.render_frame(0.1, &sized(0, 0)).ok(), Some(FrameOutcome::Skipped));
        assert_eq!(driver.render_frame(0.2, &sized(0, 48)).ok(), Some(FrameOutcome::Skipped));
        assert_eq!(driver.render_frame(0.3, &sized(64, 48)).ok(), Some(FrameOutcome::Fallback));
    }

    #[test]
    fn test_viewport_gate_transitions() {
        let mut gate = ViewportGate::default();
        assert!(gate.admit(&sized(320, 200)));
        assert!(!gate.admit(&sized(0, 0)));
        assert!(gate.skipping);
        assert!(!gate.admit(&sized(320, 0)));
        assert!(gate.admit(&sized(320, 200)));
        assert!(!gate.skipping);
    }

    #[test]
    fn test_repeated_gpu_errors_give_up() {
        let mut health = GpuHealth::default();
        let failed = || -> Result<FrameOutcome, Error> { Err(Error::Gpu("out of memory".into())) };
        for _ in 1..GPU_FAILURE_LIMIT {
            assert!(!health.record(&failed()));
        }
        assert!(health.record(&failed()));
    }

    #[test]
    fn test_good_frame_resets_gpu_error_streak() {
        let mut health = GpuHealth::default();
        for _ in 1..GPU_FAILURE_LIMIT {
            health.record(&Err(Error::Gpu("timeout".into())));
        }
        assert!(!health.record(&Ok(FrameOutcome::Presented)));
        assert!(!health.record(&Err(Error::Gpu("timeout".into()))));
        // Non-GPU errors do not count
        assert!(!health.record(&Err(Error::RenderThread("x".into()))));
    }

    #[test]
    fn test_give_up_publishes_current_state() {
        let mut driver = RenderDriver::fallback(&sized(32, 32), &config());
        let mut updates = driver.subscribe_background();
        updates.borrow_and_update();

        let state = SceneState {
            weather: WeatherClass::Overcast,
            ..sized(32, 32)
        };
        driver.give_up_on_gpu(&state);
        assert!(driver.is_fallback());
        assert!(updates.has_changed().unwrap_or(false));
        assert_eq!(
            *updates.borrow(),
            Some(StaticBackground::for_state(&state, &config().fallback))
        );
    }

    #[test]
    fn test_host_sees_background_through_render_thread() {
        let (handle, receiver) = scene_channel(sized(64, 64));
        let driver = RenderDriver::fallback(&sized(64, 64), &config());
        let mut thread = RenderThread::spawn(driver, receiver, &config()).expect("spawn");
        assert!(thread.background().is_some());

        handle.set_weather_class(WeatherClass::Storm);
        handle.set_time_of_day(TimeOfDay::Night);
        let expected = StaticBackground::for_state(&handle.current(), &config().fallback);

        let deadline = Instant::now() + Duration::from_secs(2);
        while thread.background() != Some(expected) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(thread.background(), Some(expected));
        assert_eq!(thread.subscribe_background().borrow().as_ref(), Some(&expected));
        thread.stop().expect("stop");
    }

    #[test]
    fn test_render_thread_stops_and_joins() {
        let (handle, receiver) = scene_channel(SceneState::default());
        let driver = RenderDriver::fallback(&SceneState::default(), &config());
        let mut thread = RenderThread::spawn(driver, receiver, &config()).expect("spawn");
        handle.attach_to_surface(320, 200);
        handle.set_weather_class(WeatherClass::Overcast);
        std::thread::sleep(Duration::from_millis(50));
        assert!(thread.is_running());
        thread.stop().expect("stop");
        assert!(!thread.is_running());
        // Second stop is a no-op
        thread.stop().expect("stop again");
    }
}
