//! Skymood - preview host for the sky renderer

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use skymood::atmosphere::{scene_channel, SceneHandle, SceneReceiver};
use skymood::core::logging;
use skymood::render::{software, RenderDriver, RenderThread};
use skymood::sky::FrameUniforms;
use skymood::{Error, RendererConfig, SceneState, Style, TimeOfDay, Variant, WeatherClass};

const USAGE: &str = "\
Usage: skymood [options]

Options:
  --config <path>     Renderer config (JSON)
  --code <wmo>        Initial weather from a WMO condition code
  --hour <0-24>       Initial time of day from a local hour
  --snapshot <path>   Render one frame on the CPU to a PNG and exit
  --size <WxH>        Snapshot size (default 640x360)
  --time <seconds>    Snapshot time (default 0)

Keys:
  1-4  clear / cloudy / overcast / storm
  D S N  day / sunset / night
  R G  realistic / glass style
  V    next variant
  Esc  quit";

struct App {
    config: RendererConfig,
    handle: SceneHandle,
    receiver: Option<SceneReceiver>,
    window: Option<Arc<Window>>,
    render_thread: Option<RenderThread>,
}

impl App {
    fn new(config: RendererConfig) -> Self {
        let (handle, receiver) = scene_channel(config.initial_state);
        Self {
            config,
            handle,
            receiver: Some(receiver),
            window: None,
            render_thread: None,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut thread) = self.render_thread.take() {
            if let Err(e) = thread.stop() {
                log::error!("{}", e);
            }
        }
        event_loop.exit();
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        match key {
            KeyCode::Escape => self.shutdown(event_loop),
            KeyCode::Digit1 => self.handle.set_weather_class(WeatherClass::Clear),
            KeyCode::Digit2 => self.handle.set_weather_class(WeatherClass::Cloudy),
            KeyCode::Digit3 => self.handle.set_weather_class(WeatherClass::Overcast),
            KeyCode::Digit4 => self.handle.set_weather_class(WeatherClass::Storm),
            KeyCode::KeyD => self.handle.set_time_of_day(TimeOfDay::Day),
            KeyCode::KeyS => self.handle.set_time_of_day(TimeOfDay::Sunset),
            KeyCode::KeyN => self.handle.set_time_of_day(TimeOfDay::Night),
            KeyCode::KeyR => self.handle.set_style(Style::Realistic),
            KeyCode::KeyG => self.handle.set_style(Style::Soft),
            KeyCode::KeyV => {
                let next = self.handle.current().variant.next();
                self.handle.set_variant(next.get());
            }
            _ => return,
        }
        log::info!("Scene: {:?}", self.handle.current());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Skymood")
            .with_inner_size(PhysicalSize::new(640, 360));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("{}", Error::Window(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.handle.attach_to_surface(size.width, size.height);
        log::info!("Window created: {}x{}", size.width, size.height);

        let driver = pollster::block_on(RenderDriver::new(
            window.clone(),
            &self.handle.current(),
            &self.config,
        ));

        let Some(receiver) = self.receiver.take() else {
            return;
        };
        match RenderThread::spawn(driver, receiver, &self.config) {
            Ok(thread) => {
                if let Some(background) = thread.background() {
                    log::warn!(
                        "Running with the static background ({} to {})",
                        background.top,
                        background.bottom
                    );
                }
                self.render_thread = Some(thread);
            }
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
            }
        }
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                self.handle.attach_to_surface(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        self.handle_key(key, event_loop);
                    }
                }
            }
            _ => {}
        }
    }
}

struct Args {
    config: Option<PathBuf>,
    code: Option<u16>,
    hour: Option<f32>,
    snapshot: Option<PathBuf>,
    size: (u32, u32),
    time: f32,
}

fn parse_args(args: &[String]) -> Result<Args, Error> {
    let mut parsed = Args {
        config: None,
        code: None,
        hour: None,
        snapshot: None,
        size: (640, 360),
        time: 0.0,
    };
    let mut iter = args.iter().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| Error::Config(format!("{flag} needs a value")))
        };
        let bad = |what: &str| Error::Config(format!("invalid {what} for {flag}"));
        match flag.as_str() {
            "--config" | "-c" => parsed.config = Some(PathBuf::from(value()?)),
            "--code" => parsed.code = Some(value()?.parse().map_err(|_| bad("code"))?),
            "--hour" => parsed.hour = Some(value()?.parse().map_err(|_| bad("hour"))?),
            "--snapshot" => parsed.snapshot = Some(PathBuf::from(value()?)),
            "--time" => parsed.time = value()?.parse().map_err(|_| bad("time"))?,
            "--size" => {
                let v = value()?;
                let (w, h) = v.split_once('x').ok_or_else(|| bad("size"))?;
                parsed.size = (
                    w.parse().map_err(|_| bad("width"))?,
                    h.parse().map_err(|_| bad("height"))?,
                );
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(Error::Config(format!("unknown argument {other}\n\n{USAGE}"))),
        }
    }
    Ok(parsed)
}

fn run() -> Result<(), Error> {
    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args)?;

    let mut config = match &args.config {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };
    if let Some(code) = args.code {
        config.initial_state.weather = WeatherClass::from_condition_code(code);
    }
    if let Some(hour) = args.hour {
        config.initial_state.time_of_day = TimeOfDay::from_hour(hour);
    }
    if args.config.is_none() {
        config.initial_state.variant = Variant::random();
    }

    if let Some(path) = &args.snapshot {
        let state = SceneState {
            viewport: [args.size.0, args.size.1],
            ..config.initial_state
        };
        let (width, height) = args.size;
        let frame = software::render_frame(&FrameUniforms::new(args.time, &state), width, height);
        frame
            .save(path)
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        log::info!("Wrote {}x{} snapshot of {:?} to {}", width, height, state, path.display());
        return Ok(());
    }

    let event_loop = EventLoop::new().map_err(|e| Error::Window(e.to_string()))?;
    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::Window(e.to_string()))
}

fn main() {
    logging::init();
    log::info!("Skymood starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
