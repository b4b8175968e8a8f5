use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::level::{load_level, LevelLoadError};
use crate::{resolve_app_paths, StartupError};

use super::frame_loop::FrameLoop;
use super::input::{Direction, InputSnapshot, InputSource};
use super::movement::{ActorConfig, MovementConfig, MovementController};
use super::pacing::{format_fps_cap, normalize_fps_cap, FixedRateClock};
use super::profiler::LoopProfiler;
use super::rendering::{PixelsRenderer, RenderError, Viewport};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: Option<u32>,
    pub metrics_log_interval: Duration,
    pub actor: ActorConfig,
    pub movement: MovementConfig,
    pub map_override: Option<PathBuf>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Tilewalk".to_string(),
            window_width: 320,
            window_height: 240,
            target_fps: Some(60),
            metrics_log_interval: Duration::from_secs(5),
            actor: ActorConfig::default(),
            movement: MovementConfig::default(),
            map_override: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load level: {0}")]
    Level(#[from] LevelLoadError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Loads the level, opens the window and drives the frame loop until quit.
pub fn run_app(config: LoopConfig) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    let mut level_paths = app_paths.level.clone();
    if let Some(map) = &config.map_override {
        level_paths.map = map.clone();
    }
    info!(
        root = %app_paths.root.display(),
        map = %level_paths.map.display(),
        tileset_meta = %level_paths.tileset_meta.display(),
        "startup"
    );
    let level = load_level(&level_paths)?;

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer = PixelsRenderer::new(
        Arc::clone(&window),
        config.window_width,
        config.window_height,
        &level_paths,
    )
    .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let fps_cap = normalize_fps_cap(config.target_fps);
    let metrics_log_interval = normalize_non_zero_duration(
        config.metrics_log_interval,
        Duration::from_secs(5),
    );
    info!(
        window_width = config.window_width,
        window_height = config.window_height,
        fps_cap = %format_fps_cap(fps_cap),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        foot_offset_px = config.movement.foot_offset_px,
        map_offset_x = config.movement.map_offset_tiles.0,
        map_offset_y = config.movement.map_offset_tiles.1,
        "loop_config"
    );

    let mut frame_loop = FrameLoop::new(
        level,
        MovementController::new(config.actor.spawn_actor(), config.movement),
        Viewport {
            width: config.window_width,
            height: config.window_height,
        },
        renderer,
        FixedRateClock::new(fps_cap),
        LoopProfiler::new(metrics_log_interval),
    );
    let mut input_collector = InputCollector::default();
    let mut render_failure: Option<RenderError> = None;
    frame_loop.start();

    event_loop
        .run(|event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "quit_signal");
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = frame_loop
                        .renderer_mut()
                        .resize_surface(new_size.width, new_size.height)
                    {
                        warn!(error = %error, "renderer_resize_failed");
                        render_failure = Some(error);
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let was_quit = input_collector.quit_requested;
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested && !was_quit {
                        info!(reason = "escape_key", "quit_signal");
                    }
                }
                WindowEvent::RedrawRequested => {
                    if !frame_loop.is_running() {
                        return;
                    }
                    let snapshot = input_collector.poll();
                    match frame_loop.tick(snapshot) {
                        Ok(report) if report.running => frame_loop.wait_for_next_frame(),
                        Ok(_) => window_target.exit(),
                        Err(error) => {
                            warn!(error = %error, "renderer_draw_failed");
                            render_failure = Some(error);
                            window_target.exit();
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                let report = frame_loop.finish();
                info!(ticks = report.ticks, "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)?;

    match render_failure {
        Some(error) => Err(AppError::Render(error)),
        None => Ok(()),
    }
}

/// Tracks held movement keys between ticks and latches the quit signal.
#[derive(Debug, Default)]
struct InputCollector {
    held: InputSnapshot,
    quit_requested: bool,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let direction = match key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                Direction::Up
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                Direction::Down
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                Direction::Left
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                Direction::Right
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                if is_pressed {
                    self.mark_quit_requested();
                }
                return;
            }
            _ => return,
        };
        self.held = self.held.with_held(direction, is_pressed);
    }
}

impl InputSource for InputCollector {
    fn poll(&mut self) -> InputSnapshot {
        self.held.with_quit_requested(self.quit_requested)
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
