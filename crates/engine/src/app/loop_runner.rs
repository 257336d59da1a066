use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::{Error as PixelsError, TextureError};
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use super::game::GameRuntime;
use super::input::InputCollector;
use super::metrics::MetricsAccumulator;
use super::scheduler::{
    compute_cap_sleep, normalize_non_zero_duration, normalize_render_fps_cap,
    target_frame_duration, FixedStepClock,
};
use super::{Game, LoopCommand, MetricsHandle, Renderer};

pub const SLOW_FRAME_ENV_VAR: &str = "SHAPESHIFTER_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    /// Logical canvas size. Also the initial window size.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Shapeshifter in the Forest".to_string(),
            canvas_width: 800,
            canvas_height: 600,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("failed to resize drawing surface to {width}x{height}: {source}")]
    ResizeSurface {
        width: u32,
        height: u32,
        #[source]
        source: TextureError,
    },
    #[error("failed to draw frame: {0}")]
    Render(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, game: Box<dyn Game>) -> Result<(), AppError> {
    let metrics_handle = MetricsHandle::default();
    run_app_with_metrics(config, game, metrics_handle)
}

/// Opens the window and drives `game` until quit or a fatal render error.
///
/// Ticks run on this thread, strictly one after another, only in response to
/// the host's redraw signal.
pub fn run_app_with_metrics(
    config: LoopConfig,
    game: Box<dyn Game>,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    let mut runtime = GameRuntime::new(game);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.canvas_width as f64,
                config.canvas_height as f64,
            ))
            .with_min_inner_size(LogicalSize::new(1.0, 1.0))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(
        Arc::clone(&window),
        config.canvas_width,
        config.canvas_height,
    )
    .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let mut clock = FixedStepClock::new(
        config.target_tps,
        config.max_frame_delta,
        config.max_ticks_per_frame,
        Instant::now(),
    );
    let mut input_collector = InputCollector::new();
    runtime.load();

    info!(
        canvas_width = config.canvas_width,
        canvas_height = config.canvas_height,
        target_tps = config.target_tps.max(1),
        fixed_dt_ms = clock.fixed_dt().as_secs_f64() * 1000.0,
        max_frame_delta_ms = clock.max_frame_delta().as_millis() as u64,
        max_ticks_per_frame = clock.max_ticks_per_frame(),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_applied_title: Option<String> = None;
    let mut fatal_error: Option<AppError> = None;
    let fatal_slot = &mut fatal_error;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(source) = renderer.resize(new_size.width, new_size.height) {
                        error!(error = %source, "render_failed");
                        *fatal_slot = Some(AppError::ResizeSurface {
                            width: new_size.width,
                            height: new_size.height,
                            source,
                        });
                        window_target.exit();
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if fatal_slot.is_some() {
                        return;
                    }
                    if slow_frame_delay > Duration::ZERO {
                        // Explicit debug perturbation only; this is not the FPS cap.
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let (step_plan, raw_frame_dt) = clock.on_frame(now);
                    let command = clock.run_ticks(
                        step_plan,
                        &mut runtime,
                        &mut input_collector,
                        &mut metrics_accumulator,
                    );
                    if command == LoopCommand::Quit {
                        info!(
                            reason = "game_quit",
                            tick = clock.tick_counter(),
                            "shutdown_requested"
                        );
                        window_target.exit();
                        return;
                    }

                    // Single authoritative FPS cap sleep point for render pacing.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    if let Err(source) = renderer.render(runtime.game()) {
                        error!(error = %source, "render_failed");
                        *fatal_slot = Some(AppError::Render(source));
                        window_target.exit();
                        return;
                    }
                    last_present_instant = Instant::now();

                    let next_title = runtime.title();
                    if next_title != last_applied_title {
                        match &next_title {
                            Some(title) => window.set_title(title),
                            None => window.set_title(&config.window_title),
                        }
                        last_applied_title = next_title;
                    }
                    metrics_accumulator.record_frame(raw_frame_dt);

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        metrics_handle.publish(snapshot);
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            failed_ticks = snapshot.failed_ticks,
                            overrun_ticks = snapshot.overrun_ticks,
                            dropped_ticks = snapshot.dropped_ticks,
                            tick = clock.tick_counter(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                runtime.shutdown();
                info!(tick = clock.tick_counter(), "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)?;

    match fatal_error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    parse_slow_frame_delay(env::var(SLOW_FRAME_ENV_VAR), config_slow_frame_ms)
}

fn parse_slow_frame_delay(
    raw: Result<String, env::VarError>,
    config_slow_frame_ms: u64,
) -> Duration {
    match raw {
        Ok(value) => match value.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                Duration::from_millis(config_slow_frame_ms)
            }
        },
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_placeholder_canvas() {
        let config = LoopConfig::default();
        assert_eq!((config.canvas_width, config.canvas_height), (800, 600));
        assert_eq!(config.target_tps, 60);
    }

    #[test]
    fn slow_frame_env_value_overrides_config() {
        let delay = parse_slow_frame_delay(Ok("40".to_string()), 5);
        assert_eq!(delay, Duration::from_millis(40));
    }

    #[test]
    fn slow_frame_falls_back_to_config_when_unset_or_invalid() {
        assert_eq!(
            parse_slow_frame_delay(Err(env::VarError::NotPresent), 7),
            Duration::from_millis(7)
        );
        assert_eq!(
            parse_slow_frame_delay(Ok("fast".to_string()), 7),
            Duration::from_millis(7)
        );
    }

    #[test]
    fn render_cap_formats_off_when_disabled() {
        assert_eq!(format_render_cap(None), "off");
        assert_eq!(format_render_cap(Some(144)), "144");
    }
}
