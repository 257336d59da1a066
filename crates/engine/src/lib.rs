//! Host plumbing for a single-window, single-player 2D game.
//!
//! The engine owns the window, the fixed-step scheduler, raw input
//! collection and the drawing surface. Game logic plugs in through [`Game`].

pub mod app;

pub use app::{
    run_app, run_app_with_metrics, AppError, Frame, Game, InputAction, InputSnapshot, LoopCommand,
    LoopConfig, LoopMetricsSnapshot, MetricsHandle, ParseColorError, Renderer, Rgba, TickError,
    Viewport, SLOW_FRAME_ENV_VAR,
};
