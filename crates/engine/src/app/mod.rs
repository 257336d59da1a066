mod game;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scheduler;

pub use game::{Game, LoopCommand, TickError};
pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{Frame, ParseColorError, Renderer, Rgba, Viewport};
